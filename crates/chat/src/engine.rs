use crate::fallback::FallbackTable;
use crate::remote::{CompletionClient, SpeechClient};

/// Avatar presentation state around a message round-trip.
///
/// Flags, not a guarded state machine: the UI sets whatever fits the
/// moment, last set wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvatarState {
    #[default]
    Idle,
    Listening,
    Thinking,
    Talking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// The assistant: remote completion when configured, fallback table
/// always.
pub struct ChatEngine {
    fallback: FallbackTable,
    completion: Option<CompletionClient>,
    transcript: Vec<ChatMessage>,
    state: AvatarState,
}

impl ChatEngine {
    /// Offline engine: fallback table only.
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn new(completion: Option<CompletionClient>) -> Self {
        Self {
            fallback: FallbackTable::new(),
            completion,
            transcript: vec![ChatMessage {
                role: Role::Assistant,
                text: "Hi! I'm the portfolio assistant. Ask me anything about my \
                       experience, skills, and projects!"
                    .into(),
            }],
            state: AvatarState::Idle,
        }
    }

    pub fn state(&self) -> AvatarState {
        self.state
    }

    pub fn set_state(&mut self, state: AvatarState) {
        self.state = state;
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Answer `input`, preferring the remote completion and degrading to
    /// the fallback table on any failure. Always returns a response.
    pub fn respond(&mut self, input: &str) -> String {
        self.state = AvatarState::Thinking;

        let response = match &self.completion {
            Some(client) => match client.respond(&self.transcript, input) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(%err, "completion unavailable, using fallback");
                    self.fallback.respond(input).to_string()
                }
            },
            None => self.fallback.respond(input).to_string(),
        };

        self.transcript.push(ChatMessage {
            role: Role::User,
            text: input.to_string(),
        });
        self.transcript.push(ChatMessage {
            role: Role::Assistant,
            text: response.clone(),
        });
        self.state = AvatarState::Idle;
        response
    }

    /// Synthesize speech for `text`.
    ///
    /// On success the avatar goes to `Talking` and the audio payload is
    /// returned for playback. On any failure playback is skipped, the
    /// avatar returns to `Idle`, and nothing propagates.
    pub fn speak(&mut self, speech: &SpeechClient, text: &str) -> Option<Vec<u8>> {
        match speech.synthesize(text) {
            Ok(audio) => {
                self.state = AvatarState::Talking;
                Some(audio)
            }
            Err(err) => {
                tracing::warn!(%err, "speech synthesis unavailable, skipping playback");
                self.state = AvatarState::Idle;
                None
            }
        }
    }

    /// Playback finished; back to idle.
    pub fn finish_speaking(&mut self) {
        self.state = AvatarState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{CompletionConfig, SpeechConfig};

    #[test]
    fn engine_greets_and_starts_idle() {
        let engine = ChatEngine::offline();
        assert_eq!(engine.state(), AvatarState::Idle);
        assert_eq!(engine.transcript().len(), 1);
        assert_eq!(engine.transcript()[0].role, Role::Assistant);
    }

    #[test]
    fn offline_engine_answers_from_the_table() {
        let mut engine = ChatEngine::offline();
        let response = engine.respond("tell me about your skills");
        assert!(response.contains("React"));
        assert_eq!(engine.state(), AvatarState::Idle);
    }

    #[test]
    fn unrecognized_input_gets_default_topics_message() {
        let mut engine = ChatEngine::offline();
        let response = engine.respond("xyzzy plugh");
        assert!(response.contains("Try asking"));
        assert!(!response.is_empty());
    }

    #[test]
    fn transcript_records_both_sides() {
        let mut engine = ChatEngine::offline();
        engine.respond("projects?");
        let transcript = engine.transcript();
        // greeting + user + assistant
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, Role::User);
        assert_eq!(transcript[2].role, Role::Assistant);
    }

    #[test]
    fn keyless_completion_client_degrades_to_fallback() {
        // A configured remote client with no key must behave exactly like
        // the offline engine, with no error escaping.
        let client = CompletionClient::new(CompletionConfig::default());
        let mut engine = ChatEngine::new(Some(client));
        let response = engine.respond("what is your experience?");
        assert!(response.contains("6 years"));
        assert_eq!(engine.state(), AvatarState::Idle);
    }

    #[test]
    fn failed_speech_skips_playback_and_returns_to_idle() {
        let mut engine = ChatEngine::offline();
        engine.set_state(AvatarState::Thinking);
        let speech = SpeechClient::new(SpeechConfig::default());
        let audio = engine.speak(&speech, "hello");
        assert!(audio.is_none());
        assert_eq!(engine.state(), AvatarState::Idle);
    }

    #[test]
    fn avatar_state_is_last_set_wins() {
        let mut engine = ChatEngine::offline();
        engine.set_state(AvatarState::Listening);
        engine.set_state(AvatarState::Talking);
        assert_eq!(engine.state(), AvatarState::Talking);
        engine.finish_speaking();
        assert_eq!(engine.state(), AvatarState::Idle);
    }
}
