//! The portfolio assistant: a scripted responder with optional remote
//! completion and speech synthesis.
//!
//! # Invariants
//! - Remote failure of any kind degrades to the local fallback table or to
//!   silence; it never surfaces as an error to the UI.
//! - The fallback table always answers; there is no empty response.

pub mod engine;
pub mod fallback;
pub mod remote;

pub use engine::{AvatarState, ChatEngine, ChatMessage, Role};
pub use fallback::{FallbackTable, QUICK_QUESTIONS};
pub use remote::{
    CompletionClient, CompletionConfig, RemoteError, SpeechClient, SpeechConfig,
};

pub fn crate_info() -> &'static str {
    "mascot-chat v0.1.0"
}
