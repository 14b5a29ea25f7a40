/// Canned prompts offered as one-tap questions.
pub const QUICK_QUESTIONS: [&str; 6] = [
    "Tell me about your experience",
    "What are your technical skills?",
    "Show me your best projects",
    "What certifications do you have?",
    "How can I contact you?",
    "What technologies do you work with?",
];

const EXPERIENCE: &str = "I have over 6 years of hands-on experience as a Full-Stack \
Developer and Cloud Solutions Architect, currently working as a Senior Software Engineer \
delivering enterprise solutions. I specialize in scalable web and mobile applications, \
cloud infrastructure on AWS and Azure, and AI-powered products across healthcare, \
fintech, and enterprise platforms.";

const SKILLS: &str = "Frontend: React, Next.js, TypeScript, Tailwind CSS, React Native. \
Backend: Node.js, GraphQL, REST APIs, Express. Databases: MongoDB, PostgreSQL, Redis. \
Cloud & DevOps: AWS, Azure, Docker, Kubernetes, Terraform. AI/ML: OpenAI, Azure AI, \
TensorFlow. Microsoft Certified in Azure Administration (AZ-104) and AI Engineering \
(AI-102).";

const PROJECTS: &str = "I've delivered 46+ projects, including a HIPAA-compliant \
healthcare portal, an enterprise storytelling platform with AI analytics, fintech \
solutions with fraud detection, and AI-powered applications using GPT-4 and computer \
vision.";

const CERTIFICATIONS: &str = "I hold Microsoft Certified: Azure Administrator Associate \
(AZ-104) and Azure AI Engineer Associate (AI-102) certifications, validating my \
expertise in cloud architecture and AI engineering.";

const CONTACT: &str = "You can reach out through the contact form on this website, \
connect with me on LinkedIn, or explore the portfolio right here!";

const TECHNOLOGIES: &str = "I work with React, Next.js, TypeScript, Node.js, Python, \
AWS, Azure, Docker, Kubernetes, MongoDB, PostgreSQL, and AI technologies like OpenAI \
and TensorFlow.";

const DEFAULT: &str = "That's a great question! I can help you with information about \
my experience, skills, projects, certifications, contact details, and technologies. \
Try asking about any of these topics!";

/// Ordered keyword table answering when no remote service is reachable.
///
/// First matching entry wins; matching is case-insensitive substring
/// search over the user's input.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    entries: Vec<(Vec<&'static str>, &'static str)>,
    default: &'static str,
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self {
            entries: vec![
                (vec!["experience", "work"], EXPERIENCE),
                (vec!["skill", "technical"], SKILLS),
                (vec!["project", "portfolio"], PROJECTS),
                (vec!["certif", "azure"], CERTIFICATIONS),
                (vec!["contact", "email"], CONTACT),
                (vec!["technolog", "stack"], TECHNOLOGIES),
            ],
            default: DEFAULT,
        }
    }
}

impl FallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `input` from the table. Never empty, never an error.
    pub fn respond(&self, input: &str) -> &'static str {
        let lowered = input.to_lowercase();
        for (keywords, response) in &self.entries {
            if keywords.iter().any(|k| lowered.contains(k)) {
                return response;
            }
        }
        self.default
    }

    pub fn default_response(&self) -> &'static str {
        self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_route_to_their_topic() {
        let table = FallbackTable::new();
        assert_eq!(table.respond("tell me about your EXPERIENCE"), EXPERIENCE);
        assert_eq!(table.respond("what skills do you have"), SKILLS);
        assert_eq!(table.respond("show me a project"), PROJECTS);
        assert_eq!(table.respond("any certifications?"), CERTIFICATIONS);
        assert_eq!(table.respond("how do I contact you"), CONTACT);
        assert_eq!(table.respond("what's your tech stack"), TECHNOLOGIES);
    }

    #[test]
    fn first_match_wins_for_overlapping_input() {
        let table = FallbackTable::new();
        // Mentions both experience and skills; experience is listed first.
        assert_eq!(table.respond("work experience and skills"), EXPERIENCE);
    }

    #[test]
    fn unmatched_input_gets_the_topics_message() {
        let table = FallbackTable::new();
        let response = table.respond("what's the weather like on mars?");
        assert_eq!(response, table.default_response());
        assert!(!response.is_empty());
    }

    #[test]
    fn empty_input_is_answered_too() {
        let table = FallbackTable::new();
        assert_eq!(table.respond(""), table.default_response());
    }

    #[test]
    fn quick_questions_all_hit_a_topic() {
        let table = FallbackTable::new();
        for question in QUICK_QUESTIONS {
            assert_ne!(table.respond(question), table.default_response());
        }
    }
}
