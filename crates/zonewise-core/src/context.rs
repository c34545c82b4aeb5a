use crate::turns::{Conversation, ConversationTurn};

/// Everything sent to a provider for one generation call.
#[derive(Clone, Debug)]
pub struct LlmContext {
    pub system_prompt: String,
    pub turns: Vec<ConversationTurn>,
}

impl LlmContext {
    pub fn new(system_prompt: impl Into<String>, conversation: &Conversation) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            turns: conversation.turns().to_vec(),
        }
    }

    /// Create an empty context (useful for testing).
    pub fn empty() -> Self {
        Self {
            system_prompt: String::new(),
            turns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_turns_in_order() {
        let convo = Conversation::new(vec![
            ConversationTurn::user("a"),
            ConversationTurn::assistant("b"),
        ]);
        let ctx = LlmContext::new("sys", &convo);
        assert_eq!(ctx.system_prompt, "sys");
        assert_eq!(ctx.turns, convo.turns());
    }
}
