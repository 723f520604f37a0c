//! Context window assembly for completion requests.
//!
//! Builds the ordered message list sent to the provider: the agent's system
//! prompt, then a bounded window of the most recent prior turns, then the
//! new user utterance.

use arkagents_types::chat::ChatMessage;
use arkagents_types::llm::Message;

/// Default number of prior turns included with each request.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Assembles the provider-facing message list for one chat turn.
#[derive(Debug, Clone, Copy)]
pub struct ContextAssembler {
    window_size: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ContextAssembler {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Assemble `[system?] + last window_size of prior_history + [user]`.
    ///
    /// `prior_history` must be ordered oldest first and must not contain the
    /// new turn. A blank system prompt is omitted. The result never exceeds
    /// `window_size + 2` messages.
    pub fn assemble(
        &self,
        system_prompt: Option<&str>,
        prior_history: &[ChatMessage],
        new_message: &str,
    ) -> Vec<Message> {
        let start = prior_history.len().saturating_sub(self.window_size);
        let window = &prior_history[start..];

        let mut messages = Vec::with_capacity(window.len() + 2);
        if let Some(prompt) = system_prompt.filter(|p| !p.trim().is_empty()) {
            messages.push(Message::system(prompt));
        }
        messages.extend(window.iter().map(|m| Message {
            role: m.role,
            content: m.content.clone(),
        }));
        messages.push(Message::user(new_message));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkagents_types::agent::AgentId;
    use arkagents_types::llm::MessageRole;
    use chrono::Utc;

    fn history(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage {
                id: i as i64 + 1,
                agent_id: AgentId(1),
                user_id: "default_user".to_string(),
                role: if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                },
                content: format!("m{}", i + 1),
                tool_calls: None,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_window_keeps_most_recent_prior_turns() {
        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(Some("You are Luna."), &history(15), "hello");

        assert_eq!(messages.len(), 12);
        assert_eq!(messages[0], Message::system("You are Luna."));
        let window: Vec<&str> = messages[1..11].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            window,
            vec!["m6", "m7", "m8", "m9", "m10", "m11", "m12", "m13", "m14", "m15"]
        );
        assert!(!messages.iter().any(|m| m.content == "m5"));
        assert_eq!(messages[11], Message::user("hello"));
    }

    #[test]
    fn test_short_history_included_in_full() {
        let assembler = ContextAssembler::new(10);
        let messages = assembler.assemble(Some("prompt"), &history(3), "next");
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[3].content, "m3");
    }

    #[test]
    fn test_empty_history_and_no_prompt() {
        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(None, &[], "first");
        assert_eq!(messages, vec![Message::user("first")]);
    }

    #[test]
    fn test_blank_prompt_omitted() {
        let assembler = ContextAssembler::default();
        let messages = assembler.assemble(Some("   "), &history(1), "hi");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "m1");
    }

    #[test]
    fn test_zero_window() {
        let assembler = ContextAssembler::new(0);
        let messages = assembler.assemble(Some("prompt"), &history(4), "only");
        assert_eq!(
            messages,
            vec![Message::system("prompt"), Message::user("only")]
        );
    }
}
