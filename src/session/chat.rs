#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Fixed greeting the transcript is seeded with.
pub const GREETING: &str = "안녕! 나는 문법 탐험을 도와줄 AI 튜터야. 궁금한 게 있니?";

/// Process-lifetime chat transcript with a single in-flight-request gate.
/// One send appends the user turn immediately and, on completion, exactly one
/// assistant turn (success text or fallback text alike). Replies carry the
/// epoch of the send they answer; a reply for a superseded epoch is dropped.
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    awaiting: Option<u64>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                text: GREETING.to_string(),
            }],
            awaiting: None,
        }
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Begin a send. Returns the trimmed message plus a snapshot of the prior
    /// transcript for the provider call, or `None` when the input is blank or
    /// a response is still pending (both are no-ops).
    pub fn start_send(&mut self, input: &str, epoch: u64) -> Option<(String, Vec<ChatMessage>)> {
        let message = input.trim();
        if message.is_empty() || self.awaiting.is_some() {
            return None;
        }
        let history = self.messages.clone();
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: message.to_string(),
        });
        self.awaiting = Some(epoch);
        Some((message.to_string(), history))
    }

    /// Append the assistant reply for the given epoch. Stale replies leave
    /// the transcript untouched but a matching one always appends, even when
    /// the text is a fallback string.
    pub fn receive(&mut self, epoch: u64, text: String) {
        if self.awaiting != Some(epoch) {
            log::debug!("dropping stale chat reply for epoch {epoch}");
            return;
        }
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text,
        });
        self.awaiting = None;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
