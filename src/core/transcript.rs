use crate::core::message::Message;

/// Ordered, append-only chat history.
///
/// The only removal is of the pending placeholder, and at most one
/// placeholder is ever held.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. A second placeholder is refused and `false` returned.
    pub fn push(&mut self, message: Message) -> bool {
        if message.is_pending() && self.has_pending() {
            return false;
        }
        self.messages.push(message);
        self.revision += 1;
        true
    }

    pub fn remove_pending(&mut self) -> Option<Message> {
        let index = self.messages.iter().rposition(Message::is_pending)?;
        self.revision += 1;
        Some(self.messages.remove(index))
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(Message::is_pending)
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_pending()).count()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped on every change; the shell compares it to decide when to
    /// scroll to the bottom.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
