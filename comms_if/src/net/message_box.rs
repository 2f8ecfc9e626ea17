//! Bounded message FIFO

use std::collections::VecDeque;

use crate::msg::{Message, MessageId};

/// Capacity of every message box.
pub const MESSAGE_BOX_SIZE: usize = 10;

/// A bounded first-in first-out queue of messages.
///
/// The storage is allocated once on creation. Pushing into a full box drops the oldest message.
#[derive(Debug, Clone)]
pub struct MessageBox {
    queue: VecDeque<Message>,
}

impl MessageBox {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(MESSAGE_BOX_SIZE),
        }
    }

    /// Push a message at the back of the box, returning the message dropped to make room if the box
    /// was full.
    pub fn push(&mut self, message: Message) -> Option<Message> {
        let dropped = if self.queue.len() >= MESSAGE_BOX_SIZE {
            self.queue.pop_front()
        } else {
            None
        };

        self.queue.push_back(message);
        dropped
    }

    pub fn pull(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<Message> {
        self.queue.front().copied()
    }

    /// Remove the oldest message with the given identifier.
    pub fn pull_matching(&mut self, id: MessageId) -> Option<Message> {
        let index = self.queue.iter().position(|m| m.id == id)?;
        self.queue.remove(index)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for MessageBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_overflow_drops_oldest() {
        let mut mbox = MessageBox::new();

        for i in 0..MESSAGE_BOX_SIZE {
            assert_eq!(mbox.push(Message::new(MessageId::Heartbeat, i as i32)), None);
        }

        let dropped = mbox.push(Message::new(MessageId::Heartbeat, 99));
        assert_eq!(dropped, Some(Message::new(MessageId::Heartbeat, 0)));
        assert_eq!(mbox.len(), MESSAGE_BOX_SIZE);
        assert_eq!(mbox.peek(), Some(Message::new(MessageId::Heartbeat, 1)));
    }

    #[test]
    fn test_pull_matching_keeps_order() {
        let mut mbox = MessageBox::new();
        mbox.push(Message::new(MessageId::Flag, 1));
        mbox.push(Message::new(MessageId::ArmLeft, 2));
        mbox.push(Message::new(MessageId::Flag, 3));

        assert_eq!(mbox.pull_matching(MessageId::Flag), Some(Message::new(MessageId::Flag, 1)));
        assert_eq!(mbox.pull_matching(MessageId::GripperFront), None);
        assert_eq!(mbox.pull(), Some(Message::new(MessageId::ArmLeft, 2)));
        assert_eq!(mbox.pull(), Some(Message::new(MessageId::Flag, 3)));
        assert!(mbox.is_empty());
    }
}
