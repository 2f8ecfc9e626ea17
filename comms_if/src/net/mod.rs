//! # Link module
//!
//! This module provides the message boxes and the throttled link used to talk to other boards.
//! Framing of the byte stream is left to the [`Transport`], the link only deals with whole
//! [`Message`] records.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod message_box;
mod mem_transport;

pub use message_box::{MessageBox, MESSAGE_BOX_SIZE};
pub use mem_transport::MemTransport;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{trace, warn};
use thiserror::Error;

use crate::msg::{Message, MessageId, MESSAGE_SIZE};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Default minimum number of milliseconds between two messages sent on a link.
pub const DEFAULT_ANTISPAM_MS: u64 = 300;

/// Size of the chunk read from the transport on each read call.
const READ_CHUNK_SIZE: usize = 64;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A byte transport underneath a [`Communication`] link, for instance a serial port.
///
/// Implementations must not block: `read` returns `Ok(0)` when no byte is available.
pub trait Transport {
    /// Write all the given bytes to the transport.
    fn write(&mut self, bytes: &[u8]) -> Result<(), CommsError>;

    /// Read available bytes into `buf`, returning how many were read.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CommsError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A message link to another board.
///
/// Outgoing messages are queued by [`Communication::send`] and written at most once per anti-spam
/// interval by [`Communication::update`], which also decodes incoming records into the receive box.
pub struct Communication {
    transport: Box<dyn Transport>,

    sending_box: MessageBox,
    receive_box: MessageBox,

    /// Bytes received but not yet forming a complete record
    rx_pending: Vec<u8>,

    /// Time of the last transmission in milliseconds, `None` if nothing was sent yet
    last_send_ms: Option<u64>,

    antispam_ms: u64,

    /// Number of records that could not be decoded
    num_decode_errors: u64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur on a link.
#[derive(Debug, Error)]
pub enum CommsError {
    #[error("The transport is disconnected")]
    Disconnected,

    #[error("Transport IO error: {0}")]
    Io(std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Communication {
    /// Create a new link over the given transport.
    pub fn new(transport: Box<dyn Transport>, antispam_ms: u64) -> Self {
        Self {
            transport,
            sending_box: MessageBox::new(),
            receive_box: MessageBox::new(),
            rx_pending: Vec::with_capacity(READ_CHUNK_SIZE + MESSAGE_SIZE),
            last_send_ms: None,
            antispam_ms,
            num_decode_errors: 0,
        }
    }

    /// Queue a message to be sent on a following update.
    pub fn send(&mut self, message: Message) {
        if let Some(dropped) = self.sending_box.push(message) {
            warn!("Sending box full, dropped oldest message {}", dropped);
        }
    }

    /// Remove and return the oldest received message.
    pub fn pull_oldest(&mut self) -> Option<Message> {
        self.receive_box.pull()
    }

    /// Return the oldest received message without removing it.
    pub fn peek_oldest(&self) -> Option<Message> {
        self.receive_box.peek()
    }

    /// Remove and return the oldest received message with the given identifier, leaving the other
    /// messages in order.
    pub fn pull_matching(&mut self, id: MessageId) -> Option<Message> {
        self.receive_box.pull_matching(id)
    }

    /// Number of received messages waiting to be read.
    pub fn in_waiting(&self) -> usize {
        self.receive_box.len()
    }

    /// Number of messages waiting to be sent.
    pub fn pending_sends(&self) -> usize {
        self.sending_box.len()
    }

    /// Number of received records which could not be decoded.
    pub fn num_decode_errors(&self) -> u64 {
        self.num_decode_errors
    }

    /// Process the link, must be called once per cycle.
    ///
    /// Received bytes are decoded into the receive box, then if the anti-spam interval has
    /// elapsed since the last transmission the oldest queued message is written.
    pub fn update(&mut self, now_ms: u64) -> Result<(), CommsError> {
        self.receive()?;
        self.transmit(now_ms)
    }

    fn receive(&mut self) -> Result<(), CommsError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            let num_read = self.transport.read(&mut chunk)?;
            if num_read == 0 {
                break;
            }
            self.rx_pending.extend_from_slice(&chunk[..num_read]);

            // Decode every complete record
            while self.rx_pending.len() >= MESSAGE_SIZE {
                match Message::from_bytes(&self.rx_pending[..MESSAGE_SIZE]) {
                    Ok(message) => {
                        trace!("Received {}", message);
                        if let Some(dropped) = self.receive_box.push(message) {
                            warn!("Receive box full, dropped oldest message {}", dropped);
                        }
                    }
                    Err(e) => {
                        self.num_decode_errors += 1;
                        warn!("Could not decode received record: {}", e);
                    }
                }
                self.rx_pending.drain(..MESSAGE_SIZE);
            }
        }

        Ok(())
    }

    fn transmit(&mut self, now_ms: u64) -> Result<(), CommsError> {
        let allowed = match self.last_send_ms {
            Some(t) => now_ms.saturating_sub(t) >= self.antispam_ms,
            None => true,
        };

        if !allowed {
            return Ok(());
        }

        if let Some(message) = self.sending_box.pull() {
            trace!("Sending {}", message);
            self.transport.write(&message.to_bytes())?;
            self.last_send_ms = Some(now_ms);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_antispam() -> Result<(), CommsError> {
        let (local, remote) = MemTransport::pair();
        let mut link = Communication::new(Box::new(local), DEFAULT_ANTISPAM_MS);
        let mut remote_link = Communication::new(Box::new(remote), DEFAULT_ANTISPAM_MS);

        link.send(Message::new(MessageId::Flag, 1));
        link.send(Message::new(MessageId::ArmLeft, 2));

        // First message goes out straight away, the second must wait for the interval
        link.update(1000)?;
        assert_eq!(link.pending_sends(), 1);
        link.update(1299)?;
        assert_eq!(link.pending_sends(), 1);
        link.update(1300)?;
        assert_eq!(link.pending_sends(), 0);

        remote_link.update(0)?;
        assert_eq!(remote_link.in_waiting(), 2);
        assert_eq!(remote_link.pull_oldest(), Some(Message::new(MessageId::Flag, 1)));
        assert_eq!(remote_link.pull_oldest(), Some(Message::new(MessageId::ArmLeft, 2)));
        assert_eq!(remote_link.pull_oldest(), None);

        Ok(())
    }

    #[test]
    fn test_partial_records() -> Result<(), CommsError> {
        let (local, mut remote) = MemTransport::pair();
        let mut link = Communication::new(Box::new(local), DEFAULT_ANTISPAM_MS);

        let bytes = Message::new(MessageId::GripperRear, 7).to_bytes();

        // Only half a record has arrived
        remote.write(&bytes[..3])?;
        link.update(0)?;
        assert_eq!(link.in_waiting(), 0);

        remote.write(&bytes[3..])?;
        link.update(10)?;
        assert_eq!(link.pull_matching(MessageId::GripperRear), Some(Message::new(MessageId::GripperRear, 7)));

        Ok(())
    }

    #[test]
    fn test_undecodable_record_skipped() -> Result<(), CommsError> {
        let (local, mut remote) = MemTransport::pair();
        let mut link = Communication::new(Box::new(local), DEFAULT_ANTISPAM_MS);

        remote.write(&[0, 0, 0, 0, 0xAA, 0xAA])?;
        remote.write(&Message::new(MessageId::Heartbeat, 0).to_bytes())?;
        link.update(0)?;

        assert_eq!(link.num_decode_errors(), 1);
        assert_eq!(link.peek_oldest(), Some(Message::new(MessageId::Heartbeat, 0)));

        Ok(())
    }
}
