//! # Message module
//!
//! A message is the fixed size record exchanged between the main board and the actuator board: a
//! signed 32 bit payload followed by a 16 bit identifier, both little endian.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::Display;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Size of an encoded message in bytes.
pub const MESSAGE_SIZE: usize = 6;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A message exchanged over an inter-board link.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub struct Message {
    /// Identifier of the message, for actuator orders this designates the actuator.
    pub id: MessageId,

    /// Payload of the message. Most of the time this is empty.
    pub data: i32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Identifiers of all messages known to the robot.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone, PartialOrd, Ord)]
#[repr(u16)]
pub enum MessageId {
    Empty = 0,
    Heartbeat = 1,
    MatchStart = 2,
    MatchEnd = 3,

    // Actuators, the board echoes these back once an order is complete
    Flag = 10,
    ArmLeft = 11,
    ArmRight = 12,
    GripperFront = 13,
    GripperRear = 14,

    /// Sent by the actuator board when one of its actuators is stuck.
    ActuatorFault = 20,
}

/// Errors which can occur while decoding a message.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum MessageError {
    #[error("Expected {} bytes to decode a message, found {0}", MESSAGE_SIZE)]
    ShortRecord(usize),

    #[error("Unknown message identifier {0}")]
    UnknownId(u16),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Message {
    pub fn new(id: MessageId, data: i32) -> Self {
        Self { id, data }
    }

    /// Encode the message into its wire representation.
    pub fn to_bytes(&self) -> [u8; MESSAGE_SIZE] {
        let mut buf = [0u8; MESSAGE_SIZE];
        LittleEndian::write_i32(&mut buf[0..4], self.data);
        LittleEndian::write_u16(&mut buf[4..6], self.id as u16);
        buf
    }

    /// Decode a message from the first [`MESSAGE_SIZE`] bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        if bytes.len() < MESSAGE_SIZE {
            return Err(MessageError::ShortRecord(bytes.len()));
        }

        let data = LittleEndian::read_i32(&bytes[0..4]);
        let id = MessageId::try_from(LittleEndian::read_u16(&bytes[4..6]))?;

        Ok(Self { id, data })
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new(MessageId::Empty, 0)
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self.id, self.data)
    }
}

impl TryFrom<u16> for MessageId {
    type Error = MessageError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(MessageId::Empty),
            1 => Ok(MessageId::Heartbeat),
            2 => Ok(MessageId::MatchStart),
            3 => Ok(MessageId::MatchEnd),
            10 => Ok(MessageId::Flag),
            11 => Ok(MessageId::ArmLeft),
            12 => Ok(MessageId::ArmRight),
            13 => Ok(MessageId::GripperFront),
            14 => Ok(MessageId::GripperRear),
            20 => Ok(MessageId::ActuatorFault),
            r => Err(MessageError::UnknownId(r)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wire_layout() {
        let msg = Message::new(MessageId::ArmRight, -2);
        let bytes = msg.to_bytes();

        // Payload first, then the identifier
        assert_eq!(bytes, [0xFE, 0xFF, 0xFF, 0xFF, 12, 0]);
        assert_eq!(Message::from_bytes(&bytes), Ok(msg));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            Message::from_bytes(&[0, 0, 0]),
            Err(MessageError::ShortRecord(3))
        );
        assert_eq!(
            Message::from_bytes(&[0, 0, 0, 0, 0xFF, 0x00]),
            Err(MessageError::UnknownId(255))
        );
    }
}
