//! # Actuator Board Orders
//!
//! An order is sent to the actuator board as a message whose identifier designates the actuator and
//! whose payload carries the order code. The board signals completion by echoing a message with the
//! same identifier.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::msg::{Message, MessageId};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Order codes understood by the actuator board.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
#[repr(i32)]
pub enum ActuatorOrder {
    Idle = 0,
    Raise = 1,
    Lower = 2,
    Open = 3,
    Close = 4,
    Extend = 5,
    Retract = 6,
    OpenWide = 7,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActuatorOrder {
    /// Build the message which sends this order to the given actuator.
    pub fn to_message(self, actuator: MessageId) -> Message {
        Message::new(actuator, self as i32)
    }
}

impl TryFrom<i32> for ActuatorOrder {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ActuatorOrder::Idle),
            1 => Ok(ActuatorOrder::Raise),
            2 => Ok(ActuatorOrder::Lower),
            3 => Ok(ActuatorOrder::Open),
            4 => Ok(ActuatorOrder::Close),
            5 => Ok(ActuatorOrder::Extend),
            6 => Ok(ActuatorOrder::Retract),
            7 => Ok(ActuatorOrder::OpenWide),
            c => Err(c),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_order_message() {
        let msg = ActuatorOrder::Close.to_message(MessageId::GripperFront);
        assert_eq!(msg.id, MessageId::GripperFront);
        assert_eq!(ActuatorOrder::try_from(msg.data), Ok(ActuatorOrder::Close));
        assert_eq!(ActuatorOrder::try_from(42), Err(42));
    }
}
