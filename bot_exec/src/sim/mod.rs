//! # Simulation module
//!
//! Stand-ins for the hardware the executable talks to when run off the robot: a scripted digital
//! input for the start cord and an actuator board answering orders over an in-memory link.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::VecDeque;
use std::convert::TryFrom;

use comms_if::{
    eqpt::actuator::ActuatorOrder,
    msg::{Message, MessageId},
    net::{Communication, CommsError, MemTransport},
};
use log::{debug, trace, warn};

use crate::io::DigitalInput;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A digital input replaying a list of levels, one per sample.
///
/// Once the list is exhausted the last level is held. An empty list reads low.
pub struct ScriptedInput {
    levels: VecDeque<bool>,
    last: bool,
}

/// Simulated actuator board.
///
/// Every valid order received is echoed back once `delay_ms` has elapsed, as the real board does
/// when the actuator reaches its position. Orders to a stuck actuator are answered with an
/// [`MessageId::ActuatorFault`] carrying the actuator's identifier instead.
pub struct SimActuatorBoard {
    link: Communication,

    delay_ms: u64,

    /// Echoes waiting for their due time, in order of reception
    pending: VecDeque<(u64, Message)>,

    stuck: Option<MessageId>,

    num_orders: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ScriptedInput {
    pub fn new(levels: Vec<bool>) -> Self {
        Self {
            levels: levels.into(),
            last: false,
        }
    }

    /// A start cord in place for `num_samples` samples, then pulled.
    pub fn pulled_after(num_samples: usize) -> Self {
        let mut levels = vec![false; num_samples];
        levels.push(true);
        Self::new(levels)
    }
}

impl DigitalInput for ScriptedInput {
    fn is_high(&mut self) -> bool {
        if let Some(level) = self.levels.pop_front() {
            self.last = level;
        }
        self.last
    }
}

impl SimActuatorBoard {
    /// Create a board on the remote end of the link to the robot.
    pub fn new(transport: MemTransport, delay_ms: u64, antispam_ms: u64) -> Self {
        Self {
            link: Communication::new(Box::new(transport), antispam_ms),
            delay_ms,
            pending: VecDeque::new(),
            stuck: None,
            num_orders: 0,
        }
    }

    /// Make every order to `actuator` fail.
    pub fn with_stuck(mut self, actuator: MessageId) -> Self {
        self.stuck = Some(actuator);
        self
    }

    /// Number of valid orders received so far.
    pub fn num_orders(&self) -> u64 {
        self.num_orders
    }

    /// Process the board, must be called once per cycle.
    pub fn update(&mut self, now_ms: u64) -> Result<(), CommsError> {
        // Receive new orders
        self.link.update(now_ms)?;

        while let Some(msg) = self.link.pull_oldest() {
            if !is_actuator(msg.id) {
                trace!("Sim board ignoring {}", msg);
                continue;
            }

            let order = match ActuatorOrder::try_from(msg.data) {
                Ok(o) => o,
                Err(code) => {
                    warn!("Sim board received unknown order code {} for {:?}", code, msg.id);
                    continue;
                }
            };

            debug!("Sim board executing {:?} on {:?}", order, msg.id);
            self.num_orders += 1;

            let reply = if self.stuck == Some(msg.id) {
                Message::new(MessageId::ActuatorFault, msg.id as i32)
            } else {
                msg
            };
            self.pending.push_back((now_ms + self.delay_ms, reply));
        }

        while let Some(&(due_ms, reply)) = self.pending.front() {
            if due_ms > now_ms {
                break;
            }
            self.link.send(reply);
            self.pending.pop_front();
        }

        // Transmit replies falling due this cycle
        self.link.update(now_ms)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn is_actuator(id: MessageId) -> bool {
    matches!(
        id,
        MessageId::Flag
            | MessageId::ArmLeft
            | MessageId::ArmRight
            | MessageId::GripperFront
            | MessageId::GripperRear
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::net::Transport;

    #[test]
    fn test_scripted_input() {
        let mut input = ScriptedInput::new(vec![false, true]);
        assert!(!input.is_high());
        assert!(input.is_high());
        assert!(input.is_high());

        let mut empty = ScriptedInput::new(vec![]);
        assert!(!empty.is_high());

        let mut cord = ScriptedInput::pulled_after(2);
        let levels: Vec<bool> = (0..4).map(|_| cord.is_high()).collect();
        assert_eq!(levels, vec![false, false, true, true]);
    }

    #[test]
    fn test_board_echo() -> Result<(), CommsError> {
        let (mut robot, remote) = MemTransport::pair();
        let mut board = SimActuatorBoard::new(remote, 500, 0);

        let order = ActuatorOrder::Open.to_message(MessageId::ArmLeft);
        robot.write(&order.to_bytes())?;
        robot.write(&Message::new(MessageId::Heartbeat, 0).to_bytes())?;

        board.update(1000)?;
        assert_eq!(board.num_orders(), 1);
        assert_eq!(robot.available(), 0);

        board.update(1499)?;
        assert_eq!(robot.available(), 0);

        board.update(1500)?;
        let mut buf = [0u8; 6];
        assert_eq!(robot.read(&mut buf)?, 6);
        assert_eq!(Message::from_bytes(&buf), Ok(order));

        Ok(())
    }

    #[test]
    fn test_board_stuck_actuator() -> Result<(), CommsError> {
        let (mut robot, remote) = MemTransport::pair();
        let mut board = SimActuatorBoard::new(remote, 0, 0).with_stuck(MessageId::Flag);

        robot.write(&ActuatorOrder::Raise.to_message(MessageId::Flag).to_bytes())?;
        board.update(0)?;

        let mut buf = [0u8; 6];
        assert_eq!(robot.read(&mut buf)?, 6);
        assert_eq!(
            Message::from_bytes(&buf),
            Ok(Message::new(MessageId::ActuatorFault, MessageId::Flag as i32))
        );

        Ok(())
    }

    #[test]
    fn test_board_unknown_order() -> Result<(), CommsError> {
        let (mut robot, remote) = MemTransport::pair();
        let mut board = SimActuatorBoard::new(remote, 0, 0);

        robot.write(&Message::new(MessageId::GripperRear, 99).to_bytes())?;
        board.update(0)?;

        assert_eq!(board.num_orders(), 0);
        assert_eq!(robot.available(), 0);

        Ok(())
    }
}
