//! # Communication actions
//!
//! Actions exchanging messages with the actuator board.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::actuator::ActuatorOrder,
    msg::{Message, MessageId},
};
use log::debug;

use super::{Action, ActionFn, ActionKind, DoubleAction};
use crate::data_store::DataStore;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Queues a message on the link.
pub struct SendAction {
    message: Message,
}

/// Waits for a message with the given identifier.
pub struct WaitMessageAction {
    id: MessageId,
}

/// Waits for any of a set of messages and runs the callback associated with the first one found.
pub struct SwitchMessageAction {
    cases: Vec<(MessageId, ActionFn)>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SendAction {
    pub fn start(&mut self, ds: &mut DataStore) {
        ds.comms.send(self.message);
    }
}

impl WaitMessageAction {
    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        match ds.comms.pull_matching(self.id) {
            Some(m) => {
                debug!("Awaited message {} received", m);
                true
            }
            None => false,
        }
    }
}

impl SwitchMessageAction {
    /// Cases are checked in the order they were added.
    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        for (id, callback) in self.cases.iter_mut() {
            if let Some(m) = ds.comms.pull_matching(*id) {
                debug!("Switching on message {}", m);
                callback(ds);
                return true;
            }
        }

        false
    }
}

impl Action {
    pub fn send(message: Message) -> Self {
        Self::new("Send", ActionKind::Send(SendAction { message }))
    }

    /// Wait for a message with the given identifier, `timeout_s` of `None` waits forever.
    pub fn wait_message(id: MessageId, timeout_s: Option<f64>) -> Self {
        let action = Self::new("WaitMessage", ActionKind::WaitMessage(WaitMessageAction { id }));
        match timeout_s {
            Some(t) => action.with_timeout(t),
            None => action,
        }
    }

    /// Wait for the first of the given messages, running its callback.
    pub fn switch_message(cases: Vec<(MessageId, ActionFn)>, timeout_s: f64) -> Self {
        Self::new(
            "SwitchMessage",
            ActionKind::SwitchMessage(SwitchMessageAction { cases }),
        )
        .with_timeout(timeout_s)
    }

    /// Send an order to an actuator, waiting for the board's echo if `wait` is set.
    pub fn send_order(actuator: MessageId, order: ActuatorOrder, wait: bool, timeout_s: f64) -> Self {
        let waiter = if wait {
            Self::wait_message(actuator, Some(timeout_s))
        } else {
            Self::null()
        };

        Self::new(
            "SendOrder",
            ActionKind::Double(Box::new(DoubleAction::parallel(
                Self::send(order.to_message(actuator)),
                waiter,
            ))),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::ActionState;
    use crate::data_store::{test_utils::test_store, Fault};
    use comms_if::net::{Communication, Transport};

    #[test]
    fn test_wait_message_timeout() {
        let (mut ds, _remote) = test_store();
        let mut action = Action::wait_message(MessageId::Flag, Some(2.0));

        action.start(&mut ds);

        ds.time_s = 1.99;
        assert!(!action.is_finished(&mut ds));
        assert!(!action.has_failed(&mut ds));

        ds.time_s = 2.0;
        assert!(!action.has_failed(&mut ds));

        ds.time_s = 2.01;
        assert!(!action.is_finished(&mut ds));
        assert!(action.has_failed(&mut ds));
        assert_eq!(action.poll(&mut ds), ActionState::Failed);
    }

    #[test]
    fn test_wait_message_received() {
        let (mut ds, mut remote) = test_store();
        let mut action = Action::wait_message(MessageId::ArmLeft, None);
        action.start(&mut ds);

        // Other messages are left in the box
        remote.write(&Message::new(MessageId::Heartbeat, 0).to_bytes()).unwrap();
        remote.write(&Message::new(MessageId::ArmLeft, 1).to_bytes()).unwrap();
        ds.comms.update(0).unwrap();

        assert_eq!(action.poll(&mut ds), ActionState::Finished);
        assert_eq!(ds.comms.in_waiting(), 1);
        assert_eq!(ds.comms.peek_oldest().map(|m| m.id), Some(MessageId::Heartbeat));
    }

    #[test]
    fn test_switch_message() {
        let (mut ds, mut remote) = test_store();
        let mut action = Action::switch_message(
            vec![
                (
                    MessageId::MatchEnd,
                    Box::new(|ds: &mut DataStore| ds.ghost.lock(true)) as ActionFn,
                ),
                (
                    MessageId::ActuatorFault,
                    Box::new(|ds: &mut DataStore| ds.raise_fault(Fault::Actuator)) as ActionFn,
                ),
            ],
            10.0,
        );
        action.start(&mut ds);

        assert_eq!(action.poll(&mut ds), ActionState::Running);

        remote.write(&Message::new(MessageId::ActuatorFault, 3).to_bytes()).unwrap();
        ds.comms.update(0).unwrap();

        assert_eq!(action.poll(&mut ds), ActionState::Finished);
        assert!(ds.has_fault(Fault::Actuator));
        assert!(!ds.ghost.is_locked());
    }

    #[test]
    fn test_switch_message_timeout() {
        let (mut ds, mut remote) = test_store();
        let mut action = Action::switch_message(
            vec![(
                MessageId::ActuatorFault,
                Box::new(|ds: &mut DataStore| ds.raise_fault(Fault::Actuator)) as ActionFn,
            )],
            1.0,
        );
        action.start(&mut ds);

        // Unrelated traffic does not complete the switch
        remote.write(&Message::new(MessageId::Heartbeat, 0).to_bytes()).unwrap();
        ds.comms.update(0).unwrap();

        ds.time_s = 1.0;
        assert_eq!(action.poll(&mut ds), ActionState::Running);
        ds.time_s = 1.01;
        assert_eq!(action.poll(&mut ds), ActionState::Failed);
        assert!(!ds.has_fault(Fault::Actuator));

        // A late message is left for whoever reads it next
        remote.write(&Message::new(MessageId::ActuatorFault, 1).to_bytes()).unwrap();
        ds.comms.update(20).unwrap();
        assert_eq!(action.poll(&mut ds), ActionState::Failed);
        assert!(!ds.has_fault(Fault::Actuator));
        assert_eq!(ds.comms.in_waiting(), 2);
    }

    #[test]
    fn test_send_order() {
        let (mut ds, remote) = test_store();
        let mut board = Communication::new(Box::new(remote), 0);

        let mut action = Action::send_order(MessageId::GripperFront, ActuatorOrder::Close, true, 3.0);
        action.start(&mut ds);
        ds.comms.update(0).unwrap();

        board.update(0).unwrap();
        let order = board.pull_oldest().unwrap();
        assert_eq!(order, ActuatorOrder::Close.to_message(MessageId::GripperFront));
        assert_eq!(action.poll(&mut ds), ActionState::Running);

        // Board echoes the order once complete
        board.send(Message::new(MessageId::GripperFront, 0));
        board.update(10).unwrap();
        ds.comms.update(10).unwrap();

        assert_eq!(action.poll(&mut ds), ActionState::Finished);
    }

    #[test]
    fn test_send_order_no_wait() {
        let (mut ds, _remote) = test_store();

        let mut action = Action::send_order(MessageId::Flag, ActuatorOrder::Raise, false, 3.0);
        action.start(&mut ds);

        assert_eq!(action.poll(&mut ds), ActionState::Finished);
        assert_eq!(ds.comms.pending_sends(), 1);
    }
}
