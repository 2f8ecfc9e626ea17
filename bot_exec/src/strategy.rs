//! # Match strategy
//!
//! Builds the sequences run during a match. Targets are given for the primary side and mirrored
//! by the data store when playing on the other side.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::f64::consts::PI;

use comms_if::{
    eqpt::actuator::ActuatorOrder,
    msg::{Message, MessageId},
};

use crate::{
    action::{Action, ActionFn},
    data_store::{DataStore, Fault},
    motion::{MoveProfileName, Target},
    sequence::{SeqMgr, SeqMgrError, Sequence, SequenceName},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Timeout of the moves across the table
const MOVE_TIMEOUT_S: f64 = 10.0;

/// Time allowed to the actuator board to complete an order
const ORDER_TIMEOUT_S: f64 = 3.0;

/// Time after which the actuator watch is restarted
const ACTUATOR_WATCH_S: f64 = 100.0;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the sequence manager holding all match sequences.
pub fn build() -> Result<SeqMgr, SeqMgrError> {
    let mut seq_mgr = SeqMgr::new();

    seq_mgr.insert(main_sequence())?;
    seq_mgr.insert(actuators_sequence())?;
    seq_mgr.insert(monitor_sequence())?;

    Ok(seq_mgr)
}

/// Collect the first sample, drop it off, raise the flag.
fn main_sequence() -> Sequence {
    let mut seq = Sequence::new(SequenceName::Main);

    seq.add(Action::wait_start_cord());
    seq.add(Action::send(Message::new(MessageId::MatchStart, 0)));

    seq.add(Action::goto(
        Target::new(1.0, 1.0, 0.0),
        MoveProfileName::Standard,
        MOVE_TIMEOUT_S,
    ));
    seq.add(Action::send_order(
        MessageId::ArmLeft,
        ActuatorOrder::Lower,
        true,
        ORDER_TIMEOUT_S,
    ));

    let approach = seq.add(Action::straight_to(
        Target::new(1.5, 0.6, 0.0),
        MoveProfileName::Fast,
        MOVE_TIMEOUT_S,
    ));
    seq.add(
        Action::send_order(MessageId::GripperFront, ActuatorOrder::Close, true, ORDER_TIMEOUT_S)
            .require(approach),
    );

    seq.add(Action::goto_backward(
        Target::new(0.6, 1.0, 0.0),
        MoveProfileName::Standard,
        MOVE_TIMEOUT_S,
    ));
    seq.add(Action::rotate(PI / 2.0, MoveProfileName::Accurate, 5.0));
    seq.add(Action::send_order(MessageId::Flag, ActuatorOrder::Raise, false, 1.0));

    seq.add(Action::end(false, false, true));

    seq
}

/// Watch for stuck actuators reported by the board.
fn actuators_sequence() -> Sequence {
    let on_fault: ActionFn = Box::new(|ds: &mut DataStore| ds.raise_fault(Fault::Actuator));

    Sequence::new(SequenceName::Actuators)
        .with(Action::switch_message(
            vec![(MessageId::ActuatorFault, on_fault)],
            ACTUATOR_WATCH_S,
        ))
        .with(Action::end(true, false, false))
}

/// Stop the robot if the ghost fail-safe trips.
fn monitor_sequence() -> Sequence {
    Sequence::new(SequenceName::Monitor)
        .with(Action::wait_fault(Fault::GhostFailSafe, None))
        .with(Action::pause_seq(SequenceName::Main, true))
        .with(Action::send(Message::new(MessageId::MatchEnd, 0)))
        .with(Action::end(false, false, false))
}
