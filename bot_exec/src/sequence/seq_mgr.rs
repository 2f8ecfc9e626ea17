//! # Sequence manager
//!
//! The registry of all sequences run by the executable, stepped in a fixed order each cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::Sequence;
use crate::data_store::DataStore;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sequence registry.
#[derive(Default)]
pub struct SeqMgr {
    sequences: BTreeMap<SequenceName, Sequence>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Names of the sequences, in stepping order.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SequenceName {
    /// The match strategy
    Main,

    /// Reacts to reports from the actuator board
    Actuators,

    /// Watches for faults and stops the robot
    Monitor,
}

/// A request from an action to the registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeqRequest {
    Pause(SequenceName),
    Resume(SequenceName),
}

#[derive(Debug, thiserror::Error)]
pub enum SeqMgrError {
    #[error("A sequence named {0:?} is already registered")]
    AlreadyRegistered(SequenceName),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SequenceName {
    pub const ALL: [SequenceName; 3] = [
        SequenceName::Main,
        SequenceName::Actuators,
        SequenceName::Monitor,
    ];
}

impl SeqMgr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sequence under its name.
    pub fn insert(&mut self, sequence: Sequence) -> Result<(), SeqMgrError> {
        let name = sequence.name();
        if self.sequences.contains_key(&name) {
            return Err(SeqMgrError::AlreadyRegistered(name));
        }

        info!("{:?} sequence registered with {} actions", name, sequence.len());
        self.sequences.insert(name, sequence);
        Ok(())
    }

    pub fn get(&self, name: SequenceName) -> Option<&Sequence> {
        self.sequences.get(&name)
    }

    pub fn get_mut(&mut self, name: SequenceName) -> Option<&mut Sequence> {
        self.sequences.get_mut(&name)
    }

    /// Step every sequence once.
    ///
    /// Requests pushed by a sequence's actions are applied right after that sequence's step, so a
    /// sequence paused by an earlier one is not stepped in the same cycle.
    pub fn step(&mut self, ds: &mut DataStore) {
        for name in SequenceName::ALL.iter() {
            if let Some(seq) = self.sequences.get_mut(name) {
                seq.step(ds);
            }
            self.apply_requests(ds);
        }
    }

    fn apply_requests(&mut self, ds: &mut DataStore) {
        while let Some(request) = ds.seq_requests.pop_front() {
            let (name, pause) = match request {
                SeqRequest::Pause(n) => (n, true),
                SeqRequest::Resume(n) => (n, false),
            };

            match self.sequences.get_mut(&name) {
                Some(seq) if pause => seq.pause(),
                Some(seq) => seq.resume(),
                None => warn!("Request {:?} for an unregistered sequence ignored", request),
            }
        }
    }

    /// True if every registered sequence is over.
    pub fn all_over(&self) -> bool {
        self.sequences.values().all(|s| s.is_over())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        action::{Action, ActionState},
        data_store::{test_utils::test_store, Fault},
    };

    #[test]
    fn test_duplicate_name() {
        let mut mgr = SeqMgr::new();
        mgr.insert(Sequence::new(SequenceName::Main)).unwrap();
        assert!(matches!(
            mgr.insert(Sequence::new(SequenceName::Main)),
            Err(SeqMgrError::AlreadyRegistered(SequenceName::Main))
        ));
    }

    #[test]
    fn test_monitor_pauses_main() {
        let (mut ds, _remote) = test_store();
        let mut mgr = SeqMgr::new();

        mgr.insert(Sequence::new(SequenceName::Main).with(Action::sleep(100.0)))
            .unwrap();
        mgr.insert(
            Sequence::new(SequenceName::Monitor)
                .with(Action::wait_fault(Fault::GhostFailSafe, None))
                .with(Action::pause_seq(SequenceName::Main, true))
                .with(Action::end(false, false, false)),
        )
        .unwrap();

        mgr.step(&mut ds);
        mgr.step(&mut ds);
        assert!(!mgr.get(SequenceName::Main).unwrap().is_paused());

        ds.raise_fault(Fault::GhostFailSafe);
        mgr.step(&mut ds);

        let main = mgr.get(SequenceName::Main).unwrap();
        assert!(main.is_paused());
        assert_eq!(main.current().map(|a| a.state()), Some(ActionState::NotStarted));
        assert!(ds.ghost.is_locked());
        assert!(ds.seq_requests.is_empty());
    }

    #[test]
    fn test_resume_from_other_sequence() {
        let (mut ds, _remote) = test_store();
        let mut mgr = SeqMgr::new();

        mgr.insert(Sequence::new(SequenceName::Main).with(Action::sleep(1.0)))
            .unwrap();
        mgr.insert(
            Sequence::new(SequenceName::Actuators)
                .with(Action::wait_fault(Fault::Actuator, None))
                .with(Action::resume_seq(SequenceName::Main)),
        )
        .unwrap();

        mgr.step(&mut ds);
        mgr.get_mut(SequenceName::Main).unwrap().pause();

        ds.time_s = 3.0;
        ds.raise_fault(Fault::Actuator);
        mgr.step(&mut ds);
        assert!(!mgr.get(SequenceName::Main).unwrap().is_paused());

        // Main restarts its sleep on the next cycle
        ds.time_s = 3.5;
        mgr.step(&mut ds);
        assert!(!mgr.get(SequenceName::Main).unwrap().is_over());
        ds.time_s = 4.5;
        mgr.step(&mut ds);
        assert!(mgr.get(SequenceName::Main).unwrap().is_over());
    }

    #[test]
    fn test_unknown_request_ignored() {
        let (mut ds, _remote) = test_store();
        let mut mgr = SeqMgr::new();
        mgr.insert(Sequence::new(SequenceName::Main).with(Action::pause_seq(SequenceName::Monitor, false)))
            .unwrap();

        mgr.step(&mut ds);
        assert!(ds.seq_requests.is_empty());
        assert!(!mgr.all_over());

        mgr.step(&mut ds);
        assert!(mgr.all_over());
    }
}
