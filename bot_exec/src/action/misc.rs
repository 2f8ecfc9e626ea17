//! # Control actions
//!
//! Waits, callbacks and the actions acting on the sequences themselves.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use super::{Action, ActionFn, ActionKind, Directive, EndDirective};
use crate::{
    data_store::{DataStore, Fault},
    sequence::{SeqRequest, SequenceName},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Waits for a fixed duration.
pub struct SleepAction {
    duration_s: f64,
}

/// Never finishes. When started it sends an [`EndDirective`] to its sequence and may lock the
/// ghost.
pub struct EndAction {
    directive: EndDirective,
    lock_ghost: bool,
}

/// Runs a callback once when started.
pub struct DoAction {
    func: ActionFn,
}

/// Pauses another sequence.
pub struct PauseSeqAction {
    name: SequenceName,
    lock_ghost: bool,
}

/// Resumes another sequence.
pub struct ResumeSeqAction {
    name: SequenceName,
}

/// Waits for a fault to be raised.
pub struct WaitFaultAction {
    fault: Fault,
}

/// Waits for the start cord to be pulled.
///
/// The cord must first be seen in place (input low), the action then finishes once it is pulled
/// (input high). A cord already missing when the action starts does not start the match.
pub struct WaitStartCordAction {
    armed: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SleepAction {
    pub fn is_finished(&mut self, elapsed_s: f64) -> bool {
        elapsed_s >= self.duration_s
    }
}

impl EndAction {
    pub fn start(&mut self, ds: &mut DataStore) -> Directive {
        if self.lock_ghost {
            ds.ghost.lock(true);
        }
        Directive::End(self.directive)
    }
}

impl DoAction {
    pub fn start(&mut self, ds: &mut DataStore) {
        (self.func)(ds);
    }
}

impl PauseSeqAction {
    pub fn start(&mut self, ds: &mut DataStore) {
        info!("Requesting pause of the {:?} sequence", self.name);
        ds.request(SeqRequest::Pause(self.name));
        if self.lock_ghost {
            ds.ghost.lock(true);
        }
    }
}

impl ResumeSeqAction {
    pub fn start(&mut self, ds: &mut DataStore) {
        info!("Requesting resume of the {:?} sequence", self.name);
        ds.request(SeqRequest::Resume(self.name));
    }
}

impl WaitFaultAction {
    pub fn new(fault: Fault) -> Self {
        Self { fault }
    }

    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        ds.has_fault(self.fault)
    }
}

impl WaitStartCordAction {
    pub fn start(&mut self) {
        self.armed = false;
    }

    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        if ds.start_cord.is_high() {
            if self.armed {
                info!("Start cord pulled");
            }
            self.armed
        } else {
            if !self.armed {
                info!("Start cord in place, armed");
            }
            self.armed = true;
            false
        }
    }
}

impl Action {
    /// Wait for `duration_s` seconds.
    pub fn sleep(duration_s: f64) -> Self {
        Self::new("Sleep", ActionKind::Sleep(SleepAction { duration_s }))
    }

    /// End the sequence: loop back to its start, pause it, or just stay here forever.
    pub fn end(loop_back: bool, pause: bool, lock_ghost: bool) -> Self {
        Self::new(
            "End",
            ActionKind::End(EndAction {
                directive: EndDirective { loop_back, pause },
                lock_ghost,
            }),
        )
    }

    /// Run `func` once.
    pub fn run<F>(name: &'static str, func: F) -> Self
    where
        F: FnMut(&mut DataStore) + 'static,
    {
        Self::new(name, ActionKind::Do(DoAction { func: Box::new(func) }))
    }

    pub fn pause_seq(name: SequenceName, lock_ghost: bool) -> Self {
        Self::new("PauseSeq", ActionKind::PauseSeq(PauseSeqAction { name, lock_ghost }))
    }

    pub fn resume_seq(name: SequenceName) -> Self {
        Self::new("ResumeSeq", ActionKind::ResumeSeq(ResumeSeqAction { name }))
    }

    /// Wait for `fault` to be raised, `timeout_s` of `None` waits forever.
    pub fn wait_fault(fault: Fault, timeout_s: Option<f64>) -> Self {
        let action = Self::new("WaitFault", ActionKind::WaitFault(WaitFaultAction::new(fault)));
        match timeout_s {
            Some(t) => action.with_timeout(t),
            None => action,
        }
    }

    pub fn wait_start_cord() -> Self {
        Self::new(
            "WaitStartCord",
            ActionKind::WaitStartCord(WaitStartCordAction { armed: false }),
        )
    }
}
