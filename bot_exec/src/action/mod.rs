//! # Action module
//!
//! An [`Action`] is one step of a [`Sequence`](crate::sequence::Sequence): a move, an exchange with
//! the actuator board, a wait, a callback, or a combination of two actions.
//!
//! Every action follows the same lifecycle:
//!
//! - `start` is called once when the sequence reaches the action (and again if the sequence was
//!   paused and resumed while the action was running),
//! - `is_finished` and `has_failed` are polled on every following cycle until one of them is true,
//! - `do_at_end` is called once if the action finished.
//!
//! An action may require an earlier slot of its sequence to have succeeded, if that slot failed the
//! action is skipped and recorded as failed.
//!
//! The behaviour of each kind of action lives in the variants of [`ActionKind`], the [`Action`]
//! struct carries the bookkeeping common to all of them.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod comm;
mod double;
mod misc;
mod motion;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use comm::{SendAction, SwitchMessageAction, WaitMessageAction};
pub use double::DoubleAction;
pub use misc::{
    DoAction, EndAction, PauseSeqAction, ResumeSeqAction, SleepAction, WaitFaultAction,
    WaitStartCordAction,
};
pub use motion::{Axis, BrakeAction, MoveAction, MoveFinish, MoveTarget, Wall};

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info, warn};

use crate::data_store::DataStore;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A callback run on the data store, used by [`DoAction`] and [`SwitchMessageAction`].
pub type ActionFn = Box<dyn FnMut(&mut DataStore)>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A step of a sequence.
pub struct Action {
    name: &'static str,

    /// Time after which the action fails, `None` for no limit
    timeout_s: Option<f64>,

    /// Index of a slot of the same sequence which must have succeeded before this one can start
    require: Option<usize>,

    state: ActionState,

    /// Time at which the action was last started
    started_s: f64,

    /// Set by actions which complete within `start`
    done: bool,

    kind: ActionKind,
}

/// Sent by an action's `start` to the sequence running it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EndDirective {
    /// Restart the sequence from its first slot, clearing all outcomes
    pub loop_back: bool,

    /// Pause the sequence
    pub pause: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActionState {
    NotStarted,
    Running,
    Finished,
    Failed,
}

/// Instruction returned by [`Action::start`] to the sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Directive {
    None,
    End(EndDirective),
}

pub enum ActionKind {
    Move(MoveAction),
    Brake(BrakeAction),
    Send(SendAction),
    WaitMessage(WaitMessageAction),
    SwitchMessage(SwitchMessageAction),
    Sleep(SleepAction),
    Null,
    End(EndAction),
    Do(DoAction),
    PauseSeq(PauseSeqAction),
    ResumeSeq(ResumeSeqAction),
    WaitFault(WaitFaultAction),
    WaitStartCord(WaitStartCordAction),
    // In a box as it holds two actions
    Double(Box<DoubleAction>),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Action {
    pub fn new(name: &'static str, kind: ActionKind) -> Self {
        Self {
            name,
            timeout_s: None,
            require: None,
            state: ActionState::NotStarted,
            started_s: 0.0,
            done: false,
            kind,
        }
    }

    /// Rename the action, names are only used in the logs.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Fail the action if it has not finished after `timeout_s` seconds.
    ///
    /// Actions which can only end on their own terms ignore the timeout, setting one on them is
    /// logged and has no effect.
    pub fn with_timeout(mut self, timeout_s: f64) -> Self {
        if self.honours_timeout() {
            self.timeout_s = Some(timeout_s);
        } else {
            warn!(
                "Timeout of {:.3} s ignored on action \"{}\"",
                timeout_s, self.name
            );
        }
        self
    }

    /// False for the kinds of action which never fail on a timeout.
    fn honours_timeout(&self) -> bool {
        !matches!(
            self.kind,
            ActionKind::Sleep(_)
                | ActionKind::Null
                | ActionKind::End(_)
                | ActionKind::WaitStartCord(_)
                | ActionKind::Double(_)
        )
    }

    /// Only run the action if slot `index` of the sequence succeeded.
    pub fn require(mut self, index: usize) -> Self {
        self.require = Some(index);
        self
    }

    /// An action which finishes as soon as it is polled.
    pub fn null() -> Self {
        Self::new("Null", ActionKind::Null)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn timeout(&self) -> Option<f64> {
        self.timeout_s
    }

    pub fn requirement(&self) -> Option<usize> {
        self.require
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Start, or restart, the action.
    pub fn start(&mut self, ds: &mut DataStore) -> Directive {
        self.state = ActionState::Running;
        self.started_s = ds.time_s;
        self.done = false;

        info!("Action \"{}\" started", self.name);

        match &mut self.kind {
            ActionKind::Move(a) => a.start(ds),
            ActionKind::Brake(a) => a.start(ds),
            ActionKind::Send(a) => {
                a.start(ds);
                self.done = true;
            }
            ActionKind::WaitMessage(_) | ActionKind::SwitchMessage(_) | ActionKind::Sleep(_) => (),
            ActionKind::Null => self.done = true,
            ActionKind::End(a) => return a.start(ds),
            ActionKind::Do(a) => {
                a.start(ds);
                self.done = true;
            }
            ActionKind::PauseSeq(a) => {
                a.start(ds);
                self.done = true;
            }
            ActionKind::ResumeSeq(a) => {
                a.start(ds);
                self.done = true;
            }
            ActionKind::WaitFault(_) => (),
            ActionKind::WaitStartCord(a) => a.start(),
            ActionKind::Double(a) => a.start(ds),
        }

        Directive::None
    }

    /// True once the action has completed its work.
    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        let elapsed_s = ds.time_s - self.started_s;

        match &mut self.kind {
            ActionKind::Move(a) => a.is_finished(ds),
            ActionKind::Brake(a) => a.is_finished(ds),
            ActionKind::WaitMessage(a) => a.is_finished(ds),
            ActionKind::SwitchMessage(a) => a.is_finished(ds),
            ActionKind::Sleep(a) => a.is_finished(elapsed_s),
            ActionKind::End(_) => false,
            ActionKind::WaitFault(a) => a.is_finished(ds),
            ActionKind::WaitStartCord(a) => a.is_finished(ds),
            ActionKind::Double(a) => a.is_finished(ds),
            ActionKind::Send(_)
            | ActionKind::Null
            | ActionKind::Do(_)
            | ActionKind::PauseSeq(_)
            | ActionKind::ResumeSeq(_) => self.done,
        }
    }

    /// True if the action can no longer finish.
    ///
    /// By default an action fails once it has been running for strictly longer than its timeout.
    pub fn has_failed(&mut self, ds: &mut DataStore) -> bool {
        let timed_out = match self.timeout_s {
            Some(t) => ds.time_s - self.started_s > t,
            None => false,
        };

        match &mut self.kind {
            ActionKind::Move(a) => a.has_failed(ds) || timed_out,
            ActionKind::Brake(a) => a.has_failed(ds) || timed_out,
            ActionKind::Sleep(_)
            | ActionKind::Null
            | ActionKind::End(_)
            | ActionKind::WaitStartCord(_) => false,
            ActionKind::Double(a) => a.has_failed(),
            ActionKind::Send(_)
            | ActionKind::WaitMessage(_)
            | ActionKind::SwitchMessage(_)
            | ActionKind::Do(_)
            | ActionKind::PauseSeq(_)
            | ActionKind::ResumeSeq(_)
            | ActionKind::WaitFault(_) => timed_out,
        }
    }

    /// Clean up after the action finished.
    pub fn do_at_end(&mut self, ds: &mut DataStore) {
        match &mut self.kind {
            ActionKind::Move(_) | ActionKind::Brake(_) => ds.pos_ctrl.reset_integrals(),
            ActionKind::Double(a) => a.do_at_end(ds),
            _ => (),
        }
    }

    /// Update the state of a running action, checking for completion before failure.
    pub fn poll(&mut self, ds: &mut DataStore) -> ActionState {
        if self.state == ActionState::Running {
            if self.is_finished(ds) {
                info!("Action \"{}\" finished", self.name);
                self.state = ActionState::Finished;
            } else if self.has_failed(ds) {
                warn!("Action \"{}\" failed", self.name);
                self.state = ActionState::Failed;
            }
        }

        self.state
    }

    /// Mark the action as failed without running it.
    pub fn skip(&mut self) {
        self.state = ActionState::Failed;
    }

    /// Return the action to its initial state.
    pub fn reset(&mut self) {
        self.state = ActionState::NotStarted;
        self.done = false;

        if let ActionKind::Double(a) = &mut self.kind {
            a.reset();
        }
    }

    /// Stop a running action so that it is started again when its sequence resumes.
    ///
    /// Actions which already completed their work are left to finish.
    pub fn interrupt(&mut self) {
        if self.state == ActionState::Running && !self.done {
            debug!("Action \"{}\" interrupted", self.name);
            self.reset();
        }
    }

    /// An action which is already finished, used to cancel one half of a [`DoubleAction`].
    fn finished_null() -> Self {
        let mut null = Self::null();
        null.state = ActionState::Finished;
        null
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_store::test_utils::test_store;

    #[test]
    fn test_timeout_is_strict() {
        let (mut ds, _remote) = test_store();
        let mut action = Action::new(
            "WaitFault",
            ActionKind::WaitFault(WaitFaultAction::new(crate::data_store::Fault::Actuator)),
        )
        .with_timeout(1.0);

        ds.time_s = 2.0;
        action.start(&mut ds);

        ds.time_s = 3.0;
        assert!(!action.has_failed(&mut ds));
        ds.time_s = 3.01;
        assert!(action.has_failed(&mut ds));
        assert_eq!(action.poll(&mut ds), ActionState::Failed);

        // Terminal states are not polled again
        ds.raise_fault(crate::data_store::Fault::Actuator);
        assert_eq!(action.poll(&mut ds), ActionState::Failed);
    }

    #[test]
    fn test_finished_checked_before_failed() {
        let (mut ds, _remote) = test_store();

        // A callback action finishes on its first poll even with a timeout already expired
        let mut action = Action::run("Noop", |_| ()).with_timeout(0.0);
        action.start(&mut ds);
        ds.time_s = 1.0;

        assert!(action.has_failed(&mut ds));
        assert_eq!(action.poll(&mut ds), ActionState::Finished);
    }

    #[test]
    fn test_timeout_ignored_where_unsupported() {
        let (mut ds, _remote) = test_store();

        let mut sleep = Action::sleep(5.0).with_timeout(1.0);
        assert_eq!(sleep.timeout(), None);

        let mut chain = Action::chain(Action::null(), Action::sleep(5.0)).with_timeout(1.0);
        assert_eq!(chain.timeout(), None);

        sleep.start(&mut ds);
        chain.start(&mut ds);
        ds.time_s = 2.0;
        assert_eq!(sleep.poll(&mut ds), ActionState::Running);
        assert_eq!(chain.poll(&mut ds), ActionState::Running);

        // Kinds which honour it keep it
        let wait = Action::wait_fault(crate::data_store::Fault::Actuator, Some(1.0));
        assert_eq!(wait.timeout(), Some(1.0));
    }

    #[test]
    fn test_interrupt() {
        let (mut ds, _remote) = test_store();

        let mut sleep = Action::sleep(1.0);
        sleep.start(&mut ds);
        sleep.interrupt();
        assert_eq!(sleep.state(), ActionState::NotStarted);

        // Instant actions keep their completion
        let mut null = Action::null();
        null.start(&mut ds);
        null.interrupt();
        assert_eq!(null.state(), ActionState::Running);
        assert_eq!(null.poll(&mut ds), ActionState::Finished);
    }
}
