//! # Sequence module
//!
//! A [`Sequence`] runs a list of [`Action`]s one after the other, recording the outcome of each
//! slot. Several sequences run side by side in the [`SeqMgr`], for instance the main strategy next
//! to a monitor watching for faults. Actions can pause and resume other sequences through the
//! [`SeqRequest`]s they push on the data store.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod seq_mgr;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use seq_mgr::{SeqMgr, SeqMgrError, SeqRequest, SequenceName};

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info, warn};

use crate::{
    action::{Action, ActionState, Directive},
    data_store::DataStore,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Sequence {
    name: SequenceName,

    actions: Vec<Action>,

    /// Outcome of each slot, parallel to `actions`
    outcomes: Vec<Outcome>,

    /// Index of the current slot, equal to the number of slots once the sequence is over
    index: usize,

    paused: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unset,
    Succeeded,
    Failed,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Sequence {
    pub fn new(name: SequenceName) -> Self {
        Self {
            name,
            actions: Vec::new(),
            outcomes: Vec::new(),
            index: 0,
            paused: false,
        }
    }

    /// Append an action, returning the index of its slot.
    pub fn add(&mut self, action: Action) -> usize {
        self.actions.push(action);
        self.outcomes.push(Outcome::Unset);
        self.actions.len() - 1
    }

    /// Append an action, builder style.
    pub fn with(mut self, action: Action) -> Self {
        self.add(action);
        self
    }

    pub fn name(&self) -> SequenceName {
        self.name
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        self.outcomes.get(index).copied()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True once every slot has been run or skipped.
    pub fn is_over(&self) -> bool {
        self.index >= self.actions.len()
    }

    pub fn current(&self) -> Option<&Action> {
        self.actions.get(self.index)
    }

    /// Run one cycle of the sequence.
    ///
    /// The current action is polled, checking for completion before failure. When it finishes or
    /// fails its outcome is recorded and the next runnable action is started within the same
    /// cycle.
    pub fn step(&mut self, ds: &mut DataStore) {
        if self.paused || self.is_over() {
            return;
        }

        match self.actions[self.index].state() {
            ActionState::NotStarted => self.enter_current(ds),
            ActionState::Running => match self.actions[self.index].poll(ds) {
                ActionState::Finished => {
                    self.actions[self.index].do_at_end(ds);
                    self.complete_current(Outcome::Succeeded);
                    self.enter_current(ds);
                }
                ActionState::Failed => {
                    self.complete_current(Outcome::Failed);
                    self.enter_current(ds);
                }
                _ => (),
            },
            // Already terminal, only reachable if an action was completed outside of the sequence
            ActionState::Finished => {
                self.complete_current(Outcome::Succeeded);
                self.enter_current(ds);
            }
            ActionState::Failed => {
                self.complete_current(Outcome::Failed);
                self.enter_current(ds);
            }
        }
    }

    fn complete_current(&mut self, outcome: Outcome) {
        debug!(
            "{:?} slot {} (\"{}\") {:?}",
            self.name,
            self.index,
            self.actions[self.index].name(),
            outcome
        );
        self.outcomes[self.index] = outcome;
        self.index += 1;
    }

    /// Start the current action, skipping those whose requirement failed.
    fn enter_current(&mut self, ds: &mut DataStore) {
        while !self.paused && !self.is_over() {
            if let Some(req) = self.actions[self.index].requirement() {
                if self.outcomes.get(req) == Some(&Outcome::Failed) {
                    warn!(
                        "{:?} slot {} (\"{}\") skipped, slot {} failed",
                        self.name,
                        self.index,
                        self.actions[self.index].name(),
                        req
                    );
                    self.actions[self.index].skip();
                    self.complete_current(Outcome::Failed);
                    continue;
                }
            }

            if let Directive::End(end) = self.actions[self.index].start(ds) {
                if end.loop_back {
                    info!("{:?} sequence looping back", self.name);
                    self.restart();
                }
                if end.pause {
                    info!("{:?} sequence paused by its end", self.name);
                    self.paused = true;
                }
            }

            return;
        }

        if self.is_over() {
            info!("{:?} sequence over", self.name);
        }
    }

    /// Go back to the first slot, clearing all outcomes.
    pub fn restart(&mut self) {
        for action in self.actions.iter_mut() {
            action.reset();
        }
        for outcome in self.outcomes.iter_mut() {
            *outcome = Outcome::Unset;
        }
        self.index = 0;
    }

    /// Stop stepping the sequence. The current action is started again on resume.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }

        info!("{:?} sequence paused", self.name);
        self.paused = true;

        if let Some(action) = self.actions.get_mut(self.index) {
            action.interrupt();
        }
    }

    /// Step the sequence again, starting its current action over.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }

        info!("{:?} sequence resumed", self.name);
        self.paused = false;

        // An end which paused its sequence is still running, it pauses it again once restarted
        if let Some(action) = self.actions.get_mut(self.index) {
            action.interrupt();
        }
    }
}
