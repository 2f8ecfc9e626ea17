//! # Double action
//!
//! Combines two actions into one. In parallel mode both halves are started together, in chained
//! mode the second half is started once the first has finished. Either way the double action
//! finishes when both halves have finished, and fails as soon as either half fails.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;

use super::{Action, ActionKind, ActionState, Directive};
use crate::data_store::DataStore;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct DoubleAction {
    first: Action,
    second: Action,
    chained: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DoubleAction {
    pub fn parallel(first: Action, second: Action) -> Self {
        Self {
            first,
            second,
            chained: false,
        }
    }

    pub fn chained(first: Action, second: Action) -> Self {
        Self {
            first,
            second,
            chained: true,
        }
    }

    pub fn first(&self) -> &Action {
        &self.first
    }

    pub fn second(&self) -> &Action {
        &self.second
    }

    /// Replace the first half with an action which is already finished.
    pub fn cancel_first(&mut self) {
        self.first = Action::finished_null();
    }

    /// Replace the second half with an action which is already finished.
    pub fn cancel_second(&mut self) {
        self.second = Action::finished_null();
    }

    pub fn start(&mut self, ds: &mut DataStore) {
        Self::start_half(&mut self.first, ds);
        if !self.chained {
            Self::start_half(&mut self.second, ds);
        }
    }

    fn start_half(half: &mut Action, ds: &mut DataStore) {
        // A cancelled half stays finished
        if half.state() == ActionState::Finished {
            return;
        }

        if let Directive::End(_) = half.start(ds) {
            warn!("End directive of \"{}\" ignored inside a double action", half.name());
        }
    }

    /// Poll both halves, starting the second half of a chain once the first has finished.
    ///
    /// Each half is polled once per cycle here, [`Self::has_failed`] only reads the result.
    pub fn is_finished(&mut self, ds: &mut DataStore) -> bool {
        let first = self.first.poll(ds);

        if self.chained
            && first == ActionState::Finished
            && self.second.state() == ActionState::NotStarted
        {
            self.first.do_at_end(ds);
            Self::start_half(&mut self.second, ds);
        }

        let second = self.second.poll(ds);

        first == ActionState::Finished && second == ActionState::Finished
    }

    pub fn has_failed(&self) -> bool {
        self.first.state() == ActionState::Failed || self.second.state() == ActionState::Failed
    }

    pub fn do_at_end(&mut self, ds: &mut DataStore) {
        // The first half of a chain was cleaned up before the second started
        if !self.chained {
            self.first.do_at_end(ds);
        }
        self.second.do_at_end(ds);
    }

    pub fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

impl Action {
    /// Run both actions at the same time.
    pub fn double(first: Action, second: Action) -> Self {
        Self::new(
            "Double",
            ActionKind::Double(Box::new(DoubleAction::parallel(first, second))),
        )
    }

    /// Run `second` once `first` has finished.
    pub fn chain(first: Action, second: Action) -> Self {
        Self::new(
            "Chain",
            ActionKind::Double(Box::new(DoubleAction::chained(first, second))),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_store::{test_utils::test_store, Fault};
    use crate::io::DigitalInput;
    use std::{cell::Cell, rc::Rc};

    /// A cord which stays in place and counts how often it is read.
    struct CountingInput(Rc<Cell<usize>>);

    impl DigitalInput for CountingInput {
        fn is_high(&mut self) -> bool {
            self.0.set(self.0.get() + 1);
            false
        }
    }

    /// An action which finishes once `fault` is raised, or fails after 1 s.
    fn waiter(fault: Fault) -> Action {
        Action::wait_fault(fault, Some(1.0))
    }

    fn run_double(first_ok: bool, second_ok: bool) -> (bool, bool) {
        let (mut ds, _remote) = test_store();
        let mut action = Action::double(waiter(Fault::Actuator), waiter(Fault::CommsLink));
        action.start(&mut ds);

        if first_ok {
            ds.raise_fault(Fault::Actuator);
        }
        if second_ok {
            ds.raise_fault(Fault::CommsLink);
        }
        ds.time_s = 2.0;

        (action.is_finished(&mut ds), action.has_failed(&mut ds))
    }

    #[test]
    fn test_finish_fail_combinations() {
        assert_eq!(run_double(true, true), (true, false));
        assert_eq!(run_double(true, false), (false, true));
        assert_eq!(run_double(false, true), (false, true));
        assert_eq!(run_double(false, false), (false, true));
    }

    #[test]
    fn test_parallel_waits_for_both() {
        let (mut ds, _remote) = test_store();
        let mut action = Action::double(waiter(Fault::Actuator), Action::sleep(0.5));
        action.start(&mut ds);

        ds.raise_fault(Fault::Actuator);
        ds.time_s = 0.2;
        assert_eq!(action.poll(&mut ds), ActionState::Running);

        ds.time_s = 0.5;
        assert_eq!(action.poll(&mut ds), ActionState::Finished);
    }

    #[test]
    fn test_chained_starts_second_after_first() {
        let (mut ds, _remote) = test_store();
        let mut action = Action::chain(Action::sleep(1.0), Action::sleep(1.0));
        action.start(&mut ds);

        ds.time_s = 0.5;
        assert_eq!(action.poll(&mut ds), ActionState::Running);

        // The second sleep starts when the first one finishes
        ds.time_s = 1.0;
        assert_eq!(action.poll(&mut ds), ActionState::Running);
        ds.time_s = 1.9;
        assert_eq!(action.poll(&mut ds), ActionState::Running);
        ds.time_s = 2.0;
        assert_eq!(action.poll(&mut ds), ActionState::Finished);
    }

    #[test]
    fn test_chained_failure_skips_second() {
        let (mut ds, _remote) = test_store();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();

        let mut action = Action::chain(
            waiter(Fault::Actuator),
            Action::run("Count", move |_| c.set(c.get() + 1)),
        );
        action.start(&mut ds);

        ds.time_s = 1.5;
        assert_eq!(action.poll(&mut ds), ActionState::Failed);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_halves_polled_once_per_cycle() {
        let (mut ds, _remote) = test_store();
        let cord = Rc::new(Cell::new(0));
        ds.start_cord = Box::new(CountingInput(cord.clone()));

        let mut action = Action::double(Action::wait_start_cord(), Action::sleep(10.0));
        action.start(&mut ds);

        for cycle in 1..=5 {
            ds.time_s += 0.1;
            assert_eq!(action.poll(&mut ds), ActionState::Running);
            assert_eq!(cord.get(), cycle);
        }
    }

    #[test]
    fn test_cancel() {
        let (mut ds, _remote) = test_store();
        let mut double = DoubleAction::parallel(Action::sleep(10.0), waiter(Fault::Actuator));
        double.cancel_first();
        double.start(&mut ds);

        ds.raise_fault(Fault::Actuator);
        assert!(double.is_finished(&mut ds));
        assert_eq!(double.first().state(), ActionState::Finished);
    }
}
