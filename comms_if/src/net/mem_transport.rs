//! In-memory transport
//!
//! Two ends of a byte pipe living in the same process. Used by the simulation to stand in for the
//! serial link to the actuator board, and by tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{CommsError, Transport};

type Pipe = Rc<RefCell<VecDeque<u8>>>;

/// One end of an in-memory byte pipe.
#[derive(Debug, Clone)]
pub struct MemTransport {
    tx: Pipe,
    rx: Pipe,
}

impl MemTransport {
    /// Create a connected pair, bytes written to one end can be read from the other.
    pub fn pair() -> (Self, Self) {
        let a_to_b: Pipe = Rc::new(RefCell::new(VecDeque::new()));
        let b_to_a: Pipe = Rc::new(RefCell::new(VecDeque::new()));

        (
            Self { tx: a_to_b.clone(), rx: b_to_a.clone() },
            Self { tx: b_to_a, rx: a_to_b },
        )
    }

    /// Number of bytes waiting to be read on this end.
    pub fn available(&self) -> usize {
        self.rx.borrow().len()
    }
}

impl Transport for MemTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CommsError> {
        self.tx.borrow_mut().extend(bytes.iter().copied());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CommsError> {
        let mut rx = self.rx.borrow_mut();
        let num = buf.len().min(rx.len());

        for (slot, byte) in buf.iter_mut().zip(rx.drain(..num)) {
            *slot = byte;
        }

        Ok(num)
    }
}
