//! # Data Store
//!
//! The context shared by every action of every sequence: time, the ghost, localisation, position
//! control, the link to the actuator board and the fault flags.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::VecDeque;

use comms_if::net::Communication;
use log::{info, warn};
use serde::Serialize;

use crate::{
    ghost::Ghost,
    io::DigitalInput,
    loc::LocMgr,
    motion::{MoveProfiles, Pose, Side, Target, Twist},
    params::BotParams,
    pos_ctrl::PosCtrl,
    sequence::SeqRequest,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Initial capacity of the sequence request queue.
const SEQ_REQUEST_CAPACITY: usize = 8;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Faults which can be raised during execution.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub enum Fault {
    /// The ghost fail-safe tripped and the ghost is locked
    GhostFailSafe,

    /// The position tracking error persisted
    PositionCtrl,

    /// The link to the actuator board failed
    CommsLink,

    /// The actuator board reported a stuck actuator
    Actuator,

    /// Too many consecutive cycle overruns
    CycleOverrun,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A set of [`Fault`]s.
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone)]
pub struct FaultSet(u8);

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// Time since the start of the session
    pub time_s: f64,

    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    // Table
    pub side: Side,
    pub field_length_m: f64,

    // Motion
    pub ghost: Ghost,
    pub loc_mgr: LocMgr,
    pub pos_ctrl: PosCtrl,
    pub move_profiles: MoveProfiles,

    /// Drive demand output by position control this cycle
    pub drive_demand: Twist,

    // Equipment
    /// Link to the actuator board
    pub comms: Communication,

    pub start_cord: Box<dyn DigitalInput>,

    // Monitoring
    pub faults: FaultSet,

    /// Pause and resume requests emitted by actions, applied by the sequence manager
    pub seq_requests: VecDeque<SeqRequest>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Fault {
    pub const ALL: [Fault; 5] = [
        Fault::GhostFailSafe,
        Fault::PositionCtrl,
        Fault::CommsLink,
        Fault::Actuator,
        Fault::CycleOverrun,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl FaultSet {
    pub fn insert(&mut self, fault: Fault) -> bool {
        let new = !self.contains(fault);
        self.0 |= fault.bit();
        new
    }

    pub fn remove(&mut self, fault: Fault) -> bool {
        let present = self.contains(fault);
        self.0 &= !fault.bit();
        present
    }

    pub fn contains(&self, fault: Fault) -> bool {
        self.0 & fault.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The raised faults.
    pub fn to_vec(&self) -> Vec<Fault> {
        Fault::ALL.iter().copied().filter(|f| self.contains(*f)).collect()
    }
}

impl DataStore {
    /// Build the data store from the parameters, with the robot at its initial pose.
    pub fn new(
        params: &BotParams,
        comms: Communication,
        start_cord: Box<dyn DigitalInput>,
    ) -> Self {
        let side = params.exec.side;
        let field_length_m = params.exec.field_length_m;
        let initial_pose = params.exec.initial_pose.resolve(side, field_length_m);

        let mut loc_mgr = LocMgr::new(params.exec.loc_source);
        loc_mgr.set_pose(initial_pose);

        info!("Playing on the {:?} side, starting at {}", side, initial_pose);

        Self {
            num_cycles: 0,
            time_s: 0.0,
            num_consec_cycle_overruns: 0,
            side,
            field_length_m,
            ghost: Ghost::new(params.ghost, initial_pose),
            loc_mgr,
            pos_ctrl: PosCtrl::new(params.pos_ctrl.clone()),
            move_profiles: params.move_profiles,
            drive_demand: Twist::default(),
            comms,
            start_cord,
            faults: FaultSet::default(),
            seq_requests: VecDeque::with_capacity(SEQ_REQUEST_CAPACITY),
        }
    }

    /// Perform actions required at the start of a cycle.
    pub fn cycle_start(&mut self, time_s: f64) {
        self.time_s = time_s;
        self.drive_demand = Twist::default();
    }

    /// Resolve a strategy target for the side the robot plays on.
    pub fn resolve(&self, target: &Target) -> Pose {
        target.resolve(self.side, self.field_length_m)
    }

    pub fn raise_fault(&mut self, fault: Fault) {
        if self.faults.insert(fault) {
            warn!("Fault raised: {:?}", fault);
        }
    }

    pub fn clear_fault(&mut self, fault: Fault) {
        if self.faults.remove(fault) {
            info!("Fault cleared: {:?}", fault);
        }
    }

    pub fn has_fault(&self, fault: Fault) -> bool {
        self.faults.contains(fault)
    }

    /// Queue a request on the sequence registry, applied after the current sequence's step.
    pub fn request(&mut self, request: SeqRequest) {
        self.seq_requests.push_back(request);
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use crate::{loc::LocSource, sim::ScriptedInput};
    use comms_if::net::MemTransport;

    /// A data store on the primary side with the pose only changed by hand, returning the remote
    /// end of the actuator board link.
    pub fn test_store() -> (DataStore, MemTransport) {
        let mut params = BotParams::default();
        params.exec.loc_source = LocSource::OnSet;

        let (local, remote) = MemTransport::pair();
        let comms = Communication::new(Box::new(local), 0);

        (
            DataStore::new(&params, comms, Box::new(ScriptedInput::new(vec![]))),
            remote,
        )
    }
}
