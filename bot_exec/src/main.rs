//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Cycle clock update
//!         - Actuator board link processing
//!         - Sequence processing, which emits the ghost trajectories
//!         - Ghost actuation
//!         - Position control processing
//!         - Drive actuation (simulated)
//!         - Telemetry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use comms_if::net::MemTransport;
use log::{error, info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use bot_lib::{
    data_store::{DataStore, Fault},
    ghost::GhostError,
    params::BotParams,
    sim::{ScriptedInput, SimActuatorBoard},
    strategy,
    tm::TmWriter,
};
use comms_if::net::Communication;
use util::{
    logger::{logger_init, LevelFilter, LogLevels},
    session::{self, Session},
    time::seconds_to_millis,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period between two telemetry packets.
const TM_PERIOD_S: f64 = 1.0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("bot_exec").wrap_err("Failed to create the session")?;

    // Initialise logger, the ghost traces every cycle so keep it quieter
    let log_levels = LogLevels {
        console: LevelFilter::Info,
        file: LevelFilter::Trace,
        targets: vec![("bot_lib::ghost", LevelFilter::Debug)],
    };
    logger_init(&log_levels, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Robot Executable\n");
    info!("Session directory: {:?}", session.session_root);
    info!("Telemetry file: {:?}\n", session.tm_file_path);

    // ---- LOAD PARAMETERS ----

    let params = BotParams::load().wrap_err("Could not load the executable parameters")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let cycle_period_s = params.exec.cycle_period_s;

    // Link to the simulated actuator board
    let (local, remote) = MemTransport::pair();
    let mut board = SimActuatorBoard::new(
        remote,
        seconds_to_millis(params.exec.sim_actuator_delay_s),
        params.exec.antispam_ms,
    );
    let comms = Communication::new(Box::new(local), params.exec.antispam_ms);

    // Cord pulled after the configured delay, sampled once per cycle
    let start_cord = ScriptedInput::pulled_after(
        (params.exec.sim_start_cord_pull_s / cycle_period_s).round() as usize,
    );

    let mut ds = DataStore::new(&params, comms, Box::new(start_cord));

    let mut seq_mgr = strategy::build().wrap_err("Failed to build the match sequences")?;

    let mut tm = TmWriter::new(&session).wrap_err("Failed to initialise telemetry")?;
    let mut last_tm_s = f64::NEG_INFINITY;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        ds.cycle_start(session::elapsed_seconds());

        if ds.time_s >= params.exec.run_duration_s {
            info!("Run duration of {:.1} s elapsed, stopping", params.exec.run_duration_s);
            break;
        }

        // ---- ACTUATOR BOARD LINK ----

        let now_ms = seconds_to_millis(ds.time_s);

        if let Err(e) = ds.comms.update(now_ms) {
            warn!("Actuator board link error: {}", e);
            ds.raise_fault(Fault::CommsLink);
        }

        if let Err(e) = board.update(now_ms) {
            warn!("Simulated actuator board error: {}", e);
        }

        // ---- SEQUENCE PROCESSING ----

        seq_mgr.step(&mut ds);

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.ghost.actuate_position(cycle_period_s) {
            Ok(()) | Err(GhostError::Locked) => (),
            Err(e @ GhostError::FailSafe { .. }) => {
                error!("{}", e);
                ds.raise_fault(Fault::GhostFailSafe);
            }
            Err(e) => warn!("Error during ghost actuation: {}", e),
        }

        if let Some(actual) = ds.loc_mgr.get_pose() {
            ds.drive_demand = ds.pos_ctrl.proc(&ds.ghost, &actual, cycle_period_s);

            if ds.pos_ctrl.has_error() {
                ds.raise_fault(Fault::PositionCtrl);
            }
        }

        // Simulated drive
        ds.loc_mgr.drive(&ds.drive_demand, cycle_period_s);

        // ---- TELEMETRY ----

        if ds.time_s - last_tm_s >= TM_PERIOD_S {
            last_tm_s = ds.time_s;

            if let Err(e) = tm.write(&ds, &seq_mgr) {
                warn!("Telemetry error: {}", e);
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period_s
                );
                ds.num_consec_cycle_overruns += 1;

                if ds.num_consec_cycle_overruns > params.exec.max_consec_cycle_overruns {
                    ds.raise_fault(Fault::CycleOverrun);
                }
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    if !ds.faults.is_empty() {
        warn!("Faults raised during execution: {:?}", ds.faults.to_vec());
    }

    info!("End of execution after {} cycles", ds.num_cycles);

    Ok(())
}
