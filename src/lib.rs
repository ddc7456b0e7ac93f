//! Auto-arrange solver for school timetables.
//!
//! Places a teacher's outstanding weekly periods (subject × grade) into
//! timeslots and rooms without double booking teachers, grades or rooms,
//! skipping break periods and slots locked for the grade level. Valid
//! options are ranked by soft constraints; periods that cannot be placed
//! are reported back instead of failing the run.

pub mod config;
pub mod constraints;
pub mod data;
pub mod error;
pub mod ids;
pub mod server;
pub mod solver;
pub mod validation;

pub use config::{ServerConfig, SolverConfig};
pub use constraints::{ConstraintViolation, ViolationKind};
pub use data::{
    AvailableRoom, AvailableTimeslot, ExistingSchedule, Placement, PlacementFailure, SolverInput,
    SolverResult, SolverStats, UnplacedSubject,
};
pub use solver::{solve, solve_with_config};
