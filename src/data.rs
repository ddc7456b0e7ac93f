use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::Day;

// Type aliases for clarity
pub type ResponsibilityId = u32;
pub type TeacherId = u32;
pub type RoomId = u32;
pub type ScheduleId = u32;

/// One subject-grade teaching obligation that still needs timeslots.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedSubject {
    pub resp_id: ResponsibilityId,
    pub subject_code: String,
    pub subject_name: String,
    pub grade_id: String,
    pub grade_name: String,
    pub periods_per_week: u32,
    pub periods_already_placed: u32,
}

impl UnplacedSubject {
    /// Periods still to be placed this week.
    pub fn remaining_periods(&self) -> u32 {
        self.periods_per_week
            .saturating_sub(self.periods_already_placed)
    }
}

/// One schedulable (day, period) cell of the week.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableTimeslot {
    /// `"<semester>-<year>-<DAY><period>"`, e.g. `"1-2567-MON1"`.
    pub timeslot_id: String,
    pub day: Day,
    /// 1-based period of the day.
    pub period: u32,
    pub is_break: bool,
}

/// A class period already committed to the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingSchedule {
    pub class_id: ScheduleId,
    pub timeslot_id: String,
    pub subject_code: String,
    pub grade_id: String,
    pub teacher_id: TeacherId,
    pub room_id: Option<RoomId>,
    /// Locked entries cannot be overwritten by auto-arrange.
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableRoom {
    pub room_id: RoomId,
    pub room_name: String,
}

/// A single placement decided by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub resp_id: ResponsibilityId,
    pub subject_code: String,
    pub grade_id: String,
    pub timeslot_id: String,
    pub room_id: RoomId,
}

/// A period the solver could not place. `reason` is already localized for
/// end users and should be shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementFailure {
    pub resp_id: ResponsibilityId,
    pub subject_code: String,
    pub grade_id: String,
    pub reason: String,
}

impl fmt::Display for PlacementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.subject_code, self.grade_id, self.reason)
    }
}

/// The complete input for one auto-arrange run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverInput {
    pub teacher_id: TeacherId,
    pub academic_year: u32,
    pub semester: String,
    pub unplaced_subjects: Vec<UnplacedSubject>,
    pub timeslots: Vec<AvailableTimeslot>,
    /// Committed schedules of every teacher for the term.
    pub existing_schedules: Vec<ExistingSchedule>,
    pub rooms: Vec<AvailableRoom>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverStats {
    pub total_subjects_to_place: usize,
    pub successfully_placed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    /// Mean soft-constraint score of the placements, 0..=100.
    pub quality_score: u32,
}

/// The final output of the solver.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    pub success: bool,
    pub placements: Vec<Placement>,
    pub failures: Vec<PlacementFailure>,
    pub stats: SolverStats,
}
