//! Hard-constraint checks and soft-constraint scoring for auto-arrange.
//!
//! Every check is a pure function over the committed schedules and the
//! placements made so far in the current run. A check returns `Ok(())` when
//! the proposed placement passes, or the violation it found.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::data::{AvailableTimeslot, ExistingSchedule, Placement, RoomId, TeacherId};
use crate::ids::{day_of_timeslot, grade_level};

/// Closed set of hard-constraint failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    TeacherConflict,
    RoomConflict,
    GradeConflict,
    BreakSlot,
    LockedSlot,
    AlreadyOccupied,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ViolationKind::TeacherConflict => "TEACHER_CONFLICT",
            ViolationKind::RoomConflict => "ROOM_CONFLICT",
            ViolationKind::GradeConflict => "GRADE_CONFLICT",
            ViolationKind::BreakSlot => "BREAK_SLOT",
            ViolationKind::LockedSlot => "LOCKED_SLOT",
            ViolationKind::AlreadyOccupied => "ALREADY_OCCUPIED",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("[{kind}] {message}")]
pub struct ConstraintViolation {
    pub kind: ViolationKind,
    pub message: String,
}

impl ConstraintViolation {
    fn new(kind: ViolationKind, message: String) -> Self {
        Self { kind, message }
    }
}

pub type CheckResult = Result<(), ConstraintViolation>;

// soft constraint weights
const BASE_SCORE: i32 = 50;
const SAME_DAY_REPEAT_PENALTY: i32 = 20;
const MORNING_BONUS: i32 = 10;
const MORNING_LAST_PERIOD: u32 = 3;
const LATE_PENALTY: i32 = 10;
const LATE_FIRST_PERIOD: u32 = 7;
const OVERLOADED_DAY_PENALTY: i32 = 15;
const OVERLOADED_DAY_THRESHOLD: usize = 6;

pub const MAX_SCORE: u32 = 100;

// ─── hard constraints ───

/// Break periods never receive placements.
pub fn check_break_constraint(timeslot: &AvailableTimeslot) -> CheckResult {
    if timeslot.is_break {
        return Err(ConstraintViolation::new(
            ViolationKind::BreakSlot,
            format!("คาบ {} วัน{} เป็นคาบพัก", timeslot.period, timeslot.day),
        ));
    }
    Ok(())
}

/// A locked schedule blocks its timeslot for every section of the same
/// grade level (a lock on `M1-1` also blocks `M1-2`, but not `M2-1`).
pub fn check_locked_slot(
    timeslot_id: &str,
    grade_id: &str,
    existing_schedules: &[ExistingSchedule],
) -> CheckResult {
    let level = grade_level(grade_id);
    let locked = existing_schedules.iter().find(|s| {
        s.timeslot_id == timeslot_id && s.is_locked && grade_level(&s.grade_id) == level
    });
    if let Some(locked) = locked {
        return Err(ConstraintViolation::new(
            ViolationKind::LockedSlot,
            format!("ช่วงเวลานี้ถูกล็อกไว้ (วิชา {})", locked.subject_code),
        ));
    }
    Ok(())
}

/// `pending_placements` all belong to the teacher being arranged, so any of
/// them at `timeslot_id` is a conflict.
pub fn check_teacher_conflict(
    teacher_id: TeacherId,
    timeslot_id: &str,
    existing_schedules: &[ExistingSchedule],
    pending_placements: &[Placement],
) -> CheckResult {
    if let Some(db) = existing_schedules
        .iter()
        .find(|s| s.timeslot_id == timeslot_id && s.teacher_id == teacher_id)
    {
        return Err(ConstraintViolation::new(
            ViolationKind::TeacherConflict,
            format!("ครูมีคาบสอนวิชา {} ในช่วงเวลานี้แล้ว", db.subject_code),
        ));
    }

    if let Some(pending) = pending_placements
        .iter()
        .find(|p| p.timeslot_id == timeslot_id)
    {
        return Err(ConstraintViolation::new(
            ViolationKind::TeacherConflict,
            format!(
                "ครูถูกจัดสอนวิชา {} ในช่วงเวลานี้แล้ว (รอบนี้)",
                pending.subject_code
            ),
        ));
    }

    Ok(())
}

/// A class section cannot have two subjects at once. Keyed on the exact
/// grade id.
pub fn check_grade_conflict(
    grade_id: &str,
    timeslot_id: &str,
    existing_schedules: &[ExistingSchedule],
    pending_placements: &[Placement],
) -> CheckResult {
    if let Some(db) = existing_schedules
        .iter()
        .find(|s| s.timeslot_id == timeslot_id && s.grade_id == grade_id)
    {
        return Err(ConstraintViolation::new(
            ViolationKind::GradeConflict,
            format!(
                "ชั้น {} มีวิชา {} ในช่วงเวลานี้แล้ว",
                grade_id, db.subject_code
            ),
        ));
    }

    if let Some(pending) = pending_placements
        .iter()
        .find(|p| p.timeslot_id == timeslot_id && p.grade_id == grade_id)
    {
        return Err(ConstraintViolation::new(
            ViolationKind::GradeConflict,
            format!(
                "ชั้น {} ถูกจัดวิชา {} ในช่วงเวลานี้แล้ว (รอบนี้)",
                grade_id, pending.subject_code
            ),
        ));
    }

    Ok(())
}

pub fn check_room_conflict(
    room_id: RoomId,
    timeslot_id: &str,
    existing_schedules: &[ExistingSchedule],
    pending_placements: &[Placement],
) -> CheckResult {
    if let Some(db) = existing_schedules
        .iter()
        .find(|s| s.timeslot_id == timeslot_id && s.room_id == Some(room_id))
    {
        return Err(ConstraintViolation::new(
            ViolationKind::RoomConflict,
            format!(
                "ห้อง {} ถูกใช้สอนวิชา {} ในช่วงเวลานี้แล้ว",
                room_id, db.subject_code
            ),
        ));
    }

    if let Some(pending) = pending_placements
        .iter()
        .find(|p| p.timeslot_id == timeslot_id && p.room_id == room_id)
    {
        return Err(ConstraintViolation::new(
            ViolationKind::RoomConflict,
            format!(
                "ห้อง {} ถูกจัดวิชา {} ในช่วงเวลานี้แล้ว (รอบนี้)",
                room_id, pending.subject_code
            ),
        ));
    }

    Ok(())
}

/// Every hard constraint except the room: break, locked, teacher, grade.
pub fn check_slot_constraints(
    teacher_id: TeacherId,
    grade_id: &str,
    timeslot: &AvailableTimeslot,
    existing_schedules: &[ExistingSchedule],
    pending_placements: &[Placement],
) -> CheckResult {
    check_break_constraint(timeslot)?;
    check_locked_slot(&timeslot.timeslot_id, grade_id, existing_schedules)?;
    check_teacher_conflict(
        teacher_id,
        &timeslot.timeslot_id,
        existing_schedules,
        pending_placements,
    )?;
    check_grade_conflict(
        grade_id,
        &timeslot.timeslot_id,
        existing_schedules,
        pending_placements,
    )
}

/// Runs all hard constraints in the fixed order break, locked, teacher,
/// grade, room and returns the first violation.
pub fn check_all_hard_constraints(
    teacher_id: TeacherId,
    grade_id: &str,
    room_id: RoomId,
    timeslot: &AvailableTimeslot,
    existing_schedules: &[ExistingSchedule],
    pending_placements: &[Placement],
) -> CheckResult {
    check_slot_constraints(
        teacher_id,
        grade_id,
        timeslot,
        existing_schedules,
        pending_placements,
    )?;
    check_room_conflict(
        room_id,
        &timeslot.timeslot_id,
        existing_schedules,
        pending_placements,
    )
}

// ─── soft constraints ───

/// Scores an otherwise valid placement, higher is better, within `0..=100`.
///
/// Starts from 50, then:
/// - -20 for each entry of the same subject and grade already on that day
/// - +10 for periods 1-3, -10 for periods 7 and later
/// - -15 when the grade already has 6 or more entries that day
pub fn score_soft_constraints(
    timeslot: &AvailableTimeslot,
    subject_code: &str,
    grade_id: &str,
    pending_placements: &[Placement],
    existing_schedules: &[ExistingSchedule],
) -> u32 {
    score_against(
        timeslot,
        subject_code,
        grade_id,
        pending_placements.iter(),
        existing_schedules,
    )
}

pub(crate) fn score_against<'a>(
    timeslot: &AvailableTimeslot,
    subject_code: &str,
    grade_id: &str,
    pending_placements: impl IntoIterator<Item = &'a Placement>,
    existing_schedules: &[ExistingSchedule],
) -> u32 {
    let on_day = |timeslot_id: &str| day_of_timeslot(timeslot_id) == Some(timeslot.day);

    let committed = existing_schedules
        .iter()
        .map(|s| (s.subject_code.as_str(), s.grade_id.as_str(), s.timeslot_id.as_str()));
    let pending = pending_placements
        .into_iter()
        .map(|p| (p.subject_code.as_str(), p.grade_id.as_str(), p.timeslot_id.as_str()));

    let mut same_subject_same_day = 0usize;
    let mut grade_entries_on_day = 0usize;
    for (code, grade, timeslot_id) in committed.chain(pending) {
        if grade != grade_id || !on_day(timeslot_id) {
            continue;
        }
        grade_entries_on_day += 1;
        if code == subject_code {
            same_subject_same_day += 1;
        }
    }

    let mut score = BASE_SCORE;
    score -= same_subject_same_day as i32 * SAME_DAY_REPEAT_PENALTY;

    if timeslot.period <= MORNING_LAST_PERIOD {
        score += MORNING_BONUS;
    } else if timeslot.period >= LATE_FIRST_PERIOD {
        score -= LATE_PENALTY;
    }

    if grade_entries_on_day >= OVERLOADED_DAY_THRESHOLD {
        score -= OVERLOADED_DAY_PENALTY;
    }

    score.clamp(0, MAX_SCORE as i32) as u32
}
