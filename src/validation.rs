//! Checks a `SolverInput` before it is handed to the solver.
//!
//! The solver itself tolerates any input shape; these checks reject data
//! that would make its output meaningless for the caller.

use std::collections::HashSet;

use crate::data::SolverInput;
use crate::error::InputError;
use crate::ids::{GradeId, TimeslotId};

/// Returns the first problem found, checking in this order:
/// 1. teacher, academic year and semester are present
/// 2. no subject has more periods placed than it needs
/// 3. every grade id parses
/// 4. every timeslot id parses, belongs to the requested term and agrees
///    with its day and period
/// 5. timeslot ids and room ids are unique
pub fn validate_input(input: &SolverInput) -> Result<(), InputError> {
    if input.teacher_id == 0 || input.academic_year == 0 || input.semester.trim().is_empty() {
        return Err(InputError::MissingScope);
    }

    if let Some(subject) = input
        .unplaced_subjects
        .iter()
        .find(|s| s.periods_already_placed > s.periods_per_week)
    {
        return Err(InputError::OverPlaced {
            subject_code: subject.subject_code.clone(),
            grade_id: subject.grade_id.clone(),
            placed: subject.periods_already_placed,
            per_week: subject.periods_per_week,
        });
    }

    let grade_ids = input
        .unplaced_subjects
        .iter()
        .map(|s| &s.grade_id)
        .chain(input.existing_schedules.iter().map(|e| &e.grade_id));
    for grade_id in grade_ids {
        grade_id.parse::<GradeId>()?;
    }

    let term = format!("{}-{}", input.semester.trim(), input.academic_year);
    let mut seen_timeslots = HashSet::new();
    for ts in &input.timeslots {
        let parsed: TimeslotId = ts.timeslot_id.parse()?;
        if parsed.config_id() != term {
            return Err(InputError::TimeslotOutOfTerm {
                timeslot_id: ts.timeslot_id.clone(),
                term,
            });
        }
        if parsed.day != ts.day || parsed.period != ts.period {
            return Err(InputError::TimeslotMismatch {
                timeslot_id: ts.timeslot_id.clone(),
                day: ts.day.to_string(),
                period: ts.period,
            });
        }
        if !seen_timeslots.insert(ts.timeslot_id.as_str()) {
            return Err(InputError::DuplicateTimeslot(ts.timeslot_id.clone()));
        }
    }

    let mut seen_rooms = HashSet::new();
    if let Some(room) = input.rooms.iter().find(|r| !seen_rooms.insert(r.room_id)) {
        return Err(InputError::DuplicateRoom(room.room_id));
    }

    Ok(())
}
