use crate::config::SolverConfig;
use crate::constraints::{
    check_room_conflict, check_slot_constraints, score_against, score_soft_constraints,
};
use crate::data::{
    AvailableRoom, AvailableTimeslot, ExistingSchedule, Placement, PlacementFailure,
    ResponsibilityId, SolverInput, SolverResult, SolverStats, TeacherId, UnplacedSubject,
};
use itertools::Itertools;
use log::{debug, info, trace};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// One period of one subject that needs a slot. A subject needing three
/// periods a week becomes three jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlacementJob<'a> {
    resp_id: ResponsibilityId,
    subject_code: &'a str,
    subject_name: &'a str,
    grade_id: &'a str,
    grade_name: &'a str,
    /// 0-based index of this period within the subject's week.
    period_index: u32,
}

impl PlacementJob<'_> {
    fn failure(&self, reason: String) -> PlacementFailure {
        PlacementFailure {
            resp_id: self.resp_id,
            subject_code: self.subject_code.to_string(),
            grade_id: self.grade_id.to_string(),
            reason,
        }
    }
}

/// Outcome of searching every usable timeslot for one job.
#[derive(Debug)]
enum Search {
    Found(Placement),
    /// Some timeslots passed the teacher/grade checks but no room was free.
    NoRoom,
    NoTimeslot,
}

/// Solves with the default ten second budget.
pub fn solve(input: &SolverInput) -> SolverResult {
    solve_with_config(input, &SolverConfig::default())
}

/// Greedy, most-constrained-first placement of a teacher's outstanding
/// periods.
///
/// 1. expand subjects into one job per missing period
/// 2. drop break timeslots
/// 3. order jobs by how few timeslots pass the teacher/grade checks
/// 4. give each job its best scoring timeslot with the first free room
///
/// Periods that cannot be placed are reported as failures; the run itself
/// never fails.
pub fn solve_with_config(input: &SolverInput, config: &SolverConfig) -> SolverResult {
    let start_time = Instant::now();

    let jobs = expand_to_jobs(&input.unplaced_subjects);
    let usable_timeslots: Vec<&AvailableTimeslot> =
        input.timeslots.iter().filter(|t| !t.is_break).collect();

    info!(
        "Auto-arranging {} periods for teacher {} ({} usable timeslots, {} rooms, {} existing schedules)",
        jobs.len(),
        input.teacher_id,
        usable_timeslots.len(),
        input.rooms.len(),
        input.existing_schedules.len()
    );

    // most constrained first; the sort is stable so ties keep input order
    let ordered_jobs: Vec<&PlacementJob> = jobs
        .iter()
        .map(|job| {
            let valid = count_valid_timeslots(
                job,
                input.teacher_id,
                &usable_timeslots,
                &input.existing_schedules,
            );
            (job, valid)
        })
        .sorted_by_key(|(_, valid)| *valid)
        .map(|(job, valid)| {
            debug!(
                "{} ({}) period {}: {} candidate timeslots",
                job.subject_code,
                job.grade_id,
                job.period_index + 1,
                valid
            );
            job
        })
        .collect();

    let mut placements: Vec<Placement> = Vec::new();
    let mut failures: Vec<PlacementFailure> = Vec::new();

    for &job in &ordered_jobs {
        if timed_out(start_time, config.timeout) {
            trace!(
                "Timed out before {} ({}) period {}",
                job.subject_code,
                job.grade_id,
                job.period_index + 1
            );
            failures.push(job.failure(timeout_reason(config.timeout)));
            continue;
        }

        match find_best_placement(
            job,
            input.teacher_id,
            &usable_timeslots,
            &input.existing_schedules,
            &placements,
            &input.rooms,
        ) {
            Search::Found(placement) => {
                trace!(
                    "Placed {} ({}) at {} in room {}",
                    placement.subject_code,
                    placement.grade_id,
                    placement.timeslot_id,
                    placement.room_id
                );
                placements.push(placement);
            }
            Search::NoRoom => {
                trace!("No free room for {} ({})", job.subject_code, job.grade_id);
                failures.push(job.failure(format!(
                    "ไม่มีห้องว่างสำหรับ {} ({}) คาบที่ {}",
                    job.subject_name,
                    job.grade_name,
                    job.period_index + 1
                )));
            }
            Search::NoTimeslot => {
                trace!("No valid timeslot for {} ({})", job.subject_code, job.grade_id);
                failures.push(job.failure(format!(
                    "ไม่สามารถหาช่วงเวลาที่ว่างสำหรับ {} ({}) คาบที่ {}",
                    job.subject_name,
                    job.grade_name,
                    job.period_index + 1
                )));
            }
        }
    }

    let duration = start_time.elapsed();
    let quality_score =
        compute_quality_score(&placements, &input.existing_schedules, &usable_timeslots);

    info!(
        "Auto-arrange finished in {:.2?}: {} placed, {} failed, quality {}",
        duration,
        placements.len(),
        failures.len(),
        quality_score
    );

    let stats = SolverStats {
        total_subjects_to_place: jobs.len(),
        successfully_placed: placements.len(),
        failed: failures.len(),
        duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        quality_score,
    };

    SolverResult {
        success: failures.is_empty(),
        placements,
        failures,
        stats,
    }
}

fn expand_to_jobs(subjects: &[UnplacedSubject]) -> Vec<PlacementJob<'_>> {
    subjects
        .iter()
        .flat_map(|subject| {
            (0..subject.remaining_periods()).map(move |i| PlacementJob {
                resp_id: subject.resp_id,
                subject_code: &subject.subject_code,
                subject_name: &subject.subject_name,
                grade_id: &subject.grade_id,
                grade_name: &subject.grade_name,
                period_index: subject.periods_already_placed + i,
            })
        })
        .collect()
}

fn timed_out(start_time: Instant, budget: Duration) -> bool {
    start_time.elapsed() > budget
}

fn timeout_reason(budget: Duration) -> String {
    if budget.subsec_millis() == 0 {
        format!("หมดเวลาในการจัดตาราง (เกิน {} วินาที)", budget.as_secs())
    } else {
        format!("หมดเวลาในการจัดตาราง (เกิน {} มิลลิวินาที)", budget.as_millis())
    }
}

/// Timeslots passing the teacher and grade checks before anything is
/// placed. Rooms are not considered.
fn count_valid_timeslots(
    job: &PlacementJob,
    teacher_id: TeacherId,
    timeslots: &[&AvailableTimeslot],
    existing_schedules: &[ExistingSchedule],
) -> usize {
    timeslots
        .iter()
        .filter(|ts| {
            check_slot_constraints(teacher_id, job.grade_id, ts, existing_schedules, &[]).is_ok()
        })
        .count()
}

/// Scores every valid timeslot for `job` and keeps the best; on equal
/// scores the earlier timeslot wins.
fn find_best_placement(
    job: &PlacementJob,
    teacher_id: TeacherId,
    timeslots: &[&AvailableTimeslot],
    existing_schedules: &[ExistingSchedule],
    pending_placements: &[Placement],
    rooms: &[AvailableRoom],
) -> Search {
    let mut best: Option<(u32, &AvailableTimeslot, &AvailableRoom)> = None;
    let mut saw_valid_timeslot = false;

    for &ts in timeslots {
        if check_slot_constraints(
            teacher_id,
            job.grade_id,
            ts,
            existing_schedules,
            pending_placements,
        )
        .is_err()
        {
            continue;
        }
        saw_valid_timeslot = true;

        let Some(room) =
            find_available_room(&ts.timeslot_id, rooms, existing_schedules, pending_placements)
        else {
            continue;
        };

        let score = score_soft_constraints(
            ts,
            job.subject_code,
            job.grade_id,
            pending_placements,
            existing_schedules,
        );

        if best.is_none_or(|(best_score, _, _)| score > best_score) {
            best = Some((score, ts, room));
        }
    }

    match best {
        Some((_, ts, room)) => Search::Found(Placement {
            resp_id: job.resp_id,
            subject_code: job.subject_code.to_string(),
            grade_id: job.grade_id.to_string(),
            timeslot_id: ts.timeslot_id.clone(),
            room_id: room.room_id,
        }),
        None if saw_valid_timeslot => Search::NoRoom,
        None => Search::NoTimeslot,
    }
}

/// First room in list order that is free at `timeslot_id`.
fn find_available_room<'r>(
    timeslot_id: &str,
    rooms: &'r [AvailableRoom],
    existing_schedules: &[ExistingSchedule],
    pending_placements: &[Placement],
) -> Option<&'r AvailableRoom> {
    rooms.iter().find(|room| {
        check_room_conflict(room.room_id, timeslot_id, existing_schedules, pending_placements)
            .is_ok()
    })
}

/// Mean soft score of all placements, each scored against every other
/// placement and the committed schedules.
fn compute_quality_score(
    placements: &[Placement],
    existing_schedules: &[ExistingSchedule],
    timeslots: &[&AvailableTimeslot],
) -> u32 {
    if placements.is_empty() {
        return 0;
    }

    let timeslot_map: HashMap<&str, &AvailableTimeslot> = timeslots
        .iter()
        .map(|t| (t.timeslot_id.as_str(), *t))
        .collect();

    let total: u32 = placements
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let ts = timeslot_map.get(p.timeslot_id.as_str())?;
            let others = placements
                .iter()
                .enumerate()
                .filter(move |(j, _)| *j != i)
                .map(|(_, other)| other);
            Some(score_against(
                ts,
                &p.subject_code,
                &p.grade_id,
                others,
                existing_schedules,
            ))
        })
        .sum();

    (f64::from(total) / placements.len() as f64).round() as u32
}
