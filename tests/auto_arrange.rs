use std::collections::HashSet;

use auto_arrange::constraints::score_soft_constraints;
use auto_arrange::ids::{Day, TimeslotId, grade_level};
use auto_arrange::{
    AvailableRoom, AvailableTimeslot, ExistingSchedule, SolverInput, UnplacedSubject, solve,
};

const TEACHER: u32 = 100;

fn make_input() -> SolverInput {
    SolverInput {
        teacher_id: TEACHER,
        academic_year: 2567,
        semester: "1".to_string(),
        unplaced_subjects: vec![],
        timeslots: vec![],
        existing_schedules: vec![],
        rooms: vec![],
    }
}

fn make_timeslots(periods_per_day: u32) -> Vec<AvailableTimeslot> {
    Day::SCHOOL_WEEK
        .iter()
        .flat_map(|&day| {
            (1..=periods_per_day).map(move |period| timeslot(day, period, false))
        })
        .collect()
}

fn timeslot(day: Day, period: u32, is_break: bool) -> AvailableTimeslot {
    AvailableTimeslot {
        timeslot_id: TimeslotId::new(1, 2567, day, period).to_string(),
        day,
        period,
        is_break,
    }
}

fn make_rooms(count: u32) -> Vec<AvailableRoom> {
    (1..=count)
        .map(|i| AvailableRoom {
            room_id: i,
            room_name: format!("Room {i}"),
        })
        .collect()
}

fn make_subject(
    resp_id: u32,
    code: &str,
    grade_id: &str,
    periods_per_week: u32,
) -> UnplacedSubject {
    UnplacedSubject {
        resp_id,
        subject_code: code.to_string(),
        subject_name: "คณิตศาสตร์".to_string(),
        grade_id: grade_id.to_string(),
        grade_name: "1/1".to_string(),
        periods_per_week,
        periods_already_placed: 0,
    }
}

fn existing(
    class_id: u32,
    timeslot_id: &str,
    grade_id: &str,
    teacher_id: u32,
    room_id: Option<u32>,
    is_locked: bool,
) -> ExistingSchedule {
    ExistingSchedule {
        class_id,
        timeslot_id: timeslot_id.to_string(),
        subject_code: "ว21101".to_string(),
        grade_id: grade_id.to_string(),
        teacher_id,
        room_id,
        is_locked,
    }
}

/// A crowded week: three sections of M1 and one of M2, other teachers
/// occupying rooms and grades, a lunch break and a locked assembly slot.
fn busy_input() -> SolverInput {
    let mut timeslots = make_timeslots(8);
    for ts in timeslots.iter_mut().filter(|t| t.period == 5) {
        ts.is_break = true;
    }

    let subjects = (0..10)
        .map(|i| {
            let grade = if i == 9 {
                "M2-1".to_string()
            } else {
                format!("M1-{}", i % 3 + 1)
            };
            make_subject(i + 1, &format!("ว{}101", 20 + i), &grade, 3)
        })
        .collect();

    let existing_schedules = vec![
        existing(1, "1-2567-MON1", "M1-1", TEACHER, Some(1), false),
        existing(2, "1-2567-MON2", "M1-2", 200, Some(2), false),
        existing(3, "1-2567-TUE1", "M1-3", 300, Some(1), true),
        existing(4, "1-2567-WED3", "M2-2", 400, Some(3), false),
        existing(5, "1-2567-THU4", "M3-1", 500, None, true),
    ];

    SolverInput {
        unplaced_subjects: subjects,
        timeslots,
        existing_schedules,
        rooms: make_rooms(4),
        ..make_input()
    }
}

#[test]
fn empty_demand_is_a_trivial_success() {
    let result = solve(&make_input());
    assert!(result.success);
    assert!(result.placements.is_empty());
    assert!(result.failures.is_empty());
    assert_eq!(result.stats.quality_score, 0);
}

#[test]
fn scenario_a_single_period() {
    let input = SolverInput {
        unplaced_subjects: vec![make_subject(1, "ค21101", "M1-1", 1)],
        timeslots: make_timeslots(8),
        rooms: make_rooms(3),
        ..make_input()
    };
    let result = solve(&input);

    assert!(result.success);
    assert_eq!(result.placements.len(), 1);
    assert_eq!(result.placements[0].subject_code, "ค21101");
    assert_eq!(result.placements[0].grade_id, "M1-1");
    assert!(result.placements[0].room_id > 0);
}

#[test]
fn scenario_b_three_periods_of_one_subject() {
    let input = SolverInput {
        unplaced_subjects: vec![make_subject(1, "ค21101", "M1-1", 3)],
        timeslots: make_timeslots(8),
        rooms: make_rooms(3),
        ..make_input()
    };
    let result = solve(&input);

    assert!(result.success);
    assert_eq!(result.placements.len(), 3);
    assert!(result.placements.iter().all(|p| p.subject_code == "ค21101"));

    let days: HashSet<Day> = result
        .placements
        .iter()
        .map(|p| p.timeslot_id.parse::<TimeslotId>().unwrap().day)
        .collect();
    assert_eq!(days.len(), 3, "repeats should land on different days");
}

#[test]
fn scenario_c_teacher_already_booked() {
    let input = SolverInput {
        unplaced_subjects: vec![make_subject(1, "ค21101", "M1-1", 1)],
        timeslots: vec![timeslot(Day::Mon, 1, false), timeslot(Day::Mon, 2, false)],
        existing_schedules: vec![existing(1, "1-2567-MON1", "M1-2", TEACHER, Some(1), false)],
        rooms: make_rooms(3),
        ..make_input()
    };
    let result = solve(&input);

    assert!(result.success);
    assert_eq!(result.placements.len(), 1);
    assert_eq!(result.placements[0].timeslot_id, "1-2567-MON2");
}

#[test]
fn grade_already_booked_moves_to_free_slot() {
    let input = SolverInput {
        unplaced_subjects: vec![make_subject(1, "ค21101", "M1-1", 1)],
        timeslots: vec![timeslot(Day::Mon, 1, false), timeslot(Day::Mon, 2, false)],
        existing_schedules: vec![existing(2, "1-2567-MON1", "M1-1", 200, Some(2), false)],
        rooms: make_rooms(3),
        ..make_input()
    };
    let result = solve(&input);

    assert!(result.success);
    assert_eq!(result.placements[0].timeslot_id, "1-2567-MON2");
}

#[test]
fn break_slot_is_skipped_when_alternative_exists() {
    let input = SolverInput {
        unplaced_subjects: vec![make_subject(1, "ค21101", "M1-1", 1)],
        timeslots: vec![timeslot(Day::Mon, 1, true), timeslot(Day::Mon, 2, false)],
        rooms: make_rooms(1),
        ..make_input()
    };
    let result = solve(&input);

    assert!(result.success);
    assert_eq!(result.placements[0].timeslot_id, "1-2567-MON2");
}

#[test]
fn scenario_d_only_a_break_slot() {
    let input = SolverInput {
        unplaced_subjects: vec![make_subject(1, "ค21101", "M1-1", 1)],
        timeslots: vec![timeslot(Day::Mon, 1, true)],
        rooms: make_rooms(1),
        ..make_input()
    };
    let result = solve(&input);

    assert!(!result.success);
    assert_eq!(result.failures.len(), 1);
    assert!(result.placements.is_empty());
}

#[test]
fn scenario_e_no_rooms() {
    let input = SolverInput {
        unplaced_subjects: vec![make_subject(1, "ค21101", "M1-1", 1)],
        timeslots: make_timeslots(2),
        rooms: vec![],
        ..make_input()
    };
    let result = solve(&input);

    assert!(!result.success);
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].reason.contains("ห้อง"));
}

#[test]
fn locked_slot_blocks_sibling_section_only() {
    let input = SolverInput {
        unplaced_subjects: vec![
            make_subject(1, "ค21101", "M1-2", 1),
            make_subject(2, "ค22101", "M2-1", 1),
        ],
        timeslots: vec![timeslot(Day::Mon, 1, false)],
        existing_schedules: vec![existing(1, "1-2567-MON1", "M1-1", 200, Some(1), true)],
        rooms: make_rooms(2),
        ..make_input()
    };
    let result = solve(&input);

    assert_eq!(result.placements.len(), 1);
    assert_eq!(result.placements[0].grade_id, "M2-1");
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].grade_id, "M1-2");
}

#[test]
fn already_placed_periods_are_skipped() {
    let input = SolverInput {
        unplaced_subjects: vec![UnplacedSubject {
            periods_already_placed: 2,
            ..make_subject(1, "ค21101", "M1-1", 3)
        }],
        timeslots: make_timeslots(8),
        rooms: make_rooms(3),
        ..make_input()
    };
    let result = solve(&input);

    assert!(result.success);
    assert_eq!(result.placements.len(), 1);
}

#[test]
fn no_double_booking() {
    let input = busy_input();
    let result = solve(&input);

    let mut teacher_slots = HashSet::new();
    let mut grade_slots = HashSet::new();
    let mut room_slots = HashSet::new();

    for s in &input.existing_schedules {
        if s.teacher_id == TEACHER {
            teacher_slots.insert(s.timeslot_id.clone());
        }
        grade_slots.insert((s.grade_id.clone(), s.timeslot_id.clone()));
        if let Some(room_id) = s.room_id {
            room_slots.insert((room_id, s.timeslot_id.clone()));
        }
    }

    for p in &result.placements {
        assert!(
            teacher_slots.insert(p.timeslot_id.clone()),
            "teacher double booked at {}",
            p.timeslot_id
        );
        assert!(
            grade_slots.insert((p.grade_id.clone(), p.timeslot_id.clone())),
            "grade double booked"
        );
        assert!(room_slots.insert((p.room_id, p.timeslot_id.clone())), "room double booked");
    }
}

#[test]
fn placements_avoid_breaks_and_locks() {
    let input = busy_input();
    let result = solve(&input);

    for p in &result.placements {
        let ts = input
            .timeslots
            .iter()
            .find(|t| t.timeslot_id == p.timeslot_id)
            .unwrap();
        assert!(!ts.is_break);

        let locked_for_level = input.existing_schedules.iter().any(|s| {
            s.is_locked
                && s.timeslot_id == p.timeslot_id
                && grade_level(&s.grade_id) == grade_level(&p.grade_id)
        });
        assert!(!locked_for_level, "{} placed on a locked slot", p.timeslot_id);
    }
}

#[test]
fn every_period_is_accounted_for() {
    let input = busy_input();
    let result = solve(&input);

    let demand: u32 = input
        .unplaced_subjects
        .iter()
        .map(|s| s.periods_per_week - s.periods_already_placed)
        .sum();
    assert_eq!((result.placements.len() + result.failures.len()) as u32, demand);
    assert_eq!(result.stats.total_subjects_to_place as u32, demand);
    assert_eq!(result.stats.successfully_placed, result.placements.len());
    assert_eq!(result.stats.failed, result.failures.len());
    assert_eq!(result.success, result.failures.is_empty());
}

#[test]
fn identical_input_gives_identical_output() {
    let input = busy_input();
    let first = solve(&input);
    let second = solve(&input);

    assert_eq!(first.placements, second.placements);
    assert_eq!(first.failures, second.failures);
    assert_eq!(first.stats.quality_score, second.stats.quality_score);
}

#[test]
fn quality_score_is_bounded() {
    let result = solve(&busy_input());
    assert!(result.stats.quality_score <= 100);
    assert!(result.stats.duration_ms < 10_000);
}

#[test]
fn morning_beats_late_afternoon() {
    let early = score_soft_constraints(&timeslot(Day::Mon, 1, false), "ค21101", "M1-1", &[], &[]);
    let late = score_soft_constraints(&timeslot(Day::Mon, 8, false), "ค21101", "M1-1", &[], &[]);
    assert!(early > late);
}

#[test]
fn thirty_jobs_fit_a_forty_slot_week() {
    let subjects = (0..10)
        .map(|i| make_subject(i + 1, &format!("ว{}101", 20 + i), &format!("M1-{}", i % 3 + 1), 3))
        .collect();
    let input = SolverInput {
        unplaced_subjects: subjects,
        timeslots: make_timeslots(8),
        rooms: make_rooms(10),
        ..make_input()
    };
    let result = solve(&input);

    assert!(result.success);
    assert_eq!(result.placements.len(), 30);
    assert!(result.stats.duration_ms < 10_000);
}
