//! Parsing and formatting of the composite identifiers shared with the
//! timetable database.
//!
//! - Timeslot: `"<semester>-<year>-<DAY><period>"`, e.g. `"1-2567-MON1"`
//! - Grade: `"M<year>-<section>"`, e.g. `"M1-2"`, whose grade level is `"M1"`
//!
//! These strings are persisted, so `Display` must reproduce exactly what
//! `FromStr` accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest period number a timeslot id may carry.
pub const MAX_PERIOD: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid timeslot id {0:?}")]
    Timeslot(String),
    #[error("invalid grade id {0:?}")]
    Grade(String),
    #[error("unknown day code {0:?}")]
    Day(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const SCHOOL_WEEK: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn code(self) -> &'static str {
        match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
            Day::Sat => "SAT",
            Day::Sun => "SUN",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Day {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MON" => Ok(Day::Mon),
            "TUE" => Ok(Day::Tue),
            "WED" => Ok(Day::Wed),
            "THU" => Ok(Day::Thu),
            "FRI" => Ok(Day::Fri),
            "SAT" => Ok(Day::Sat),
            "SUN" => Ok(Day::Sun),
            other => Err(IdError::Day(other.to_string())),
        }
    }
}

/// A parsed timeslot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeslotId {
    pub semester: u8,
    pub academic_year: u32,
    pub day: Day,
    pub period: u32,
}

impl TimeslotId {
    pub fn new(semester: u8, academic_year: u32, day: Day, period: u32) -> Self {
        Self {
            semester,
            academic_year,
            day,
            period,
        }
    }

    /// The term key shared by every slot of a semester, e.g. `"1-2567"`.
    pub fn config_id(&self) -> String {
        format!("{}-{}", self.semester, self.academic_year)
    }
}

impl fmt::Display for TimeslotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}{}",
            self.semester, self.academic_year, self.day, self.period
        )
    }
}

impl FromStr for TimeslotId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IdError::Timeslot(s.to_string());

        let mut parts = s.splitn(3, '-');
        let (Some(semester), Some(year), Some(cell)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let semester: u8 = parse_digits(semester).ok_or_else(invalid)?;
        if !(1..=2).contains(&semester) {
            return Err(invalid());
        }
        let academic_year: u32 = parse_digits(year).ok_or_else(invalid)?;

        let digits_at = cell
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (day, period) = cell.split_at(digits_at);
        let day: Day = day.parse().map_err(|_| invalid())?;
        let period: u32 = parse_digits(period).ok_or_else(invalid)?;
        if !(1..=MAX_PERIOD).contains(&period) {
            return Err(invalid());
        }

        Ok(Self::new(semester, academic_year, day, period))
    }
}

/// Day code at the tail of a timeslot id (`"1-2567-MON1"` → `MON`),
/// without validating the rest of the id.
pub fn day_of_timeslot(timeslot_id: &str) -> Option<Day> {
    let head = timeslot_id.trim_end_matches(|c: char| c.is_ascii_digit());
    if head.len() == timeslot_id.len() || head.len() < 3 {
        return None;
    }
    head.get(head.len() - 3..)?.parse().ok()
}

/// A parsed grade (class section) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradeId {
    pub year: u8,
    pub section: u32,
}

impl GradeId {
    pub fn new(year: u8, section: u32) -> Self {
        Self { year, section }
    }

    /// Year group shared by every section, e.g. `"M1"`.
    pub fn level(&self) -> String {
        format!("M{}", self.year)
    }
}

impl fmt::Display for GradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}-{}", self.year, self.section)
    }
}

impl FromStr for GradeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IdError::Grade(s.to_string());

        let (level, section) = s
            .strip_prefix('M')
            .and_then(|rest| rest.split_once('-'))
            .ok_or_else(invalid)?;
        let year = parse_digits(level).ok_or_else(invalid)?;
        let section = parse_digits(section).ok_or_else(invalid)?;

        Ok(Self::new(year, section))
    }
}

/// Grade level of a raw grade id: everything before the first hyphen.
/// Ids without a hyphen are their own level.
pub fn grade_level(grade_id: &str) -> &str {
    grade_id
        .split_once('-')
        .map_or(grade_id, |(level, _)| level)
}

// `str::parse` alone would accept a leading `+` or `0`, and either would
// break the round trip through `Display`.
fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}
