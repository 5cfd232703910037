use crate::error::ParseError;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use clap::{ArgAction, Parser};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "timetracking")]
#[command(about = "A CLI tool to track developer time against projects", long_about = None)]
pub struct Cli {
    /// SQLite database file, defaults to the user data directory
    #[arg(long, env = "TIMETRACKING_DB")]
    pub database: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Command followed by its positional arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

// Names

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeveloperName(String);

impl DeveloperName {
    pub fn new(name: &str) -> Result<Self, ParseError> {
        non_empty("developer", name).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeveloperName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(name: &str) -> Result<Self, ParseError> {
        non_empty("project", name).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

fn non_empty(kind: &str, name: &str) -> Result<String, ParseError> {
    if name.is_empty() {
        Err(ParseError::invalid(kind, name))
    } else {
        Ok(name.to_string())
    }
}

// Month

/// A calendar year-month, kept as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Years are limited to the four digits of the `yyyy-MM` format.
    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        if !(0..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Stays within four-digit years, unlike the first day of the next month.
    pub fn last_day(&self) -> NaiveDate {
        self.0 + Duration::days(i64::from(self.len_days() - 1))
    }

    pub fn len_days(&self) -> u32 {
        match self.month() {
            2 if is_leap_year(self.year()) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

// Time zones

/// A tz database region or a fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneId {
    Region(Tz),
    Offset(FixedOffset),
}

impl ZoneId {
    /// Reads `local` as wall-clock time in this zone.
    ///
    /// A time repeated by a DST fold resolves to the earlier instant. A time
    /// skipped by a DST gap keeps the offset in force before the gap, which
    /// moves it forward by the length of the gap.
    pub fn to_instant(&self, local: &NaiveDateTime) -> DateTime<Utc> {
        match self {
            ZoneId::Region(tz) => resolve_local(tz, local),
            ZoneId::Offset(offset) => resolve_local(offset, local),
        }
    }

    pub fn to_local(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            ZoneId::Region(tz) => instant.with_timezone(tz).naive_local(),
            ZoneId::Offset(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

fn resolve_local<Z: TimeZone>(zone: &Z, local: &NaiveDateTime) -> DateTime<Utc> {
    match zone.from_local_datetime(local) {
        LocalResult::Single(at) => at.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => {
            // `local` shifted by the offset after the gap lands just before the
            // transition, where the earlier offset is still in force.
            let offset_at = |utc: NaiveDateTime| zone.offset_from_utc_datetime(&utc).fix();
            let shift = |offset: FixedOffset| Duration::seconds(i64::from(offset.local_minus_utc()));
            let guess = offset_at(*local - Duration::hours(18));
            let after = offset_at(*local - shift(guess));
            let before = offset_at(*local - shift(after));
            Utc.from_utc_datetime(&(*local - shift(before)))
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Region(tz) => f.write_str(tz.name()),
            ZoneId::Offset(offset) if offset.local_minus_utc() == 0 => f.write_str("Z"),
            ZoneId::Offset(offset) => write!(f, "{}", offset),
        }
    }
}

// Time entries

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub developer: DeveloperName,
    pub project: ProjectName,
    pub interval: TimeInterval,
    pub zone: ZoneId,
}

impl TimeEntry {
    /// Calendar date the entry starts on, in its own zone.
    pub fn local_date(&self) -> NaiveDate {
        self.zone.to_local(&self.interval.start).date()
    }
}

// Commands

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    GlobalReport {
        month: Month,
    },
    DeveloperReport {
        month: Month,
        developer: DeveloperName,
    },
    ListTimeEntries {
        month: Month,
        developer: Option<DeveloperName>,
    },
    AddTimeEntry {
        developer: DeveloperName,
        project: ProjectName,
        interval: TimeInterval,
        zone: ZoneId,
    },
}
