use crate::error::ParseError;
use crate::models::{Command, DeveloperName, Month, ProjectName, TimeInterval, ZoneId};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

const MAX_OFFSET_SECONDS: u32 = 18 * 3600;

/// Source of "today" for commands that default to the current month.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// Command line

/// Turns the positional arguments (program name excluded) into a command.
///
/// Missing positions read as empty strings, so they fail in whichever value
/// parser consumes them.
pub fn parse<S: AsRef<str>>(args: &[S], clock: &dyn Clock) -> Result<Command, ParseError> {
    let arg = |index: usize| args.get(index).map_or("", |value| value.as_ref());

    if args.is_empty() {
        return Ok(Command::Help);
    }

    match arg(0) {
        "report" => match args.len() - 1 {
            0 => Ok(Command::GlobalReport {
                month: Month::containing(clock.today()),
            }),
            1 => Ok(Command::GlobalReport {
                month: parse_month(arg(1))?,
            }),
            2 => Ok(Command::DeveloperReport {
                month: parse_month(arg(1))?,
                developer: DeveloperName::new(arg(2))?,
            }),
            _ => Err(ParseError::new(format!(
                "Invalid number of arguments for command {}",
                arg(0)
            ))),
        },
        "list" => {
            let month = parse_month(arg(1))?;
            let developer = args
                .get(2)
                .map(|name| DeveloperName::new(name.as_ref()))
                .transpose()?;
            Ok(Command::ListTimeEntries { month, developer })
        }
        "add" => {
            let zone = parse_zone_id(arg(5))?;
            let developer = DeveloperName::new(arg(1))?;
            let project = ProjectName::new(arg(2))?;
            let start = parse_instant(arg(3), &zone)?;
            let end = parse_instant(arg(4), &zone)?;
            Ok(Command::AddTimeEntry {
                developer,
                project,
                interval: TimeInterval::new(start, end),
                zone,
            })
        }
        other => Err(ParseError::new(format!("Unknown command {}", other))),
    }
}

// Values

pub fn parse_month(value: &str) -> Result<Month, ParseError> {
    parse_value("month", value, |text| {
        if !has_shape(text, "9999-99") {
            return None;
        }
        Month::from_ym(text[..4].parse().ok()?, text[5..].parse().ok()?)
    })
}

/// Reads `yyyy-MM-dd HH:mm` as wall-clock time in `zone`.
pub fn parse_instant(value: &str, zone: &ZoneId) -> Result<DateTime<Utc>, ParseError> {
    parse_value("instant", value, |text| {
        if !has_shape(text, "9999-99-99 99:99") {
            return None;
        }
        let local = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").ok()?;
        Some(zone.to_instant(&local))
    })
}

/// Accepts tz database names (`Europe/Madrid`, `UTC`), `Z`, and fixed
/// offsets such as `+02:00`, `-0530`, `+013000` or `GMT+1`.
pub fn parse_zone_id(value: &str) -> Result<ZoneId, ParseError> {
    parse_value("zoneid", value, |text| {
        if let Some(offset) = parse_offset(text) {
            return Some(ZoneId::Offset(offset));
        }
        text.parse::<Tz>().ok().map(ZoneId::Region)
    })
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    if text == "Z" {
        return FixedOffset::east_opt(0);
    }
    let body = ["UTC", "GMT", "UT"]
        .iter()
        .find_map(|&prefix| {
            text.strip_prefix(prefix)
                .filter(|rest| rest.starts_with(['+', '-']))
        })
        .unwrap_or(text);

    let (sign, digits) = match body.as_bytes().first().copied()? {
        b'+' => (1, &body[1..]),
        b'-' => (-1, &body[1..]),
        _ => return None,
    };
    let number = |range: std::ops::Range<usize>| digits.get(range)?.parse::<u32>().ok();
    let (hours, minutes, seconds) = if has_shape(digits, "9") || has_shape(digits, "99") {
        (number(0..digits.len())?, 0, 0)
    } else if has_shape(digits, "9999") {
        (number(0..2)?, number(2..4)?, 0)
    } else if has_shape(digits, "99:99") {
        (number(0..2)?, number(3..5)?, 0)
    } else if has_shape(digits, "999999") {
        (number(0..2)?, number(2..4)?, number(4..6)?)
    } else if has_shape(digits, "99:99:99") {
        (number(0..2)?, number(3..5)?, number(6..8)?)
    } else {
        return None;
    };

    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    let total = hours * 3600 + minutes * 60 + seconds;
    if total > MAX_OFFSET_SECONDS {
        return None;
    }
    FixedOffset::east_opt(sign * i32::try_from(total).ok()?)
}

fn parse_value<T>(
    kind: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ParseError> {
    parse(value).ok_or_else(|| ParseError::invalid(kind, value))
}

/// `9` in `shape` stands for any ASCII digit, every other byte must match.
fn has_shape(text: &str, shape: &str) -> bool {
    text.len() == shape.len()
        && text.bytes().zip(shape.bytes()).all(|(byte, expected)| match expected {
            b'9' => byte.is_ascii_digit(),
            _ => byte == expected,
        })
}

// Help

pub fn help() -> &'static str {
    "Usage: timetracking <command> [options]

Commands:
  add    <developer> <project> <start> <end> <zoneId>  Adds a new time entry
      developer: developer name
      project: project name
      start: start time in the format yyyy-MM-dd HH:mm
      end: end time in the format yyyy-MM-dd HH:mm
      zoneId: timezone identifier like Europe/Monaco or +02:00

      Example:
        add pepe teto \"2023-01-10 08:00\" \"2023-01-10 17:00\" Europe/Madrid

  list   <month> [<developer>]                         List the time entries for the given month and developer
      month: month in the format yyyy-MM
      developer: developer name
  report [<month>]                                     Show the global time tracking report for the given month
      month: month in the format yyyy-MM, defaults to current month
  report <month> <developer>                           Show the time tracking report for the given developer and month
      month: month in the format yyyy-MM
      developer: developer name
"
}
