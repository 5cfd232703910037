use crate::models::{DeveloperName, Month};
use crate::repository::{DailyHours, DeveloperHours, StoredTimeEntry};
use crate::utils::{format_duration, format_local, total_duration};

const SEPARATOR_WIDTH: usize = 60;
const WIDE_SEPARATOR_WIDTH: usize = 100;

pub fn global_report(month: Month, rows: &[DeveloperHours]) -> String {
    if rows.is_empty() {
        return no_entries(month, None);
    }
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut lines = vec![
        format!("Time report for {}", month),
        String::new(),
        format!(" {:<20}  {:<20}  {:>10}", "Developer", "Project", "Hours"),
        separator.clone(),
    ];
    for row in rows {
        lines.push(format!(
            " {:<20}  {:<20}  {:>10}",
            row.developer,
            row.project,
            format_duration(row.duration)
        ));
    }
    lines.push(separator);
    lines.push(format!(
        " {:<20}  {:<20}  {:>10}",
        "Total",
        "",
        format_duration(total_duration(rows.iter().map(|row| row.duration)))
    ));
    lines.join("\n")
}

pub fn developer_report(month: Month, developer: &DeveloperName, rows: &[DailyHours]) -> String {
    if rows.is_empty() {
        return no_entries(month, Some(developer));
    }
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut lines = vec![
        format!("Time report for {} in {}", developer, month),
        String::new(),
        format!(" {:<12}  {:<28}  {:>10}", "Date", "Project", "Hours"),
        separator.clone(),
    ];
    for row in rows {
        lines.push(format!(
            " {:<12}  {:<28}  {:>10}",
            row.date.format("%Y-%m-%d").to_string(),
            row.project,
            format_duration(row.duration)
        ));
    }
    lines.push(separator);
    lines.push(format!(
        " {:<12}  {:<28}  {:>10}",
        "Total",
        "",
        format_duration(total_duration(rows.iter().map(|row| row.duration)))
    ));
    lines.join("\n")
}

pub fn entries_listing(
    month: Month,
    developer: Option<&DeveloperName>,
    rows: &[StoredTimeEntry],
) -> String {
    if rows.is_empty() {
        return no_entries(month, developer);
    }
    let separator = "-".repeat(WIDE_SEPARATOR_WIDTH);
    let mut lines = vec![
        format!(
            " {:<5}  {:<12}  {:<12}  {:<16}  {:<16}  {:<16}  {:>8}",
            "ID", "Developer", "Project", "Start", "End", "Zone", "Hours"
        ),
        separator.clone(),
    ];
    for StoredTimeEntry { id, entry } in rows {
        lines.push(format!(
            " {:<5}  {:<12}  {:<12}  {:<16}  {:<16}  {:<16}  {:>8}",
            id,
            entry.developer,
            entry.project,
            format_local(&entry.interval.start, &entry.zone),
            format_local(&entry.interval.end, &entry.zone),
            entry.zone.to_string(),
            format_duration(entry.interval.duration())
        ));
    }
    lines.push(separator);
    lines.join("\n")
}

fn no_entries(month: Month, developer: Option<&DeveloperName>) -> String {
    match developer {
        Some(developer) => format!("No time entries for {} in {}", developer, month),
        None => format!("No time entries for {}", month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectName, TimeEntry, TimeInterval, ZoneId};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn month() -> Month {
        Month::from_ym(2023, 1).unwrap()
    }

    fn developer(name: &str) -> DeveloperName {
        DeveloperName::new(name).unwrap()
    }

    fn project(name: &str) -> ProjectName {
        ProjectName::new(name).unwrap()
    }

    #[test]
    fn empty_reports() {
        assert_eq!(global_report(month(), &[]), "No time entries for 2023-01");
        assert_eq!(
            developer_report(month(), &developer("pepe"), &[]),
            "No time entries for pepe in 2023-01"
        );
        assert_eq!(
            entries_listing(month(), None, &[]),
            "No time entries for 2023-01"
        );
    }

    #[test]
    fn global_report_rows_and_total() {
        let rows = [
            DeveloperHours {
                developer: developer("juan"),
                project: project("teto"),
                duration: Duration::minutes(75),
            },
            DeveloperHours {
                developer: developer("pepe"),
                project: project("teto"),
                duration: Duration::hours(9),
            },
        ];
        let text = global_report(month(), &rows);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Time report for 2023-01");
        assert!(lines[2].contains("Developer"));
        assert!(lines[4].starts_with(" juan"));
        assert!(lines[4].ends_with("1h 15m"));
        assert!(lines[5].ends_with("9h 00m"));
        assert!(lines.last().unwrap().starts_with(" Total"));
        assert!(lines.last().unwrap().ends_with("10h 15m"));
    }

    #[test]
    fn developer_report_by_day() {
        let rows = [DailyHours {
            date: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            project: project("teto"),
            duration: Duration::hours(8),
        }];
        let text = developer_report(month(), &developer("pepe"), &rows);
        assert!(text.starts_with("Time report for pepe in 2023-01"));
        assert!(text.contains(" 2023-01-10    teto"));
        assert!(text.lines().last().unwrap().ends_with("8h 00m"));
    }

    #[test]
    fn listing_shows_times_in_entry_zone() {
        let rows = [StoredTimeEntry {
            id: 7,
            entry: TimeEntry {
                developer: developer("pepe"),
                project: project("teto"),
                interval: TimeInterval::new(
                    Utc.with_ymd_and_hms(2023, 1, 10, 7, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2023, 1, 10, 16, 0, 0).unwrap(),
                ),
                zone: ZoneId::Region(chrono_tz::Europe::Madrid),
            },
        }];
        let text = entries_listing(month(), None, &rows);
        let row = text.lines().nth(2).unwrap();
        assert!(row.starts_with(" 7 "));
        assert!(row.contains("2023-01-10 08:00"));
        assert!(row.contains("2023-01-10 17:00"));
        assert!(row.contains("Europe/Madrid"));
        assert!(row.ends_with("9h 00m"));
    }
}
