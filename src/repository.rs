use crate::error::Result;
use crate::models::{DeveloperName, Month, ProjectName, TimeEntry, TimeInterval};
use crate::parser::parse_zone_id;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTimeEntry {
    pub id: i64,
    pub entry: TimeEntry,
}

/// Total time a developer spent on a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperHours {
    pub developer: DeveloperName,
    pub project: ProjectName,
    pub duration: Duration,
}

/// Total time spent on a project on one local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyHours {
    pub date: NaiveDate,
    pub project: ProjectName,
    pub duration: Duration,
}

pub trait TimeEntriesRepository {
    fn save(&self, entry: &TimeEntry) -> Result<i64>;

    /// Entries starting within `month` in their own zone, oldest first.
    fn list_entries(
        &self,
        month: Month,
        developer: Option<&DeveloperName>,
    ) -> Result<Vec<StoredTimeEntry>>;

    fn developer_hours(&self, month: Month) -> Result<Vec<DeveloperHours>> {
        let mut totals: BTreeMap<(DeveloperName, ProjectName), Duration> = BTreeMap::new();
        for StoredTimeEntry { entry, .. } in self.list_entries(month, None)? {
            let duration = entry.interval.duration();
            let total = totals
                .entry((entry.developer, entry.project))
                .or_insert_with(Duration::zero);
            *total = *total + duration;
        }
        Ok(totals
            .into_iter()
            .map(|((developer, project), duration)| DeveloperHours {
                developer,
                project,
                duration,
            })
            .collect())
    }

    fn developer_daily_hours(
        &self,
        month: Month,
        developer: &DeveloperName,
    ) -> Result<Vec<DailyHours>> {
        let mut totals: BTreeMap<(NaiveDate, ProjectName), Duration> = BTreeMap::new();
        for StoredTimeEntry { entry, .. } in self.list_entries(month, Some(developer))? {
            let total = totals
                .entry((entry.local_date(), entry.project.clone()))
                .or_insert_with(Duration::zero);
            *total = *total + entry.interval.duration();
        }
        Ok(totals
            .into_iter()
            .map(|((date, project), duration)| DailyHours {
                date,
                project,
                duration,
            })
            .collect())
    }
}

pub struct SqliteTimeEntries {
    conn: Connection,
}

impl SqliteTimeEntries {
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening time entries database");
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS time_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                developer TEXT NOT NULL,
                project TEXT NOT NULL,
                start_at INTEGER NOT NULL,
                end_at INTEGER NOT NULL,
                zone_id TEXT NOT NULL,
                local_date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS time_entries_local_date
                ON time_entries (local_date, developer);",
        )?;
        Ok(Self { conn })
    }
}

impl TimeEntriesRepository for SqliteTimeEntries {
    fn save(&self, entry: &TimeEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO time_entries (developer, project, start_at, end_at, zone_id, local_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.developer.as_str(),
                entry.project.as_str(),
                entry.interval.start.timestamp(),
                entry.interval.end.timestamp(),
                entry.zone.to_string(),
                entry.local_date().format(DATE_FORMAT).to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, developer = %entry.developer, project = %entry.project, "saved time entry");
        Ok(id)
    }

    fn list_entries(
        &self,
        month: Month,
        developer: Option<&DeveloperName>,
    ) -> Result<Vec<StoredTimeEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, developer, project, start_at, end_at, zone_id FROM time_entries
             WHERE local_date >= ?1 AND local_date <= ?2 AND (?3 IS NULL OR developer = ?3)
             ORDER BY start_at, id",
        )?;
        let entries = stmt
            .query_map(
                params![
                    month.first_day().format(DATE_FORMAT).to_string(),
                    month.last_day().format(DATE_FORMAT).to_string(),
                    developer.map(DeveloperName::as_str),
                ],
                map_row,
            )?
            .collect::<rusqlite::Result<Vec<StoredTimeEntry>>>()?;
        debug!(%month, count = entries.len(), "listed time entries");
        Ok(entries)
    }
}

// Row mapping

fn map_row(row: &Row<'_>) -> rusqlite::Result<StoredTimeEntry> {
    let developer: String = row.get(1)?;
    let project: String = row.get(2)?;
    let start: i64 = row.get(3)?;
    let end: i64 = row.get(4)?;
    let zone: String = row.get(5)?;

    Ok(StoredTimeEntry {
        id: row.get(0)?,
        entry: TimeEntry {
            developer: DeveloperName::new(&developer).map_err(|e| conversion_failure(1, e))?,
            project: ProjectName::new(&project).map_err(|e| conversion_failure(2, e))?,
            interval: TimeInterval::new(from_epoch(3, start)?, from_epoch(4, end)?),
            zone: parse_zone_id(&zone).map_err(|e| conversion_failure(5, e))?,
        },
    })
}

/// Instants are stored as seconds since the Unix epoch.
fn from_epoch(column: usize, seconds: i64) -> rusqlite::Result<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, seconds))
}

fn conversion_failure<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
