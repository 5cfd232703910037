use crate::error::{AppError, Result};
use crate::models::{Command, TimeEntry};
use crate::parser::help;
use crate::report;
use crate::repository::TimeEntriesRepository;
use crate::utils::format_duration;
use tracing::debug;

/// Applies parsed commands to a time entries repository.
pub struct TimeTrackingApp<R> {
    repository: R,
}

impl<R: TimeEntriesRepository> TimeTrackingApp<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Runs `command` and returns the text to show the user.
    pub fn execute(&self, command: &Command) -> Result<String> {
        debug!(?command, "executing command");
        match command {
            Command::Help => Ok(help().to_string()),
            Command::GlobalReport { month } => {
                let rows = self.repository.developer_hours(*month)?;
                Ok(report::global_report(*month, &rows))
            }
            Command::DeveloperReport { month, developer } => {
                let rows = self.repository.developer_daily_hours(*month, developer)?;
                Ok(report::developer_report(*month, developer, &rows))
            }
            Command::ListTimeEntries { month, developer } => {
                let rows = self.repository.list_entries(*month, developer.as_ref())?;
                Ok(report::entries_listing(*month, developer.as_ref(), &rows))
            }
            Command::AddTimeEntry {
                developer,
                project,
                interval,
                zone,
            } => {
                if !interval.is_ordered() {
                    return Err(AppError::InvalidInterval {
                        start: interval.start,
                        end: interval.end,
                    });
                }
                let entry = TimeEntry {
                    developer: developer.clone(),
                    project: project.clone(),
                    interval: *interval,
                    zone: *zone,
                };
                let id = self.repository.save(&entry)?;
                Ok(format!(
                    "Added time entry {} for {} on {}: {}",
                    id,
                    developer,
                    project,
                    format_duration(interval.duration())
                ))
            }
        }
    }
}
