//! Deployment start time for assignments.
//!
//! The pipeline supplies an hour of day. The assignment is made effective at
//! the next local occurrence of that hour, expressed in UTC.

use chrono::{DateTime, Days, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{ImportError, Result};

/// Wire format the assignment endpoint expects for `EffectiveDate`.
pub const EFFECTIVE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A validated hour of day in the 0-23 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentHour(u32);

impl DeploymentHour {
    /// Validate an hour of day. `24` is accepted as midnight.
    pub fn new(hour: u32) -> Result<Self> {
        match hour {
            0..=23 => Ok(Self(hour)),
            24 => {
                tracing::info!("deployment_time was set to 24, changing to 0");
                Ok(Self(0))
            }
            _ => Err(ImportError::config(
                "deployment_time",
                format!("{} is not a valid 24-hour time (0-23)", hour),
            )),
        }
    }

    pub fn hour(&self) -> u32 {
        self.0
    }

    /// Next local occurrence of this hour strictly after `now`, in UTC.
    pub fn next_occurrence_after(&self, now: DateTime<Local>) -> DateTime<Utc> {
        next_occurrence(&Local, now.naive_local(), self.0)
    }

    pub fn effective_date(&self) -> String {
        self.next_occurrence_after(Local::now())
            .format(EFFECTIVE_DATE_FORMAT)
            .to_string()
    }
}

fn next_occurrence<Tz: TimeZone>(tz: &Tz, now: NaiveDateTime, hour: u32) -> DateTime<Utc> {
    let at_hour = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
    let mut candidate = now.date().and_time(at_hour);
    if candidate <= now {
        candidate = candidate
            .checked_add_days(Days::new(1))
            .unwrap_or(candidate);
    }

    match tz.from_local_datetime(&candidate) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Skipped by a DST transition; the wall-clock hour does not exist today.
        LocalResult::None => Utc.from_utc_datetime(&candidate),
    }
}
