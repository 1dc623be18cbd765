use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use time::Date;
use tracing::info;

use crate::timetable::{ParityWeeks, Schedule, WeekData};
use crate::Parsed;

const DESCRIPTION: &str = "Физико-технический институт";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacultyConfig {
  pub study_start: Date,
  /// Minutes after midnight.
  pub lesson_start_time: u32,
  /// Minutes.
  pub lesson_length: u32,
  pub breaks: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
  pub id: u32,
  pub name: String,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum LookupError {
  #[error("group {0:?} doesn't exist")]
  UnknownGroup(String),
}

/// Schedules of every known group subgroup of the faculty.
#[derive(Default)]
pub struct Faculty {
  weeks: BTreeMap<String, ParityWeeks>,
}

impl Faculty {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn description(&self) -> &'static str {
    DESCRIPTION
  }

  /// Takes over the weeks of a parsed workbook, replacing subgroups seen before.
  pub fn ingest(&mut self, parsed: Parsed) {
    info!("Ingesting {} subgroups", parsed.weeks.len());
    self.weeks.extend(parsed.weeks);
  }

  /// Ids are the 1-based positions of the subgroup names in sorted order.
  pub fn groups(&self) -> Vec<Group> {
    self
      .weeks
      .keys()
      .zip(1..)
      .map(|(name, id)| Group {
        id,
        name: name.clone(),
      })
      .collect()
  }

  pub fn schedule(
    &self,
    group_id: &str,
    config: &FacultyConfig,
  ) -> Result<Schedule, LookupError> {
    let unknown = || LookupError::UnknownGroup(group_id.to_string());

    let id = group_id.trim().parse::<usize>().map_err(|_| unknown())?;
    let (name, weeks) = id
      .checked_sub(1)
      .and_then(|idx| self.weeks.iter().nth(idx))
      .ok_or_else(unknown)?;

    let data = WeekData::Alternating(weeks.clone());

    Ok(Schedule {
      name: name.clone(),
      study_start_ts: config
        .study_start
        .midnight()
        .assume_utc()
        .unix_timestamp(),
      lesson_start_time: config.lesson_start_time,
      lesson_length: config.lesson_length,
      breaks: config.breaks.clone(),
      has_even_odd: data.has_even_odd(),
      data,
    })
  }
}
