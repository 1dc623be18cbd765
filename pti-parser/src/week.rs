use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Diagnostic, ParseError};
use crate::grid::{coordinate, CellGrid};
use crate::header::{locate_groups, WeekBlock};
use crate::lesson::extract_lesson;
use crate::timetable::{Lesson, Week};

const DAYS_OF_WEEK: [&str; 6] = [
  "понедельник",
  "вторник",
  "среда",
  "четверг",
  "пятница",
  "суббота",
];

const FIRST_DATA_ROW: u32 = 5;
/// Lesson type column, left of the first subgroup column.
const TYPE_COLUMN_OFFSET: u32 = 1;
/// Lesson number column, right of the weekday column and shared by every group of the block.
const ORDINAL_COLUMN_OFFSET: u32 = 1;
const SECOND_SUBGROUP_OFFSET: u32 = 1;
/// Lesson numbers above this are treated as garbage.
const MAX_LESSONS: usize = 12;
const TYPE_SEPARATOR: char = '/';

pub fn subgroup_key(group: &str, subgroup: u8) -> String {
  format!("{group}({subgroup})")
}

fn weekday_index(value: &str) -> Option<usize> {
  let value = value.trim().to_lowercase();
  DAYS_OF_WEEK.iter().position(|day| *day == value)
}

/// A lesson in the first subgroup column spanning a merged region is shared by both subgroups.
pub fn is_shared<G: CellGrid>(sheet: &G, row: u32, col: u32) -> bool {
  sheet.is_merged(row, col)
}

struct WeekBuilder<'a, G> {
  sheet: &'a G,
  block: &'a WeekBlock,
  weeks: BTreeMap<String, Week>,
  current_day: Option<usize>,
  /// Lesson number of the current row, read once by the first group that needs it.
  row_ordinal: Option<Option<usize>>,
  diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a, G: CellGrid> WeekBuilder<'a, G> {
  fn skip(&mut self, row: u32, col: u32, error: ParseError) {
    let cell = coordinate(row, col);
    warn!(
      "Skipping lesson at {} in sheet {}: {}",
      cell,
      self.sheet.name(),
      error
    );

    self.diagnostics.push(Diagnostic {
      sheet: self.sheet.name().to_string(),
      cell: Some(cell),
      error,
    });
  }

  fn extract(&mut self, row: u32, col: u32, abbreviation: &str) -> Option<Lesson> {
    match extract_lesson(self.sheet, row, col, abbreviation) {
      Ok(lesson) => Some(lesson),
      Err(err) => {
        self.skip(row, col, err);
        None
      }
    }
  }

  fn save(&mut self, group: &str, subgroup: u8, day: usize, ordinal: usize, lesson: Lesson) {
    if let Some(week) = self.weeks.get_mut(&subgroup_key(group, subgroup)) {
      week.insert(day, ordinal, lesson);
    }
  }

  fn ordinal(&mut self, row: u32) -> Option<usize> {
    if let Some(ordinal) = self.row_ordinal {
      return ordinal;
    }

    let col = self.block.anchor.col + ORDINAL_COLUMN_OFFSET;
    let raw = self.sheet.cell(row, col).unwrap_or_default();

    let ordinal = match raw.parse::<usize>() {
      Ok(ordinal) if (1..=MAX_LESSONS).contains(&ordinal) => Some(ordinal),
      _ => {
        self.skip(row, col, ParseError::InvalidOrdinal(raw));
        None
      }
    };

    self.row_ordinal = Some(ordinal);
    ordinal
  }

  fn process(&mut self, row: u32, group: &str, col: u32) {
    let Some(types) = self.sheet.cell(row, col - TYPE_COLUMN_OFFSET) else {
      return;
    };

    let second_col = col + SECOND_SUBGROUP_OFFSET;
    let first = self.sheet.cell(row, col).is_some();
    let second = self.sheet.cell(row, second_col).is_some();
    if !first && !second {
      return;
    }

    let Some(ordinal) = self.ordinal(row) else {
      return;
    };
    let Some(day) = self.current_day else {
      self.skip(row, col, ParseError::NoDay);
      return;
    };

    let mut types = types.split(TYPE_SEPARATOR).map(str::trim);
    let first_type = types.next().unwrap_or_default();
    let second_type = types.next().unwrap_or(first_type);

    if first && second {
      if let Some(lesson) = self.extract(row, col, first_type) {
        self.save(group, 1, day, ordinal, lesson);
      }
      if let Some(lesson) = self.extract(row, second_col, second_type) {
        self.save(group, 2, day, ordinal, lesson);
      }
    } else if first {
      if let Some(lesson) = self.extract(row, col, first_type) {
        if is_shared(self.sheet, row, col) {
          self.save(group, 2, day, ordinal, lesson.clone());
        }
        self.save(group, 1, day, ordinal, lesson);
      }
    } else if let Some(lesson) = self.extract(row, second_col, first_type) {
      self.save(group, 2, day, ordinal, lesson);
    }
  }
}

/// Walks the data rows of one parity block and collects a week per group subgroup.
///
/// The last row of the worksheet is never read.
pub fn build_week<G: CellGrid>(
  sheet: &G,
  block: &WeekBlock,
  diagnostics: &mut Vec<Diagnostic>,
) -> BTreeMap<String, Week> {
  let groups = locate_groups(sheet, block);
  debug!(
    "Found {} groups in the {:?} week of sheet {}",
    groups.len(),
    block.parity,
    sheet.name()
  );

  let mut builder = WeekBuilder {
    sheet,
    block,
    weeks: BTreeMap::new(),
    current_day: None,
    row_ordinal: None,
    diagnostics,
  };

  for group in groups.keys() {
    builder.weeks.insert(subgroup_key(group, 1), Week::default());
    builder.weeks.insert(subgroup_key(group, 2), Week::default());
  }

  for row in FIRST_DATA_ROW..sheet.max_row() {
    builder.row_ordinal = None;

    if let Some(day) = sheet
      .cell(row, block.anchor.col)
      .and_then(|value| weekday_index(&value))
    {
      builder.current_day = Some(day);
    }

    for (group, col) in &groups {
      builder.process(row, group, *col);
    }
  }

  builder.weeks
}
