use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, error, info};

pub use crate::error::{Diagnostic, ParseError};
pub use crate::faculty::{Faculty, FacultyConfig, Group, LookupError};
pub use crate::grid::{load_workbook, CellGrid, MergedRange, Worksheet};
use crate::header::locate_week_blocks;
use crate::timetable::ParityWeeks;
use crate::week::build_week;

mod error;
mod faculty;
mod grid;
mod header;
mod lesson;
pub mod timetable;
mod week;

/// Result of parsing one or more worksheets.
#[derive(Debug, Default)]
pub struct Parsed {
  /// Keyed by group subgroup, e.g. `ИС-101(1)`.
  pub weeks: BTreeMap<String, ParityWeeks>,
  pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
  /// Adds another result, replacing weeks of subgroups present in both.
  pub fn merge(&mut self, other: Parsed) {
    self.weeks.extend(other.weeks);
    self.diagnostics.extend(other.diagnostics);
  }
}

/// Parses a single worksheet into `parsed`.
///
/// Subgroups found only in the even block are left out.
pub fn parse_worksheet<G: CellGrid>(sheet: &G, parsed: &mut Parsed) {
  let Some([odd_block, even_block]) = locate_week_blocks(sheet) else {
    error!(
      "Couldn't find odd and even week markers in sheet {}",
      sheet.name()
    );
    parsed.diagnostics.push(Diagnostic {
      sheet: sheet.name().to_string(),
      cell: None,
      error: ParseError::MissingWeekAnchors,
    });
    return;
  };

  let odd = build_week(sheet, &odd_block, &mut parsed.diagnostics);
  let mut even = build_week(sheet, &even_block, &mut parsed.diagnostics);

  info!(
    "Parsed sheet {}: {} odd and {} even subgroups",
    sheet.name(),
    odd.len(),
    even.len()
  );

  for (key, odd) in odd {
    let even = even.remove(&key).unwrap_or_default();
    parsed.weeks.insert(key, ParityWeeks { odd, even });
  }

  for key in even.keys() {
    debug!("Dropping {} from sheet {}, it has no odd week", key, sheet.name());
  }
}

pub fn parse_worksheets<G: CellGrid>(sheets: &[G]) -> Parsed {
  let mut parsed = Parsed::default();

  for sheet in sheets {
    parse_worksheet(sheet, &mut parsed);
  }

  parsed
}

/// Loads an xlsx workbook and parses all of its worksheets.
pub fn parse_workbook<P: AsRef<Path>>(path: P) -> anyhow::Result<Parsed> {
  let sheets = load_workbook(path)?;
  Ok(parse_worksheets(&sheets))
}
