use std::path::Path;

use anyhow::Context;
use calamine::{open_workbook, Data, Dimensions, Range, Reader, Xlsx};
use tracing::debug;

/// Read-only, 1-based view of a worksheet.
pub trait CellGrid {
  fn name(&self) -> &str;

  /// Text of a cell, `None` when the cell is empty or blank.
  fn cell(&self, row: u32, col: u32) -> Option<String>;

  fn max_row(&self) -> u32;

  fn max_column(&self) -> u32;

  fn is_merged(&self, row: u32, col: u32) -> bool;
}

/// Inclusive, 1-based rectangle of a merged region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergedRange {
  pub first: (u32, u32),
  pub last: (u32, u32),
}

impl MergedRange {
  pub fn new(first: (u32, u32), last: (u32, u32)) -> Self {
    Self { first, last }
  }

  pub fn contains(&self, row: u32, col: u32) -> bool {
    (self.first.0..=self.last.0).contains(&row) && (self.first.1..=self.last.1).contains(&col)
  }
}

impl From<&Dimensions> for MergedRange {
  fn from(dimensions: &Dimensions) -> Self {
    Self {
      first: (dimensions.start.0 + 1, dimensions.start.1 + 1),
      last: (dimensions.end.0 + 1, dimensions.end.1 + 1),
    }
  }
}

pub struct Worksheet {
  name: String,
  range: Range<Data>,
  merged: Vec<MergedRange>,
}

impl Worksheet {
  pub fn new(name: impl Into<String>, range: Range<Data>, merged: Vec<MergedRange>) -> Self {
    Self {
      name: name.into(),
      range,
      merged,
    }
  }
}

impl CellGrid for Worksheet {
  fn name(&self) -> &str {
    &self.name
  }

  fn cell(&self, row: u32, col: u32) -> Option<String> {
    if row == 0 || col == 0 {
      return None;
    }

    self.range.get_value((row - 1, col - 1)).and_then(cell_text)
  }

  fn max_row(&self) -> u32 {
    self.range.end().map_or(0, |(row, _)| row + 1)
  }

  fn max_column(&self) -> u32 {
    self.range.end().map_or(0, |(_, col)| col + 1)
  }

  fn is_merged(&self, row: u32, col: u32) -> bool {
    self.merged.iter().any(|range| range.contains(row, col))
  }
}

fn cell_text(data: &Data) -> Option<String> {
  let text = match data {
    Data::Empty | Data::Error(_) => return None,
    Data::String(value) => value.trim().to_string(),
    Data::Float(value) if value.fract() == 0.0 => format!("{}", *value as i64),
    other => other.to_string(),
  };

  if text.is_empty() {
    None
  } else {
    Some(text)
  }
}

/// Renders a 1-based coordinate in A1 notation.
pub fn coordinate(row: u32, col: u32) -> String {
  let mut letters = Vec::new();
  let mut col = col;

  while col > 0 {
    let rem = (col - 1) % 26;
    letters.push((b'A' + rem as u8) as char);
    col = (col - 1) / 26;
  }

  letters.iter().rev().collect::<String>() + &row.to_string()
}

/// Reads every worksheet of an xlsx workbook together with its merged regions.
pub fn load_workbook<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Worksheet>> {
  let path = path.as_ref();
  let mut workbook: Xlsx<_> =
    open_workbook(path).with_context(|| format!("unable to open {}", path.display()))?;

  workbook
    .load_merged_regions()
    .with_context(|| format!("unable to read merged cells of {}", path.display()))?;

  let mut sheets = Vec::new();
  for name in workbook.sheet_names() {
    let range = workbook
      .worksheet_range(&name)
      .with_context(|| format!("unable to read sheet {name}"))?;

    let merged = match workbook.worksheet_merge_cells(&name) {
      Some(regions) => regions?.iter().map(MergedRange::from).collect(),
      None => Vec::new(),
    };

    debug!(
      "Loaded sheet {} with {} merged regions",
      name,
      merged.len()
    );
    sheets.push(Worksheet::new(name, range, merged));
  }

  Ok(sheets)
}

#[cfg(test)]
mod test {
  use calamine::{Data, Range};

  use crate::grid::{coordinate, CellGrid, MergedRange, Worksheet};

  #[test]
  fn coordinates() {
    assert_eq!(coordinate(5, 4), "D5");
    assert_eq!(coordinate(1, 26), "Z1");
    assert_eq!(coordinate(12, 27), "AA12");
    assert_eq!(coordinate(3, 53), "BA3");
  }

  #[test]
  fn merged_range_is_inclusive() {
    let range = MergedRange::new((5, 4), (7, 5));

    assert!(range.contains(5, 4));
    assert!(range.contains(7, 5));
    assert!(range.contains(6, 5));
    assert!(!range.contains(8, 4));
    assert!(!range.contains(5, 6));
    assert!(!range.contains(4, 4));
  }

  #[test]
  fn cell_text() {
    let mut range = Range::new((0, 0), (2, 3));
    range.set_value((0, 0), Data::String("  понедельник ".to_string()));
    range.set_value((0, 1), Data::Float(2.0));
    range.set_value((0, 2), Data::Float(2.5));
    range.set_value((0, 3), Data::Int(7));
    range.set_value((1, 0), Data::String("   ".to_string()));

    let sheet = Worksheet::new("Лист1", range, vec![MergedRange::new((1, 1), (1, 2))]);

    assert_eq!(sheet.name(), "Лист1");
    assert_eq!(sheet.cell(1, 1).as_deref(), Some("понедельник"));
    assert_eq!(sheet.cell(1, 2).as_deref(), Some("2"));
    assert_eq!(sheet.cell(1, 3).as_deref(), Some("2.5"));
    assert_eq!(sheet.cell(1, 4).as_deref(), Some("7"));
    assert_eq!(sheet.cell(2, 1), None);
    assert_eq!(sheet.cell(2, 2), None);
    assert_eq!(sheet.cell(0, 1), None);
    assert_eq!(sheet.cell(40, 40), None);
    assert_eq!(sheet.max_row(), 3);
    assert_eq!(sheet.max_column(), 4);
    assert!(sheet.is_merged(1, 2));
    assert!(!sheet.is_merged(2, 1));
  }
}
