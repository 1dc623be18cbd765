use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::grid::CellGrid;

const ANCHOR_ROW: u32 = 1;
const GROUP_ROWS: RangeInclusive<u32> = 1..=3;

const ODD_LABEL: &str = "нечетная";
const EVEN_LABEL: &str = "четная";
const GROUP_MARKER: &str = "группа";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
  Odd,
  Even,
}

/// Header cell where a parity block starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
  pub row: u32,
  pub col: u32,
}

/// Columns `anchor.col..end` of a worksheet belonging to one parity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekBlock {
  pub parity: Parity,
  pub anchor: Anchor,
  pub end: u32,
}

fn fold(value: &str) -> String {
  value.trim().to_lowercase().replace('ё', "е")
}

/// Finds the odd and even week markers in the first row and returns `[odd, even]`.
pub fn locate_week_blocks<G: CellGrid>(sheet: &G) -> Option<[WeekBlock; 2]> {
  let mut odd = None;
  let mut even = None;

  for col in 1..=sheet.max_column() {
    if odd.is_some() && even.is_some() {
      break;
    }

    let Some(value) = sheet.cell(ANCHOR_ROW, col) else {
      continue;
    };
    let value = fold(&value);
    let anchor = Anchor {
      row: ANCHOR_ROW,
      col,
    };

    if value.starts_with(ODD_LABEL) {
      odd = Some(anchor);
    } else if value.starts_with(EVEN_LABEL) {
      even = Some(anchor);
    }
  }

  let (odd, even) = (odd?, even?);
  let last = sheet.max_column() + 1;
  let (odd_end, even_end) = if odd.col < even.col {
    (even.col, last)
  } else {
    (last, odd.col)
  };

  Some([
    WeekBlock {
      parity: Parity::Odd,
      anchor: odd,
      end: odd_end,
    },
    WeekBlock {
      parity: Parity::Even,
      anchor: even,
      end: even_end,
    },
  ])
}

/// Maps group names found in the header rows of a block to their first subgroup column.
pub fn locate_groups<G: CellGrid>(sheet: &G, block: &WeekBlock) -> BTreeMap<String, u32> {
  let mut groups = BTreeMap::new();

  for row in GROUP_ROWS {
    for col in block.anchor.col..block.end {
      let Some(value) = sheet.cell(row, col) else {
        continue;
      };
      if !value.contains(GROUP_MARKER) {
        continue;
      }

      let name = value.replacen(GROUP_MARKER, "", 1).trim().to_string();
      if !name.is_empty() {
        groups.insert(name, col);
      }
    }
  }

  groups
}

#[cfg(test)]
mod test {
  use crate::header::{locate_groups, locate_week_blocks, Anchor, Parity};
  use crate::test::SheetBuilder;

  #[test]
  fn odd_before_even() {
    let sheet = SheetBuilder::new("Лист1")
      .text(1, 3, "Нечетная неделя")
      .text(1, 10, "ЧЕТНАЯ НЕДЕЛЯ")
      .text(4, 16, "")
      .build();

    let [odd, even] = locate_week_blocks(&sheet).expect("anchors");
    assert_eq!(odd.parity, Parity::Odd);
    assert_eq!(odd.anchor, Anchor { row: 1, col: 3 });
    assert_eq!(odd.end, 10);
    assert_eq!(even.parity, Parity::Even);
    assert_eq!(even.anchor, Anchor { row: 1, col: 10 });
    assert_eq!(even.end, 17);
  }

  #[test]
  fn even_before_odd() {
    let sheet = SheetBuilder::new("Лист1")
      .text(1, 2, "четная неделя")
      .text(1, 9, "  нечётная неделя")
      .text(1, 14, "примечание")
      .build();

    let [odd, even] = locate_week_blocks(&sheet).expect("anchors");
    assert_eq!(odd.anchor.col, 9);
    assert_eq!(odd.end, 15);
    assert_eq!(even.anchor.col, 2);
    assert_eq!(even.end, 9);
  }

  #[test]
  fn missing_marker() {
    let sheet = SheetBuilder::new("Лист1")
      .text(1, 3, "нечетная неделя")
      .text(2, 10, "четная неделя")
      .build();

    assert!(locate_week_blocks(&sheet).is_none());
  }

  #[test]
  fn groups_within_block() {
    let sheet = SheetBuilder::new("Лист1")
      .text(1, 3, "нечетная неделя")
      .text(1, 10, "четная неделя")
      .text(2, 6, "группа ИС-101")
      .text(3, 8, "группа   ИС-102 ")
      .text(2, 13, "группа ИС-101")
      .text(2, 7, "группа")
      .text(4, 6, "группа ИС-999")
      .build();

    let [odd, even] = locate_week_blocks(&sheet).expect("anchors");

    let groups = locate_groups(&sheet, &odd);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.get("ИС-101"), Some(&6));
    assert_eq!(groups.get("ИС-102"), Some(&8));

    let groups = locate_groups(&sheet, &even);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups.get("ИС-101"), Some(&13));
  }
}
