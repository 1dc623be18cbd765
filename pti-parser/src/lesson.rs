use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::grid::CellGrid;
use crate::timetable::{Lesson, LessonType};

/// Rows below the name cell holding the teacher and the location.
const TEACHER_OFFSET: u32 = 1;
const LOCATION_OFFSET: u32 = 2;
/// Extra row skipped when a probed cell is empty because the rows above were merged unevenly.
const UNEVEN_MERGE_SHIFT: u32 = 1;

const LOCATION_PREFIX: &str = "ауд.";

static TEACHER_START: Lazy<Regex> = Lazy::new(|| Regex::new("[А-ЯЁ]").unwrap());

/// Raw text of a lesson cell cluster, before the type is attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonCell {
  pub name: String,
  pub teacher: String,
  pub location: String,
}

impl LessonCell {
  pub fn into_lesson(self, abbreviation: &str) -> Result<Lesson, ParseError> {
    let kind = LessonType::from_abbreviation(abbreviation)
      .ok_or_else(|| ParseError::UnknownLessonType(abbreviation.to_string()))?;

    Lesson::new(kind, &self.name, &self.teacher, &self.location)
  }
}

/// Reads the cell `offset` rows below `row`, moving `row` one further down if it is empty.
fn probe<G: CellGrid>(sheet: &G, row: &mut u32, offset: u32, col: u32) -> Option<String> {
  sheet.cell(*row + offset, col).or_else(|| {
    *row += UNEVEN_MERGE_SHIFT;
    sheet.cell(*row + offset, col)
  })
}

/// Drops initials and punctuation in front of the first capital letter.
fn clean_teacher(value: &str) -> &str {
  match TEACHER_START.find(value) {
    Some(found) => &value[found.start()..],
    None => value,
  }
}

/// Drops the trailing parenthesised note and the room prefix.
fn clean_location(value: &str) -> &str {
  let value = match value.find('(') {
    Some(idx) => &value[..idx],
    None => value,
  };

  value.strip_prefix(LOCATION_PREFIX).unwrap_or(value).trim()
}

pub fn extract_cell<G: CellGrid>(sheet: &G, row: u32, col: u32) -> Result<LessonCell, ParseError> {
  let mut row = row;
  let name = sheet.cell(row, col).ok_or(ParseError::MissingName)?;

  let teacher = probe(sheet, &mut row, TEACHER_OFFSET, col).ok_or(ParseError::MissingTeacher)?;
  let teacher = clean_teacher(&teacher).trim().to_string();

  let location =
    probe(sheet, &mut row, LOCATION_OFFSET, col).ok_or(ParseError::MissingLocation)?;
  let location = clean_location(&location).to_string();

  Ok(LessonCell {
    name,
    teacher,
    location,
  })
}

pub fn extract_lesson<G: CellGrid>(
  sheet: &G,
  row: u32,
  col: u32,
  abbreviation: &str,
) -> Result<Lesson, ParseError> {
  extract_cell(sheet, row, col)?.into_lesson(abbreviation)
}

#[cfg(test)]
mod test {
  use crate::error::ParseError;
  use crate::lesson::{clean_location, clean_teacher, extract_cell, extract_lesson};
  use crate::test::SheetBuilder;
  use crate::timetable::LessonType;

  #[test]
  fn teacher_prefix() {
    assert_eq!(clean_teacher("доц. Петров П.П."), "Петров П.П.");
    assert_eq!(clean_teacher(", Ёлкин А.А."), "Ёлкин А.А.");
    assert_eq!(clean_teacher("ст.пр."), "ст.пр.");
  }

  #[test]
  fn location_suffix() {
    assert_eq!(clean_location("ауд.305 (корп. А)"), "305");
    assert_eq!(clean_location("ауд. 12"), "12");
    assert_eq!(clean_location("спортзал"), "спортзал");
    assert_eq!(clean_location("(дист.)"), "");
  }

  #[test]
  fn compact_cluster() -> anyhow::Result<()> {
    let sheet = SheetBuilder::new("Лист1")
      .text(5, 6, "Математический анализ")
      .text(6, 6, "доц. Петров П.П.")
      .text(7, 6, "ауд. 305 (корп. А)")
      .build();

    let lesson = extract_lesson(&sheet, 5, 6, "ЛК")?;
    assert_eq!(lesson.name(), "Математический анализ");
    assert_eq!(lesson.teacher(), "Петров П.П.");
    assert_eq!(lesson.location(), "305");
    assert_eq!(lesson.kind(), LessonType::Lecture);
    Ok(())
  }

  #[test]
  fn teacher_shifted_down() -> anyhow::Result<()> {
    let sheet = SheetBuilder::new("Лист1")
      .text(5, 6, "Физика")
      .text(7, 6, "Сидоров С.С.")
      .text(8, 6, "ауд.110")
      .build();

    let cell = extract_cell(&sheet, 5, 6)?;
    assert_eq!(cell.teacher, "Сидоров С.С.");
    assert_eq!(cell.location, "110");
    Ok(())
  }

  #[test]
  fn location_shifted_down() -> anyhow::Result<()> {
    let sheet = SheetBuilder::new("Лист1")
      .text(5, 6, "Физика")
      .text(6, 6, "Сидоров С.С.")
      .text(8, 6, "ауд.110")
      .build();

    assert_eq!(extract_cell(&sheet, 5, 6)?.location, "110");
    Ok(())
  }

  #[test]
  fn missing_parts() {
    let sheet = SheetBuilder::new("Лист1")
      .text(5, 6, "Физика")
      .text(9, 6, "ауд.110")
      .text(5, 7, "Химия")
      .text(6, 7, "Сидоров С.С.")
      .text(6, 8, "Сидоров С.С.")
      .text(7, 8, "ауд.110")
      .build();

    assert_eq!(extract_cell(&sheet, 5, 6), Err(ParseError::MissingTeacher));
    assert_eq!(extract_cell(&sheet, 5, 7), Err(ParseError::MissingLocation));
    assert_eq!(extract_cell(&sheet, 5, 8), Err(ParseError::MissingName));
  }

  #[test]
  fn unknown_abbreviation() {
    let sheet = SheetBuilder::new("Лист1")
      .text(5, 6, "Физика")
      .text(6, 6, "Сидоров С.С.")
      .text(7, 6, "ауд.110")
      .build();

    assert_eq!(
      extract_lesson(&sheet, 5, 6, "СР"),
      Err(ParseError::UnknownLessonType("СР".to_string()))
    );
  }

  #[test]
  fn location_without_room() {
    let sheet = SheetBuilder::new("Лист1")
      .text(5, 6, "Физика")
      .text(6, 6, "Сидоров С.С.")
      .text(7, 6, "(дист.)")
      .build();

    assert_eq!(
      extract_lesson(&sheet, 5, 6, "ПЗ"),
      Err(ParseError::MissingLocation)
    );
  }

  #[test]
  fn extraction_is_repeatable() -> anyhow::Result<()> {
    let sheet = SheetBuilder::new("Лист1")
      .text(5, 6, "Физика")
      .text(6, 6, "проф. Сидоров С.С.")
      .text(7, 6, "ауд.110 (лаб.)")
      .build();

    assert_eq!(
      extract_lesson(&sheet, 5, 6, "ЛР")?,
      extract_lesson(&sheet, 5, 6, "ЛР")?
    );
    Ok(())
  }
}
