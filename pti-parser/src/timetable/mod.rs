use serde::Serialize;
use time::Weekday;

use crate::error::ParseError;

/// Monday through Saturday.
pub const DAYS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
  Practical,
  Lecture,
  Laboratory,
}

impl LessonType {
  pub fn from_abbreviation(value: &str) -> Option<Self> {
    match value.trim() {
      "ПЗ" => Some(Self::Practical),
      "ЛК" => Some(Self::Lecture),
      "ЛР" => Some(Self::Laboratory),
      _ => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Lesson {
  #[serde(rename = "type")]
  kind: LessonType,
  name: String,
  teacher: String,
  location: String,
}

impl Lesson {
  pub fn new(
    kind: LessonType,
    name: &str,
    teacher: &str,
    location: &str,
  ) -> Result<Self, ParseError> {
    let name = name.trim();
    let teacher = teacher.trim();
    let location = location.trim();

    if name.is_empty() {
      return Err(ParseError::MissingName);
    }
    if teacher.is_empty() {
      return Err(ParseError::MissingTeacher);
    }
    if location.is_empty() {
      return Err(ParseError::MissingLocation);
    }

    Ok(Self {
      kind,
      name: name.to_string(),
      teacher: teacher.to_string(),
      location: location.to_string(),
    })
  }

  pub fn kind(&self) -> LessonType {
    self.kind
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn teacher(&self) -> &str {
    &self.teacher
  }

  pub fn location(&self) -> &str {
    &self.location
  }
}

/// Lesson slots of one day, index 0 holds the first lesson of the day.
pub type Day = Vec<Option<Lesson>>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Week {
  days: [Option<Day>; DAYS],
}

impl Week {
  pub fn days(&self) -> &[Option<Day>; DAYS] {
    &self.days
  }

  /// `None` for Sunday and for days without any lesson.
  pub fn day(&self, weekday: Weekday) -> Option<&Day> {
    self
      .days
      .get(weekday.number_days_from_monday() as usize)
      .and_then(Option::as_ref)
  }

  /// Pads the day with empty slots up to `ordinal - 1` and appends the lesson.
  /// `day` is a 0-based weekday index, `ordinal` is 1-based.
  pub(crate) fn insert(&mut self, day: usize, ordinal: usize, lesson: Lesson) {
    let slots = self.days[day].get_or_insert_with(Vec::new);

    if slots.len() < ordinal - 1 {
      slots.resize(ordinal - 1, None);
    }
    slots.push(Some(lesson));
  }

  pub fn is_empty(&self) -> bool {
    self.days.iter().all(Option::is_none)
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParityWeeks {
  pub odd: Week,
  pub even: Week,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum WeekData {
  #[serde(rename = "week")]
  Single(Week),
  #[serde(rename = "weeks")]
  Alternating(ParityWeeks),
}

impl WeekData {
  pub fn has_even_odd(&self) -> bool {
    matches!(self, Self::Alternating(_))
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Schedule {
  pub name: String,
  pub study_start_ts: i64,
  /// Minutes after midnight.
  pub lesson_start_time: u32,
  /// Minutes.
  pub lesson_length: u32,
  /// Length in minutes of the break following each lesson.
  pub breaks: Vec<u32>,
  pub has_even_odd: bool,
  #[serde(flatten)]
  pub data: WeekData,
}

impl Schedule {
  /// Start and end of a lesson in minutes after midnight, `ordinal` is 1-based.
  /// Breaks missing from the configuration count as zero minutes.
  pub fn lesson_bounds(&self, ordinal: usize) -> (u32, u32) {
    let previous = ordinal.saturating_sub(1);
    let breaks: u32 = self.breaks.iter().take(previous).sum();
    let start = self.lesson_start_time + self.lesson_length * previous as u32 + breaks;

    (start, start + self.lesson_length)
  }
}
