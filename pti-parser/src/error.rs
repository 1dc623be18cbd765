use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("odd and even week markers are missing from the header row")]
  MissingWeekAnchors,
  #[error("lesson name cell is empty")]
  MissingName,
  #[error("teacher cell is empty")]
  MissingTeacher,
  #[error("location cell is empty")]
  MissingLocation,
  #[error("unknown lesson type {0:?}")]
  UnknownLessonType(String),
  #[error("invalid lesson number {0:?}")]
  InvalidOrdinal(String),
  #[error("lesson precedes any weekday label")]
  NoDay,
}

/// Something skipped while walking a worksheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  pub sheet: String,
  /// A1 style reference of the offending cell, `None` for worksheet-wide problems.
  pub cell: Option<String>,
  pub error: ParseError,
}
