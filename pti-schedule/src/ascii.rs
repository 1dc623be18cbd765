use std::fmt::Write;

use pti_parser::timetable::{LessonType, Schedule, Week, WeekData};

const WEEKDAYS: [&str; 6] = [
  "Понедельник",
  "Вторник",
  "Среда",
  "Четверг",
  "Пятница",
  "Суббота",
];

fn kind(kind: LessonType) -> &'static str {
  match kind {
    LessonType::Practical => "ПЗ",
    LessonType::Lecture => "ЛК",
    LessonType::Laboratory => "ЛР",
  }
}

fn clock(minutes: u32) -> String {
  format!("{:0>2}:{:0>2}", minutes / 60 % 24, minutes % 60)
}

fn week(out: &mut String, schedule: &Schedule, week: &Week) {
  for (weekday, day) in WEEKDAYS.iter().zip(week.days()) {
    let Some(day) = day else {
      continue;
    };

    writeln!(out, "{weekday}").unwrap();
    for (idx, slot) in day.iter().enumerate() {
      let Some(lesson) = slot else {
        continue;
      };
      let (start, end) = schedule.lesson_bounds(idx + 1);

      writeln!(
        out,
        "  {} {}-{} {} {} | {} | {}",
        idx + 1,
        clock(start),
        clock(end),
        kind(lesson.kind()),
        lesson.name(),
        lesson.teacher(),
        lesson.location()
      )
      .unwrap();
    }
  }
}

pub fn table(schedule: &Schedule) -> String {
  let mut out = String::new();
  writeln!(out, "{}", schedule.name).unwrap();

  match &schedule.data {
    WeekData::Single(single) => week(&mut out, schedule, single),
    WeekData::Alternating(weeks) => {
      writeln!(out, "\nНечетная неделя").unwrap();
      week(&mut out, schedule, &weeks.odd);
      writeln!(out, "\nЧетная неделя").unwrap();
      week(&mut out, schedule, &weeks.even);
    }
  }

  out
}
