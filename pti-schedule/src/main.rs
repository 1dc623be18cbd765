use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand, ValueEnum};
use time::macros::format_description;
use time::Date;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use pti_parser::{parse_workbook, Faculty, FacultyConfig, LookupError, Parsed};

use crate::ascii::table;

mod ascii;

#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Args {
  #[arg(long, env = "PTI_SCHEDULE_SENTRY_DSN")]
  sentry_dsn: Option<String>,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Print the odd and even weeks of every group subgroup as JSON
  Parse {
    #[arg(required = true)]
    files: Vec<PathBuf>,
  },
  /// List the group subgroups with their ids
  Groups {
    #[arg(required = true)]
    files: Vec<PathBuf>,
  },
  /// Print the schedule of one group subgroup
  Schedule {
    group_id: String,
    #[arg(required = true)]
    files: Vec<PathBuf>,
    #[command(flatten)]
    timing: Timing,
    #[arg(long, short, value_enum, default_value_t = Format::Json)]
    format: Format,
  },
}

#[derive(clap::Args)]
struct Timing {
  #[arg(long, env = "PTI_SCHEDULE_STUDY_START", value_parser = parse_date)]
  study_start: Date,
  /// Minutes after midnight
  #[arg(long, env = "PTI_SCHEDULE_LESSON_START_TIME", default_value_t = 480)]
  lesson_start_time: u32,
  /// Minutes
  #[arg(long, env = "PTI_SCHEDULE_LESSON_LENGTH", default_value_t = 90)]
  lesson_length: u32,
  /// Break after each lesson in minutes
  #[arg(
    long,
    env = "PTI_SCHEDULE_BREAKS",
    value_delimiter = ',',
    default_value = "10,20,10,10,10"
  )]
  breaks: Vec<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
  Json,
  Table,
}

fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
  Date::parse(value, format_description!("[year]-[month]-[day]"))
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let _sentry = args.sentry_dsn.as_deref().map(|dsn| {
    sentry::init((
      dsn,
      sentry::ClientOptions {
        release: sentry::release_name!(),
        ..Default::default()
      },
    ))
  });

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .with(sentry_tracing::layer())
    .init();

  match args.command {
    Command::Parse { files } => {
      let parsed = load(&files);
      if !parsed.diagnostics.is_empty() {
        warn!("Skipped {} lessons or sheets", parsed.diagnostics.len());
      }

      println!("{}", serde_json::to_string(&parsed.weeks)?);
    }
    Command::Groups { files } => {
      let faculty = faculty(&files);
      println!("{}", serde_json::to_string(&faculty.groups())?);
    }
    Command::Schedule {
      group_id,
      files,
      timing,
      format,
    } => {
      let config = FacultyConfig {
        study_start: timing.study_start,
        lesson_start_time: timing.lesson_start_time,
        lesson_length: timing.lesson_length,
        breaks: timing.breaks,
      };

      let schedule = match faculty(&files).schedule(&group_id, &config) {
        Ok(schedule) => schedule,
        Err(LookupError::UnknownGroup(id)) => {
          return Err(anyhow!("Group {id} doesn't exist, see the groups command"))
        }
      };

      match format {
        Format::Json => println!("{}", serde_json::to_string(&schedule)?),
        Format::Table => print!("{}", table(&schedule)),
      }
    }
  }

  Ok(())
}

/// Parses every readable workbook, later files win on shared subgroups.
fn load(files: &[PathBuf]) -> Parsed {
  let mut parsed = Parsed::default();

  for file in files {
    match parse_workbook(file) {
      Err(err) => error!("Unable to parse {}: {:#}", file.display(), err),
      Ok(result) => {
        info!("Parsed {}", file.display());
        parsed.merge(result);
      }
    }
  }

  parsed
}

fn faculty(files: &[PathBuf]) -> Faculty {
  let mut faculty = Faculty::new();
  info!("Loading schedules of {}", faculty.description());
  faculty.ingest(load(files));

  faculty
}
