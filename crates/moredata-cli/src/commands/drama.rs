//! Drama demo command
//!
//! Usage: moredata drama [--ticks N] [--interval-ms MS] [--person NAME] [--person-id ID]
//!                       [--contains TEXT] [--min-age YEARS] [--max-age YEARS] [--json] [--json-logs]
//!
//! Runs the mock data generator and watches the statement stream through a
//! live result set, printing every change batch as it arrives.

use anyhow::Context;
use clap::Args;
use moredata_core::logging_facility::{self, Profile};
use moredata_core::store::MemoryStore;
use moredata_core::{ChangeBatch, ChangeEvent, CompoundFilter, FetchRequest, FetchStore, LiveResultSet};
use std::io::Write;
use std::time::Duration;

use crate::generator::MockDataGenerator;
use crate::models::{Person, PersonFilter, PersonSort, Statement, StatementFilter, StatementSort};

#[derive(Debug, Args)]
pub struct DramaArgs {
    /// Number of generator ticks to watch
    #[arg(long, default_value_t = 5)]
    pub ticks: u32,

    /// Milliseconds between generated statements
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Only statements told by the person with this name
    #[arg(long)]
    pub person: Option<String>,

    /// Only statements told by the person with this id
    #[arg(long)]
    pub person_id: Option<String>,

    /// Only statements containing this text (case-insensitive)
    #[arg(long)]
    pub contains: Option<String>,

    /// List only cast members at least this many years old
    #[arg(long)]
    pub min_age: Option<i64>,

    /// List only cast members at most this many years old
    #[arg(long)]
    pub max_age: Option<i64>,

    /// Print change batches and the final view as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    pub json_logs: bool,
}

/// Execute drama command
pub async fn execute(args: DramaArgs) -> anyhow::Result<()> {
    logging_facility::init(if args.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let interval = Duration::from_millis(args.interval_ms.max(1));
    let people = MemoryStore::<Person>::new();
    let statements = MemoryStore::<Statement>::new();
    let generator = MockDataGenerator::new(people.clone(), statements.clone(), interval);
    generator
        .seed_people_if_needed()
        .context("failed to seed the cast")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let by_name = Some(&PersonSort::Name);
    let cast = people.fetch(&FetchRequest::for_entity::<Person>(None, by_name))?;
    if !args.json {
        let listed = cast_filter(&args);
        let now = chrono::Utc::now();
        writeln!(out, "Cast:")?;
        for person in people.fetch(&FetchRequest::for_entity::<Person>(listed.as_ref(), by_name))? {
            writeln!(out, "  {} ({})", person.name, person.age_at(now))?;
        }
    }

    let filter = compose_filter(&args, &cast);
    if filter == Some(StatementFilter::NoElements) {
        eprintln!("Nobody in the cast matches; no statements will be shown");
    }

    let mut live = LiveResultSet::new(statements, filter, Some(StatementSort::Newest));
    let batches = live.subscribe();
    live.start().context("failed to start watching statements")?;
    let handle = generator.start();

    let mut ticker = tokio::time::interval(interval);
    for _ in 0..args.ticks {
        ticker.tick().await;
        live.process_changes()?;
        for batch in batches.try_iter() {
            render_batch(&mut out, &batch, &cast, args.json)?;
        }
    }
    handle.stop();

    live.process_changes()?;
    for batch in batches.try_iter() {
        render_batch(&mut out, &batch, &cast, args.json)?;
    }

    if args.json {
        let view = serde_json::json!({ "snapshot": live.snapshot() });
        writeln!(out, "{}", serde_json::to_string(&view)?)?;
    } else {
        writeln!(out, "-- {} statement(s) in view --", live.len())?;
        for (i, statement) in live.snapshot().iter().enumerate() {
            writeln!(out, "{:>3}. {}", i, describe(statement, &cast))?;
        }
    }
    live.dispose();
    Ok(())
}

/// Cast members to list: age bounds and the watched speaker's id
pub fn cast_filter(args: &DramaArgs) -> Option<PersonFilter> {
    let mut parts = Vec::new();
    if let Some(years) = args.min_age {
        parts.push(PersonFilter::MinimumAge(years));
    }
    if let Some(years) = args.max_age {
        parts.push(PersonFilter::MaximumAge(years));
    }
    if let Some(id) = &args.person_id {
        parts.push(PersonFilter::PersonId(id.clone()));
    }
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(PersonFilter::all(parts)),
    }
}

/// Combine the command-line statement filters; `None` when none was given
pub fn compose_filter(args: &DramaArgs, cast: &[Person]) -> Option<StatementFilter> {
    let mut parts = Vec::new();
    if let Some(name) = &args.person {
        parts.push(StatementFilter::told_by_name(name, cast));
    }
    if let Some(id) = &args.person_id {
        parts.push(StatementFilter::told_by_id(id, cast));
    }
    if let Some(text) = &args.contains {
        parts.push(StatementFilter::Contains(text.clone()));
    }
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ if parts.contains(&StatementFilter::NoElements) => Some(StatementFilter::none()),
        _ => Some(StatementFilter::all(parts)),
    }
}

fn speaker_name<'a>(statement: &Statement, cast: &'a [Person]) -> &'a str {
    cast.iter()
        .find(|p| p.person_id == statement.by)
        .map(|p| p.name.as_str())
        .unwrap_or("Someone")
}

fn describe(statement: &Statement, cast: &[Person]) -> String {
    format!(
        "{} told {}: {}",
        speaker_name(statement, cast),
        statement.to.len(),
        statement.content
    )
}

/// Write one batch, as JSON or one line per event
pub fn render_batch(
    out: &mut impl Write,
    batch: &ChangeBatch<Statement>,
    cast: &[Person],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(batch)?)?;
        return Ok(());
    }
    for event in batch {
        let line = match event {
            ChangeEvent::Inserted { index, item } => format!("+ [{}] {}", index, describe(item, cast)),
            ChangeEvent::Removed { index, item } => format!("- [{}] {}", index, describe(item, cast)),
            ChangeEvent::Updated { index, item } => format!("~ [{}] {}", index, describe(item, cast)),
            ChangeEvent::Moved { from, to, item } => {
                format!("> [{} -> {}] {}", from, to, describe(item, cast))
            }
        };
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
