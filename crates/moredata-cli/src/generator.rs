//! Mock data generator
//!
//! Fills the demo stores with a cast of people and then a steady stream of
//! random statements, one per tick, on a tokio interval.

use chrono::{Duration, Utc};
use moredata_core::{EntityId, MemoryStore, Predicate, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::task::JoinHandle;

use crate::models::{Person, Statement};

const CAST: &[(&str, i64, &str)] = &[
    ("Alpha Allie", 24, "clue-characters-6"),
    ("Bookish Betty", 28, "clue-characters-3"),
    ("Catty Cathy", 21, "clue-characters-1"),
    ("Daring Darion", 32, "clue-characters-2"),
    ("Emotional Elijah", 32, "clue-characters-4"),
    ("Fratty Fred", 32, "clue-characters-5"),
];

const GOSSIP: &[&str] = &[
    "Jessica's in a new relationship with the captain of the soccer team. Scandalous!",
    "Brian just got a new job at the ice cream shop, but he ate all the samples and got fired.",
    "Sarah's new pet hamster escaped during math class, and now it's somewhere in the school.",
    "Kyle got a new job at the mall, but he quit after one day because it was too \"corporate.\"",
    "Sophia's new pet parrot keeps repeating all the gossip she hears at school. Awkward!",
    "Lily got a new job at the coffee shop, but she can't stop spilling the drinks.",
    "Jake's new pet ferret escaped during gym class, and now it's the school mascot.",
    "Eric just got a new job at the movie theater, but he keeps giving out free popcorn.",
    "Rachel's new pet cat keeps stealing her homework. At least that's her excuse!",
    "Daniel's in a new relationship with his lab partner, and their chemistry is undeniable.",
    "Megan got a new job at the local bakery, but she keeps eating the cupcakes.",
    "Olivia's in a new relationship with the debate team captain, and now they argue about everything.",
    "Chloe's new pet bunny chewed through her math book, and now she's failing the class.",
    "Nick got a new job at the pizza place, but he burned every pizza on his first day.",
    "Ben just got a new job at the library, but he keeps shushing the wrong people.",
    "Mia got a new job at the flower shop, but she's allergic to pollen. Yikes!",
    "Chris got a new job at the bakery, but he baked a cake with salt instead of sugar.",
    "Hannah got a new job at the bookstore, but she's always lost in the romance novels.",
    "Madison's in a new relationship with her math tutor. Talk about extra credit!",
    "Paige's new pet rabbit chewed through her internet cable. No more late-night gaming.",
];

/// Writes demo data into a people store and a statement store
#[derive(Debug, Clone)]
pub struct MockDataGenerator {
    people: MemoryStore<Person>,
    statements: MemoryStore<Statement>,
    interval: std::time::Duration,
}

/// Running generator task
#[derive(Debug)]
pub struct GeneratorHandle {
    task: JoinHandle<()>,
}

impl GeneratorHandle {
    /// Abort the task; no further statements are written
    pub fn stop(self) {
        self.task.abort();
    }
}

impl MockDataGenerator {
    pub fn new(
        people: MemoryStore<Person>,
        statements: MemoryStore<Statement>,
        interval: std::time::Duration,
    ) -> Self {
        Self {
            people,
            statements,
            interval,
        }
    }

    /// Spawn the generator on the current tokio runtime
    ///
    /// The first tick fires immediately.
    pub fn start(&self) -> GeneratorHandle {
        let generator = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(generator.interval);
            loop {
                ticker.tick().await;
                if let Err(err) = generator.tick() {
                    tracing::warn!(error = %err, "mock data generator tick failed");
                }
            }
        });
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "mock data generator started");
        GeneratorHandle { task }
    }

    /// Seed people if needed, then write one random statement
    ///
    /// # Errors
    ///
    /// Propagates store write failures
    pub fn tick(&self) -> Result<Statement> {
        self.seed_people_if_needed()?;
        let statement = self.random_statement()?;
        self.statements.insert(statement.clone())?;
        tracing::debug!(statement_id = %statement.statement_id, "statement generated");
        Ok(statement)
    }

    /// Insert the cast when the people store is empty, returning how many were added
    ///
    /// # Errors
    ///
    /// Propagates store write failures
    pub fn seed_people_if_needed(&self) -> Result<usize> {
        if self.people.count(&Predicate::always_true())? > 0 {
            return Ok(0);
        }
        let now = Utc::now();
        self.people.batch(|tx| {
            for (name, age, avatar) in CAST {
                tx.insert(Person {
                    person_id: EntityId::new(),
                    name: (*name).to_string(),
                    birthdate: now - Duration::days(365 * age),
                    avatar: (*avatar).to_string(),
                })?;
            }
            Ok(CAST.len())
        })
    }

    fn random_statement(&self) -> Result<Statement> {
        let mut people = self.people.all()?;
        let mut rng = rand::thread_rng();

        let by = people
            .choose(&mut rng)
            .map(|p| p.person_id.clone())
            .ok_or_else(|| moredata_core::MoreDataError::Internal {
                message: "no people to tell gossip".to_string(),
            })?;

        people.shuffle(&mut rng);
        let listeners = rng.gen_range(1..=3);
        let to = people
            .iter()
            .take(listeners)
            .map(|p| p.person_id.clone())
            .collect();

        let content = GOSSIP
            .choose(&mut rng)
            .copied()
            .unwrap_or("Nothing happened today.")
            .to_string();

        Ok(Statement {
            statement_id: EntityId::new(),
            content,
            by,
            to,
            created_at: Utc::now(),
        })
    }
}
