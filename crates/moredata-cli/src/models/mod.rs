//! Demo entities: people and the statements they tell each other

pub mod person;
pub mod statement;

pub use person::{Person, PersonFilter, PersonSort};
pub use statement::{Statement, StatementFilter, StatementSort};
