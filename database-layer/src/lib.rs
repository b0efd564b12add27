//! PostgreSQL access for the Kliniq assistant engine
//!
//! Owns the connection pool, its environment configuration and the schema
//! migrations for the tables the assistant core reads and writes: patients and
//! their hospital links, appointment requests, triage cases, chat sessions and
//! voice messages. Query code lives next to the domain logic that needs it
//! (see `assistant_engine::store::postgres`).

pub mod config;
pub mod connection;
pub mod error;

pub use config::*;
pub use connection::*;
pub use error::*;
