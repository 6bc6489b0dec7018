//! Participant roster and selection ledger for the fairness-biased lottery.
//!
//! The crate exposes:
//! - [`PoolController`]: high-level API orchestrating pool resolution, draws,
//!   and post-draw weight updates as one atomic unit.
//! - [`Roster`]: durable participant store with soft delete and reactivation.
//! - [`SelectionLog`]: append-only history of past draws.

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod payload;
pub mod roster;

pub use config::PoolConfig;
pub use controller::PoolController;
pub use error::{HistoryError, Result, RosterError, SpinError};
pub use history::{SelectionLog, SelectionRecord};
pub use payload::{ParticipantSummary, PoolMember, SpinOutcome};
pub use roster::{Participant, ParticipantId, Roster};
