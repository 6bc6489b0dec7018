use std::io;

use thiserror::Error;

use draw_model::DrawError;

pub type Result<T> = std::result::Result<T, SpinError>;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("participant already active: {name}")]
    DuplicateName { name: String },
    #[error("no active participant named {name}")]
    NotFound { name: String },
    #[error("participant id {id} not allocated in roster")]
    UnknownId { id: crate::roster::ParticipantId },
    #[error("roster state invalid: {detail}")]
    Invalid { detail: String },
    #[error("roster state corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("selection record encoding: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SpinError {
    #[error("participant list must not be empty")]
    EmptyPool,
    #[error("participant names must not be blank")]
    BlankName,
    #[error("participant listed twice in one pool: {name}")]
    DuplicateEntry { name: String },
    #[error("winner {name} is not part of the supplied pool")]
    WinnerNotInPool { name: String },
    #[error("weight model error: {0}")]
    Model(#[from] DrawError),
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
}
