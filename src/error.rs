use thiserror::Error;

/// Everything a game action can refuse to do.
///
/// None of these are fatal: the caller shows the message and carries on.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("not enough credits: {available} available, {requested} requested")]
    InsufficientCredits { available: u32, requested: u32 },
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("{attribute} cannot go above {max}")]
    AttributeCapped { attribute: String, max: u32 },
    #[error("User already exists.")]
    DuplicateRegistration(String),
    #[error("no club is left to manage")]
    ClubUnavailable,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("unknown manager: {0}")]
    UnknownManager(String),
    #[error("no other club to play against")]
    NoOpponent,
    #[error("unknown style: {0}")]
    UnknownStyle(String),
    #[error("unknown roster: {0}")]
    UnknownRoster(String),
    #[error("save data error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("save file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
