use thiserror::Error;

/// Why a placement was refused. Always recoverable: the board and turn are
/// left exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("cell {0} is outside the board")]
    OutOfRange(usize),
    #[error("cell {0} is already taken")]
    Occupied(usize),
    #[error("the game is already over")]
    GameOver,
    #[error("it is not your turn")]
    NotYourTurn,
}

/// A configuration value outside the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {field} value {value:?}")]
pub struct UnknownSetting {
    pub field: &'static str,
    pub value: String,
}

impl UnknownSetting {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}
