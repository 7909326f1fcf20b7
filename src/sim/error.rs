use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type shared by the simulation engine and its settings.
pub type Result<T> = std::result::Result<T, SimError>;

/// Conditions the engine signals to its caller.
///
/// All three are local and recoverable: a control loop that sees `NotRunning` or
/// `RunComplete` simply stops stepping, and `InvalidConfig` leaves the previous valid
/// value in place.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A run length, epoch count, learning rate or other parameter was out of range.
    InvalidConfig(String),
    /// `advance` was called while the engine was stopped.
    NotRunning,
    /// `advance` was called after `current_step` reached `max_steps`.
    RunComplete,
}

impl SimError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidConfig(msg.into())
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            SimError::NotRunning => f.write_str("the simulation is not running"),
            SimError::RunComplete => f.write_str("the simulation run is already complete"),
        }
    }
}

impl Error for SimError {}
