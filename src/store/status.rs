use std::fmt;

/// Outcome of the most recent fetch-and-settle cycle.
///
/// `Idle -> Loading -> {Ready, Error}`; both settled states go back to
/// `Loading` only through a new fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

impl StoreStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, StoreStatus::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, StoreStatus::Ready)
    }

    /// The error message, if the last cycle failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            StoreStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStatus::Idle => write!(f, "idle"),
            StoreStatus::Loading => write!(f, "loading"),
            StoreStatus::Ready => write!(f, "ready"),
            StoreStatus::Error(message) => write!(f, "error: {}", message),
        }
    }
}
