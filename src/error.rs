use std::fmt;

/// Errors surfaced by the simulation core
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// A position or velocity setter received a non-finite component
    NonFinite { what: &'static str, x: f32, y: f32 },
    /// Spawn requested from a pool with no inactive entities
    PoolExhausted { pool: &'static str, capacity: usize },
    /// A settings value failed validation
    InvalidSetting { field: &'static str, reason: String },
    /// Settings JSON could not be parsed
    Parse(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { what, x, y } => {
                write!(f, "non-finite {what}: ({x}, {y})")
            }
            Self::PoolExhausted { pool, capacity } => {
                write!(f, "{pool} pool exhausted (capacity {capacity})")
            }
            Self::InvalidSetting { field, reason } => {
                write!(f, "invalid setting `{field}`: {reason}")
            }
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
