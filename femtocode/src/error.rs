use std::fmt;

/// Error types for the Femtocode schema algebra.
///
/// Domain-level impossibilities (an empty intersection, an indeterminate
/// arithmetic form) are *not* errors: they are represented by the
/// `Schema::Impossible` variant so the caller can decide where to report
/// them. `FemtocodeError` covers rejected declarations, malformed JSON,
/// and misuse of the public API.
#[derive(Debug, Clone, PartialEq)]
pub enum FemtocodeError {
    /// A schema declaration was rejected (invalid interval, bad field
    /// name, alias on a union, ...)
    Declaration(String),

    /// Alias resolution failed: a name bound twice to different schemas,
    /// or a reference to a name that is never defined
    Resolution(String),

    /// Schema JSON could not be interpreted; carries the JSON path to the
    /// offending element
    Json { message: String, path: String },

    /// A semantic query was attempted on a schema that still contains
    /// unresolved alias strings
    Unresolved(String),

    /// An operation was called with arguments outside its contract
    InvalidArgument(String),
}

impl FemtocodeError {
    pub fn declaration(message: impl Into<String>) -> Self {
        Self::Declaration(message.into())
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution(message.into())
    }

    pub fn json(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::Unresolved(name.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl fmt::Display for FemtocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FemtocodeError::Declaration(msg) => write!(f, "Declaration error: {}", msg),
            FemtocodeError::Resolution(msg) => write!(f, "Resolution error: {}", msg),
            FemtocodeError::Json { message, path } => {
                write!(f, "Schema JSON error: {} at {}", message, path)
            }
            FemtocodeError::Unresolved(name) => {
                write!(
                    f,
                    "Unresolved alias \"{}\": call resolve before semantic queries",
                    name
                )
            }
            FemtocodeError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for FemtocodeError {}
