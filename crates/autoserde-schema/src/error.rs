use std::fmt;
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("type path must not be empty")]
    EmptyPath,

    #[error("type '{0}' is not in the catalog")]
    UnknownType(String),

    #[error("enum '{0}' is not in the catalog")]
    UnknownEnum(String),

    #[error("validation failed: {0}")]
    Validation(ErrorTree),
}

///
/// ErrorTree
/// Accumulates messages keyed by route (type path, property, constant).
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<(String, String)>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn add(&mut self, message: impl fmt::Display) {
        self.messages.push((String::new(), message.to_string()));
    }

    pub fn add_at(&mut self, route: impl Into<String>, message: impl fmt::Display) {
        self.messages.push((route.into(), message.to_string()));
    }

    pub fn merge(&mut self, other: Self) {
        self.messages.extend(other.messages);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(r, m)| (r.as_str(), m.as_str()))
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (route, message)) in self.messages.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if route.is_empty() {
                f.write_str(message)?;
            } else {
                write!(f, "{route}: {message}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

/// Push a formatted message onto an `ErrorTree`.
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}
