use std::path::PathBuf;

use thiserror::Error;

/// Reasons an uploaded payload is rejected. Nothing downstream runs when the
/// loader returns one of these.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Raw payload is larger than the configured byte cap.
    #[error("payload is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// Too many records and the row-limit policy is `reject`.
    #[error("payload has {rows} records, limit is {limit}")]
    TooManyRows { rows: usize, limit: usize },

    /// The bytes are not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Valid JSON without a `statevector` field.
    #[error("payload has no `statevector` field")]
    MissingField,

    /// `statevector` exists but does not hold a list of labels.
    #[error("invalid `statevector`: {0}")]
    Schema(String),

    /// The file could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// One sentence for the status bar; never includes parser internals.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::TooLarge { limit, .. } => format!(
                "File is too large. Maximum size: {}.",
                format_bytes(*limit)
            ),
            LoadError::TooManyRows { limit, .. } => format!(
                "File has more than {limit} records. Split it into parts to process it."
            ),
            LoadError::Malformed(_) => "File is not valid JSON.".to_string(),
            LoadError::MissingField => {
                "File does not contain a `statevector` field.".to_string()
            }
            LoadError::Schema(_) => {
                "The `statevector` field must be a list of state labels.".to_string()
            }
            LoadError::Io { .. } => "File could not be read.".to_string(),
        }
    }
}

/// Non-fatal conditions reported alongside a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    TooManyRows { rows: usize, limit: usize },
}

impl LoadWarning {
    pub fn user_message(&self) -> String {
        match self {
            LoadWarning::TooManyRows { rows, limit } => format!(
                "File has {rows} records (more than {limit}); consider splitting it into parts."
            ),
        }
    }
}

/// The wildcard pattern could not be compiled.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid filter pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl FilterError {
    pub fn user_message(&self) -> String {
        match self {
            FilterError::InvalidPattern { .. } => {
                "Invalid filter pattern; showing all states.".to_string()
            }
        }
    }
}

/// Human-readable byte size: whole mebibytes as "N MB", anything else in bytes.
pub fn format_bytes(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes > 0 && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_mentions_limit_in_megabytes() {
        let err = LoadError::TooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(err.user_message(), "File is too large. Maximum size: 5 MB.");
        assert!(err.to_string().contains("6291456"));
    }

    #[test]
    fn sub_megabyte_sizes_are_shown_in_bytes() {
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_bytes(512 * 1024), "524288 bytes");
        assert_eq!(format_bytes(0), "0 bytes");
    }

    #[test]
    fn malformed_message_hides_parser_detail() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let detail = parse_err.to_string();
        let err = LoadError::Malformed(parse_err);
        assert!(!err.user_message().contains(&detail));
        assert!(err.to_string().contains(&detail));
    }

    #[test]
    fn messages_are_distinct() {
        let msgs = [
            LoadError::TooLarge { size: 2, limit: 1 }.user_message(),
            LoadError::TooManyRows { rows: 2, limit: 1 }.user_message(),
            LoadError::MissingField.user_message(),
            LoadError::Schema("x".into()).user_message(),
        ];
        for (i, a) in msgs.iter().enumerate() {
            for b in &msgs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
