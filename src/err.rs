use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormatError>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors produced while registering templates or rendering an event.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("bad format specifier `{kind}`")]
    InvalidKind { kind: char },

    #[error("bad format specifier `{spec}` - {reason}")]
    MalformedSpec { spec: String, reason: &'static str },

    #[error("expecting elapsed value")]
    MissingElapsed,

    #[error("invalid escape char in format `\\{found}`")]
    InvalidEscape { found: char },

    #[error("format ends with a lone `\\`")]
    DanglingEscape,

    #[error("payload too short to read {what} (need {need} bytes, have {have})")]
    PayloadTooShort {
        what: &'static str,
        need: usize,
        have: usize,
    },

    #[error("failed to format field")]
    Fmt(#[from] std::fmt::Error),

    #[error("an I/O error has occurred while writing output: {0}")]
    Io(#[from] io::Error),
}

impl FormatError {
    /// Errors that make the whole configuration unusable, as opposed to a single bad event.
    ///
    /// A template with a bad escape fails for every event it is applied to, and a template
    /// asking for elapsed time is a promise from the caller that it is always available.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FormatError::MissingElapsed
                | FormatError::InvalidEscape { .. }
                | FormatError::DanglingEscape
        )
    }
}

/// Errors produced while decoding binary trace records.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid trace record magic at offset {offset}, found `{magic:02x?}`")]
    InvalidRecordMagic { offset: u64, magic: [u8; 4] },

    #[error("trace record at offset {offset} is truncated (need {need} bytes, have {have})")]
    TruncatedRecord {
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error("an I/O error has occurred while reading trace records: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_errors_are_fatal() {
        assert!(FormatError::MissingElapsed.is_fatal());
        assert!(FormatError::InvalidEscape { found: 'q' }.is_fatal());
        assert!(FormatError::DanglingEscape.is_fatal());
    }

    #[test]
    fn test_event_errors_are_not_fatal() {
        let err = FormatError::PayloadTooShort {
            what: "pdu integer",
            need: 8,
            have: 2,
        };
        assert!(!err.is_fatal());
        assert!(!FormatError::InvalidKind { kind: 'Z' }.is_fatal());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FormatError::InvalidEscape { found: 'q' }.to_string(),
            "invalid escape char in format `\\q`"
        );
        assert_eq!(
            FormatError::InvalidKind { kind: 'Z' }.to_string(),
            "bad format specifier `Z`"
        );
    }
}
