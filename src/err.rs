use thiserror::Error;

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors surfaced while reading or decoding the bytes behind a pattern.
///
/// Lookup misses and malformed member lists are not errors; only byte access
/// and value decoding can fail.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("read of {len} bytes at offset 0x{offset:X} is outside the data source (size {source_len})")]
    OutOfBounds {
        offset: u64,
        len: u64,
        source_len: u64,
    },

    #[error("byte provider failed to read {len} bytes at offset 0x{offset:X}: {message}")]
    Provider {
        offset: u64,
        len: u64,
        message: String,
    },

    #[error("cannot decode `{type_name}` from {size} bytes")]
    UnsupportedWidth { type_name: String, size: u64 },
}

impl PatternError {
    pub(crate) fn unsupported_width(type_name: &str, size: u64) -> Self {
        PatternError::UnsupportedWidth {
            type_name: type_name.to_owned(),
            size,
        }
    }
}
