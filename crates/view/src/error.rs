// ABOUTME: Error types for the view engine including ErrorCode enum and ExtractError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidSelector,
    MissingField,
    AmbiguousField,
    InvalidUrl,
    Record,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidSelector => "invalid selector",
            ErrorCode::MissingField => "missing field",
            ErrorCode::AmbiguousField => "ambiguous field",
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Record => "record error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for extraction operations.
///
/// `path` is the dotted field path inside the page, e.g. `comments.date`.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub page: String,
    pub path: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ipsforum: {} {}: {}", self.page, self.path, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    fn new(
        code: ErrorCode,
        page: impl Into<String>,
        path: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            page: page.into(),
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidSelector error.
    pub fn invalid_selector(
        page: impl Into<String>,
        path: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidSelector, page, path, source)
    }

    /// Create a MissingField error.
    pub fn missing_field(page: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingField, page, path, None)
    }

    /// Create an AmbiguousField error carrying the number of matches.
    pub fn ambiguous_field(
        page: impl Into<String>,
        path: impl Into<String>,
        matches: usize,
    ) -> Self {
        Self::new(
            ErrorCode::AmbiguousField,
            page,
            path,
            Some(anyhow::anyhow!("{} elements matched", matches)),
        )
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        page: impl Into<String>,
        path: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, page, path, source)
    }

    /// Create a Record error.
    pub fn record(
        page: impl Into<String>,
        path: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Record, page, path, source)
    }

    /// Returns true if this is an InvalidSelector error.
    pub fn is_invalid_selector(&self) -> bool {
        self.code == ErrorCode::InvalidSelector
    }

    /// Returns true if this is a MissingField error.
    pub fn is_missing_field(&self) -> bool {
        self.code == ErrorCode::MissingField
    }

    /// Returns true if this is an AmbiguousField error.
    pub fn is_ambiguous_field(&self) -> bool {
        self.code == ErrorCode::AmbiguousField
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Record error.
    pub fn is_record(&self) -> bool {
        self.code == ErrorCode::Record
    }
}

/// Convenience alias used across the engine.
pub type Result<T> = std::result::Result<T, ExtractError>;
