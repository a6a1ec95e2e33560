// ABOUTME: Configuration options for the view engine and its fluent EngineBuilder.
// ABOUTME: Holds the base URL used for link resolution and the strict-matching switch.

use url::Url;

use crate::engine::Engine;
use crate::error::{ExtractError, Result};

/// Configuration options for the [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Base URL relative `href` values are joined onto.
    pub base_url: Option<Url>,
    /// Treat a required field with no match, or any field with several
    /// matches, as an error instead of taking the first match.
    pub strict: bool,
}

/// Builder for constructing Engine instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    opts: Options,
}

impl EngineBuilder {
    /// Create a new EngineBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an already parsed base URL.
    pub fn base_url(mut self, url: Url) -> Self {
        self.opts.base_url = Some(url);
        self
    }

    /// Parse and set the base URL.
    pub fn base_url_str(self, url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| ExtractError::invalid_url("", url, Some(anyhow::Error::new(e))))?;
        Ok(self.base_url(parsed))
    }

    /// Enable or disable strict matching.
    pub fn strict(mut self, strict: bool) -> Self {
        self.opts.strict = strict;
        self
    }

    /// Build the Engine with the configured options.
    pub fn build(self) -> Engine {
        Engine::new(self.opts)
    }
}
