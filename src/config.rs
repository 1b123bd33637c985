//! Engine limits and thresholds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::latex::DEFAULT_MAX_DEPTH;

/// Tunable limits for footnote indexing, resolution and output wrapping.
///
/// Every field has a default, so a partial JSON document is a valid config:
///
/// ```
/// use archtex::Config;
///
/// let config = Config::from_json_str(r#"{ "max_line_length": 2000 }"#).unwrap();
/// assert_eq!(config.max_line_length, 2000);
/// assert_eq!(config.max_footnote_length, 50_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Footnote bodies longer than this many characters are treated as
    /// runaway content and never indexed.
    pub max_footnote_length: usize,
    /// Candidate definitions shorter than this are skipped as noise.
    pub min_footnote_text_length: usize,
    /// Output lines longer than this are wrapped at spaces.
    pub max_line_length: usize,
    /// Maximum number of unmatched references reported in diagnostics.
    pub unmatched_sample_limit: usize,
    /// How many nodes after a footnotes heading the fallback passes inspect.
    pub footnote_scan_limit: usize,
    /// Element nesting below which the renderer stops walking the tree and
    /// emits a subtree as plain text.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_footnote_length: 50_000,
            min_footnote_text_length: 10,
            max_line_length: 10_000,
            unmatched_sample_limit: 5,
            footnote_scan_limit: 50,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject limits that would disable the engine outright.
    pub fn validate(&self) -> Result<()> {
        if self.max_footnote_length == 0 {
            return Err(Error::InvalidConfig(
                "max_footnote_length must be positive".to_string(),
            ));
        }
        if self.min_footnote_text_length >= self.max_footnote_length {
            return Err(Error::InvalidConfig(format!(
                "min_footnote_text_length ({}) must be below max_footnote_length ({})",
                self.min_footnote_text_length, self.max_footnote_length
            )));
        }
        if self.max_line_length == 0 {
            return Err(Error::InvalidConfig(
                "max_line_length must be positive".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig("max_depth must be positive".to_string()));
        }
        Ok(())
    }
}
