//! Error types for configuration builds.

use thiserror::Error;

/// Errors raised while building or rendering exporter configuration.
///
/// A build is one-shot: every variant is fatal and aborts the generation
/// pass. There is no retry policy.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to serialize a module or scrape config to YAML.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// Failed to write an output file.
    #[error("failed to write output file: {0}")]
    Io(#[from] std::io::Error),

    /// A rule destination is not a parseable URL.
    #[error("invalid destination URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A target references a module name missing from the registry.
    #[error("target '{target}' references unknown module '{module}'")]
    UnknownModule { target: String, module: String },
}
