use std::path::PathBuf;

use thiserror::Error;

/// Rejected gallery configuration. Raised before any item is resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("target row height must be positive and finite, got {0}")]
    TargetRowHeight(f64),
    #[error("row height bandwidth must be in [0, {target}), got {bandwidth}")]
    Bandwidth { bandwidth: f64, target: f64 },
    #[error("gutter must be non-negative and finite, got {0}")]
    Gutter(f64),
    #[error("rebuild sensitivity must be non-negative and finite, got {0}")]
    RebuildSensitivity(f64),
    #[error("container width must be positive and finite, got {0}")]
    ContainerWidth(f64),
    #[error("substitute aspect ratio must be positive and finite, got {0}")]
    SubstituteRatio(f64),
}

/// Failure to obtain an item's aspect ratio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidRatio(f64),
    #[error("degenerate media dimensions {width}x{height}")]
    Degenerate { width: u32, height: u32 },
    #[error("failed to read dimensions of {path:?}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("resolution task failed: {0}")]
    TaskFailed(String),
}

/// Errors that abort a whole layout build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("item {index}: {source}")]
    Resolution {
        index: usize,
        #[source]
        source: ResolutionError,
    },
}
