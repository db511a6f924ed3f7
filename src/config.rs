use tracing::warn;

use crate::error::ConfigError;

const ENV_TARGET_ROW_HEIGHT: &str = "JGAL_TARGET_ROW_HEIGHT";
const ENV_ROW_HEIGHT_BANDWIDTH: &str = "JGAL_ROW_HEIGHT_BANDWIDTH";
const ENV_JUSTIFY_LAST_ROW: &str = "JGAL_JUSTIFY_LAST_ROW";
const ENV_GUTTER: &str = "JGAL_GUTTER";
const ENV_FULL_WIDTH_CADENCE: &str = "JGAL_FULL_WIDTH_CADENCE";
const ENV_REBUILD_SENSITIVITY: &str = "JGAL_REBUILD_SENSITIVITY";
const ENV_SEED: &str = "JGAL_SEED";

/// What to do when an item's aspect ratio cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionPolicy {
    /// Lay the item out with this ratio instead.
    Substitute(f64),
    /// Leave the item out of the layout.
    Skip,
    /// Abort the whole build.
    Fail,
}

impl ResolutionPolicy {
    /// A substitute ratio must itself be positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Substitute(ratio) if !(ratio.is_finite() && ratio > 0.0) => {
                Err(ConfigError::SubstituteRatio(ratio))
            }
            _ => Ok(()),
        }
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::Substitute(1.0)
    }
}

/// User-facing gallery options.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    /// Row height the layout aims for, in pixels (default: 300)
    pub target_row_height: f64,
    /// Allowed deviation from the target height (default: 50)
    pub row_height_bandwidth: f64,
    /// Stretch the trailing row to the full width (default: false)
    pub justify_last_row: bool,
    /// Spacing between items; passed through to presentation (default: 10)
    pub gutter: f64,
    /// Every Nth eligible row becomes a single full-width item; <= 0 disables (default: -1)
    pub full_width_cadence: i32,
    /// Width change needed before a resize triggers a rebuild (default: 50)
    pub rebuild_sensitivity: f64,
    /// Seed for the early row-close coin; entropy when unset
    pub seed: Option<u64>,
    pub resolution_policy: ResolutionPolicy,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            target_row_height: 300.0,
            row_height_bandwidth: 50.0,
            justify_last_row: false,
            gutter: 10.0,
            full_width_cadence: -1,
            rebuild_sensitivity: 50.0,
            seed: None,
            resolution_policy: ResolutionPolicy::default(),
        }
    }
}

impl GalleryConfig {
    /// Defaults overlaid with any `JGAL_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a key lookup. Unparsable values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, ENV_TARGET_ROW_HEIGHT) {
            self.target_row_height = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_ROW_HEIGHT_BANDWIDTH) {
            self.row_height_bandwidth = v;
        }
        if let Some(v) = lookup(ENV_JUSTIFY_LAST_ROW) {
            self.justify_last_row = is_truthy(&v);
        }
        if let Some(v) = parse_var(&lookup, ENV_GUTTER) {
            self.gutter = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_FULL_WIDTH_CADENCE) {
            self.full_width_cadence = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_REBUILD_SENSITIVITY) {
            self.rebuild_sensitivity = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_SEED) {
            self.seed = Some(v);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_row_height.is_finite() && self.target_row_height > 0.0) {
            return Err(ConfigError::TargetRowHeight(self.target_row_height));
        }
        let bandwidth = self.row_height_bandwidth;
        if !(bandwidth.is_finite() && bandwidth >= 0.0 && bandwidth < self.target_row_height) {
            return Err(ConfigError::Bandwidth {
                bandwidth,
                target: self.target_row_height,
            });
        }
        if !(self.gutter.is_finite() && self.gutter >= 0.0) {
            return Err(ConfigError::Gutter(self.gutter));
        }
        if !(self.rebuild_sensitivity.is_finite() && self.rebuild_sensitivity >= 0.0) {
            return Err(ConfigError::RebuildSensitivity(self.rebuild_sensitivity));
        }
        self.resolution_policy.validate()
    }

    /// Freezes the configuration into the parameters of one build.
    pub fn params(&self, container_width: f64) -> Result<LayoutParams, ConfigError> {
        self.validate()?;
        if !(container_width.is_finite() && container_width > 0.0) {
            return Err(ConfigError::ContainerWidth(container_width));
        }
        Ok(LayoutParams {
            target_row_height: self.target_row_height,
            row_height_bandwidth: self.row_height_bandwidth,
            container_width,
            full_width_cadence: self.full_width_cadence,
            justify_last_row: self.justify_last_row,
            gutter: self.gutter,
        })
    }
}

/// Immutable parameters of a single build. Only obtainable through
/// [`GalleryConfig::params`], so `min_row_height` is always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    target_row_height: f64,
    row_height_bandwidth: f64,
    container_width: f64,
    full_width_cadence: i32,
    justify_last_row: bool,
    gutter: f64,
}

impl LayoutParams {
    pub fn target_row_height(&self) -> f64 {
        self.target_row_height
    }

    pub fn min_row_height(&self) -> f64 {
        self.target_row_height - self.row_height_bandwidth
    }

    pub fn max_row_height(&self) -> f64 {
        self.target_row_height + self.row_height_bandwidth
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn full_width_cadence(&self) -> i32 {
        self.full_width_cadence
    }

    pub fn justify_last_row(&self) -> bool {
        self.justify_last_row
    }

    pub fn gutter(&self) -> f64 {
        self.gutter
    }

    /// Combined ratio at which a row reaches the minimum height and must close.
    pub fn max_aspect_ratio(&self) -> f64 {
        self.container_width / self.min_row_height()
    }

    /// Combined ratio at which a row is short enough to close early.
    pub fn min_aspect_ratio(&self) -> f64 {
        self.container_width / self.max_row_height()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable override");
            None
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
