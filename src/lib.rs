//! Justified gallery layout.
//!
//! Items with known aspect ratios are broken into rows whose combined
//! width fills a container at a height close to a target, the way photo
//! galleries in image browsers are laid out.

pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod rebuild;
pub mod resolver;
pub mod scanner;

pub use config::{GalleryConfig, LayoutParams, ResolutionPolicy};
pub use error::{BuildError, ConfigError, ResolutionError};
pub use layout::{CoinFlip, JustifiedLayout};
pub use models::{Extent, Layout, Placement};
pub use rebuild::{GalleryView, LayoutEvent, RebuildController};
pub use resolver::AspectRatioResolver;
