pub mod file_scanner;

pub use file_scanner::{discover_images, scan_images, ScanConfig};
