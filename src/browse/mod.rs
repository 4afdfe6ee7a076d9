mod scan;

pub use scan::{scan_dir, Entry, ScanOptions};
