//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system (reads `RUST_LOG`)
pub fn init() {
    env_logger::init();
}

/// Initialize logging for tests, tolerating repeated initialization
pub fn try_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
