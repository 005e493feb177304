pub mod format;
pub mod logging;
pub mod progress;

pub use format::{format_duration, format_gib};
pub use logging::{init_logging, LogStream};
pub use progress::create_progress_bar;
