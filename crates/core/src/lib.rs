pub mod config;
pub mod record;

pub use config::Config;
pub use record::LinkRecord;

/// Fixed textual layout for timestamps: TSV rows and window bounds alike.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
