//! Rules engine and server-authoritative round flow for four-seat Big Two.

pub mod error;
pub mod game;
pub mod model;
pub mod rules;

pub use error::{BotFault, InvalidPlay};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "bigtwo"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "bigtwo");
        assert!(!AppInfo::version().is_empty());
    }
}
