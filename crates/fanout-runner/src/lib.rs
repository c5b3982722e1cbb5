pub mod config;
pub mod dispatcher;
pub mod expander;
pub mod merger;
pub mod orchestrator;
pub mod outline;
pub mod preflight;
pub mod report;
