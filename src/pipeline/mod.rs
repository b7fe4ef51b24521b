/// Serde configuration and named presets.
pub mod config;
/// The banner orchestrator.
pub mod run;
