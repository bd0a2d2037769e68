/// Command-line parsing and batch file processing
pub mod cli;
/// Default values and calibration constants
pub mod configuration;
/// Error types with tile context
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Terminal progress display
pub mod progress;
/// Response document written per request
pub mod report;
/// Request document and its validation
pub mod request;
