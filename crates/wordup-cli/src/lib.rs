//! WordUp command-line support
//!
//! Configuration, the on-disk session slot and the interactive study loop
//! used by the `wordup` binary.

pub mod config;
pub mod session_file;
pub mod study;

pub use config::Config;
pub use session_file::SessionFile;
