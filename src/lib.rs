// Export modules for library usage
pub mod checks;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod core;
pub mod io;
pub mod manifest;

// Re-export commonly used types
pub use crate::checks::{run_checks, Check, CheckConfig, CollectingSink, DiagnosticSink};
pub use crate::config::ModlintConfig;
pub use crate::context::ModuleContext;
pub use crate::core::errors::{Error, Result};
pub use crate::core::{
    CheckCode, CheckReport, DeclaredRecord, Finding, Location, ReportSummary, Severity, ALL_CODES,
};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
