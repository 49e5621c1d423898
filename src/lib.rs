//! Parse k6 JSON lines output and summarize it as console, CSV, and HTML
//! reports.

pub mod config;
pub mod error;
pub mod ingest;
pub mod report;
pub mod stats;
