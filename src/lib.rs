//! # Keyscope
//!
//! A CLI for search-grounded SEO keyword analysis using LLMs.
//!
//! ## Features
//!
//! - **Grounded data**: queries Gemini with web search enabled and keeps the citations
//! - **Resilient extraction**: recovers the structured payload even when the model
//!   ignores the requested output format, degrading to partial results instead of failing
//! - **Recent searches**: bounded sled-backed history of submitted queries
//! - **Exports**: JSON and CSV output alongside the terminal view

pub mod analyzer;
pub mod config;
pub mod export;
pub mod extract;
pub mod gemini;
pub mod history;
pub mod metrics;
pub mod prompt;
pub mod volume;

pub use analyzer::{analyze, analyze_with_config, AnalysisError};
pub use config::Config;
pub use history::History;
pub use metrics::AnalysisResult;
