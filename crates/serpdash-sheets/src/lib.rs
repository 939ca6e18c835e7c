//! Data source for the dashboard: fetches the published spreadsheet CSV
//! export, parses rows into ranking records, and falls back to a labeled
//! sample dataset when the source is missing or unreachable.

mod client;
mod load;
mod parse;
mod retry;
mod sample;
mod types;

use thiserror::Error;

pub use client::SheetsClient;
pub use load::load_dataset;
pub use parse::parse_csv;
pub use sample::sample_dataset;
pub use types::{DataSource, Dataset, LoadSummary};

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet export not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),
}
