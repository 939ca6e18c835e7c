use serpdash_core::AppConfig;

use crate::client::SheetsClient;
use crate::parse::parse_csv;
use crate::sample::sample_dataset;
use crate::types::{DataSource, Dataset};

/// Loads the session dataset: the configured live export when possible,
/// otherwise the labeled sample dataset with a user-visible warning.
///
/// This never fails — every failure path degrades to the sample so the
/// dashboard stays up with a clear notice instead of an error page.
pub async fn load_dataset(config: &AppConfig) -> Dataset {
    let Some(url) = &config.sheet_csv_url else {
        tracing::info!("no spreadsheet URL configured; serving sample dataset");
        let mut dataset = sample_dataset();
        dataset.warning =
            Some("No spreadsheet source configured — showing sample data.".to_owned());
        return dataset;
    };

    match fetch_live(config, url).await {
        Ok(dataset) => dataset,
        Err(error) => {
            tracing::warn!(%error, "live spreadsheet load failed; falling back to sample");
            let mut dataset = sample_dataset();
            dataset.warning = Some(format!(
                "Could not load the live spreadsheet ({error}) — showing sample data."
            ));
            dataset
        }
    }
}

async fn fetch_live(config: &AppConfig, url: &str) -> Result<Dataset, crate::SheetsError> {
    let client = SheetsClient::new(
        url,
        config.fetch_timeout_secs,
        config.sheets_api_key.as_deref(),
    )?;
    let body = client
        .fetch_csv_with_retry(
            config.fetch_max_retries,
            config.fetch_retry_backoff_base_ms,
        )
        .await?;
    let (records, summary) = parse_csv(&body)?;

    tracing::info!(
        rows = summary.rows_total,
        dropped_timestamps = summary.rows_dropped_timestamp,
        "loaded live spreadsheet export"
    );
    Ok(Dataset {
        records,
        source: DataSource::Live,
        summary,
        warning: None,
    })
}
