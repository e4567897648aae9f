use crate::config::Config;
use crate::db::{Database, QueryOutput};
use crate::enrich::{enrich, ExchangeRates};
use crate::error::Result;
use crate::extract::extract_table;
use crate::fetch::fetch_page;
use crate::logging::ProgressLog;
use crate::storage::write_csv;
use crate::transform::transform;
use crate::types::EnrichedGdpRecord;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Summary of a completed run, returned to the caller for printing.
#[derive(Debug)]
pub struct PipelineReport {
    pub tables_found: usize,
    pub rows_extracted: usize,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    /// The full dataset with currency columns, in document order.
    pub records: Vec<EnrichedGdpRecord>,
    /// EUR market cap of the fifth row; None when fewer than five rows came
    /// out of extraction.
    pub fifth_largest_mc_eur: Option<f64>,
    pub sample_query: String,
    pub query_output: QueryOutput,
}

/// The linear extract-transform-load sequence. Single-threaded and blocking
/// end to end; any stage failure aborts the run.
pub struct Pipeline {
    config: Config,
    progress: ProgressLog,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let progress = ProgressLog::new(config.progress_log_path.clone());
        Self { config, progress }
    }

    /// Fetches the configured source page and runs the rest of the pipeline
    /// on it.
    #[instrument(skip(self), fields(url = %self.config.source_url))]
    pub fn run(&self) -> Result<PipelineReport> {
        info!("📡 Fetching source page...");
        println!("📡 Fetching source page...");
        let page = fetch_page(&self.config.source_url)?;
        self.run_with_page(&page)
    }

    /// Drives extraction through load and enrichment for an already-fetched
    /// page. The SQLite handle lives inside this call and is released on
    /// every exit path, including failures.
    #[instrument(skip(self, page))]
    pub fn run_with_page(&self, page: &str) -> Result<PipelineReport> {
        self.progress.record("ETL run started")?;

        let extraction = extract_table(page)?;
        let tables_found = extraction.tables_found;
        info!(
            "✅ Extracted {} rows from the first of {} tables",
            extraction.rows.len(),
            tables_found
        );
        println!(
            "✅ Extracted {} rows from the first of {} tables",
            extraction.rows.len(),
            tables_found
        );
        self.progress
            .record("Extraction complete. Starting transformation")?;

        let records = transform(extraction.rows)?;
        println!("🔧 Converted {} GDP figures to USD billions", records.len());
        self.progress
            .record("Transformation complete. Starting load")?;

        write_csv(&records, &self.config.csv_path)?;
        println!("💾 Saved dataset to {}", self.config.csv_path.display());
        self.progress.record("Dataset written to CSV file")?;

        let mut db = Database::open(&self.config.db_path)?;
        self.progress.record("SQLite connection opened")?;
        db.replace_table(&self.config.table_name, &records)?;
        println!(
            "💾 Loaded table {} in {}",
            self.config.table_name,
            self.config.db_path.display()
        );
        self.progress.record("Dataset loaded into database table")?;

        let rates = ExchangeRates::from_csv_path(&self.config.exchange_rate_path)?;
        let enriched = enrich(&records, &rates)?;
        println!("✅ Derived currency columns for {} records", enriched.len());

        let fifth_largest_mc_eur = fifth_largest_eur(&enriched);

        let sample_query = format!("SELECT * FROM {}", self.config.table_name);
        let query_output = db.run_query(&sample_query)?;
        self.progress.record("Sample query executed")?;
        self.progress.record("Run complete")?;

        Ok(PipelineReport {
            tables_found,
            rows_extracted: records.len(),
            csv_path: self.config.csv_path.clone(),
            db_path: self.config.db_path.clone(),
            table_name: self.config.table_name.clone(),
            records: enriched,
            fifth_largest_mc_eur,
            sample_query,
            query_output,
        })
    }
}

/// The source table lists banks largest-first, so the fifth row carries the
/// published "5th largest" figure. Short datasets yield None instead of an
/// out-of-range failure.
fn fifth_largest_eur(records: &[EnrichedGdpRecord]) -> Option<f64> {
    records.get(4).map(|record| record.mc_eur_billion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(country: &str, mc_eur_billion: f64) -> EnrichedGdpRecord {
        EnrichedGdpRecord {
            country: country.to_string(),
            gdp_usd_billions: 0.0,
            mc_gbp_billion: 0.0,
            mc_eur_billion,
            mc_inr_billion: 0.0,
        }
    }

    #[test]
    fn test_fifth_largest_reads_the_fifth_row() {
        let records = vec![
            enriched("A", 5.0),
            enriched("B", 4.0),
            enriched("C", 3.0),
            enriched("D", 2.0),
            enriched("E", 1.0),
            enriched("F", 0.5),
        ];
        assert_eq!(fifth_largest_eur(&records), Some(1.0));
    }

    #[test]
    fn test_short_dataset_reports_no_fifth_value() {
        let records = vec![enriched("A", 5.0), enriched("B", 4.0)];
        assert_eq!(fifth_largest_eur(&records), None);
        assert_eq!(fifth_largest_eur(&[]), None);
    }
}
