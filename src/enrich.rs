use crate::error::{EtlError, Result};
use crate::transform::round2;
use crate::types::{EnrichedGdpRecord, GdpRecord};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// One `Currency,Rate` line from the reference file.
#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Exchange rates keyed by currency code. Loaded once from the reference CSV
/// and immutable for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRates {
    rates: HashMap<String, f64>,
}

impl ExchangeRates {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;

        let mut rates = HashMap::new();
        for result in reader.deserialize() {
            let row: RateRow = result?;
            if !row.rate.is_finite() || row.rate <= 0.0 {
                return Err(EtlError::Format {
                    value: row.rate.to_string(),
                    reason: format!("exchange rate for {} must be a positive number", row.currency),
                });
            }
            rates.insert(row.currency, row.rate);
        }

        info!("Loaded {} exchange rates from {}", rates.len(), path.display());
        Ok(Self { rates })
    }

    /// Builds a rate table directly from code.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            rates: pairs.into_iter().map(|(code, rate)| (code.into(), rate)).collect(),
        }
    }

    pub fn get(&self, currency: &str) -> Result<f64> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| EtlError::MissingRate(currency.to_string()))
    }
}

/// Derives the three converted market-cap columns, appended in the fixed
/// GBP, EUR, INR order. Each value is `GDP_USD_billions * rate` rounded to
/// two decimals. A required rate missing from the table fails the run before
/// any record is converted.
pub fn enrich(records: &[GdpRecord], rates: &ExchangeRates) -> Result<Vec<EnrichedGdpRecord>> {
    let gbp = rates.get("GBP")?;
    let eur = rates.get("EUR")?;
    let inr = rates.get("INR")?;

    let enriched = records
        .iter()
        .map(|record| EnrichedGdpRecord {
            country: record.country.clone(),
            gdp_usd_billions: record.gdp_usd_billions,
            mc_gbp_billion: round2(record.gdp_usd_billions * gbp),
            mc_eur_billion: round2(record.gdp_usd_billions * eur),
            mc_inr_billion: round2(record.gdp_usd_billions * inr),
        })
        .collect();

    info!("Derived currency columns for {} records", records.len());
    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn test_rates() -> ExchangeRates {
        ExchangeRates::from_pairs([("GBP", 0.8), ("EUR", 0.9), ("INR", 80.0)])
    }

    #[test]
    fn test_enrich_derives_all_three_columns() {
        let records = vec![GdpRecord {
            country: "Alphaland".to_string(),
            gdp_usd_billions: 100.0,
        }];

        let enriched = enrich(&records, &test_rates()).unwrap();
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].country, "Alphaland");
        assert_eq!(enriched[0].gdp_usd_billions, 100.0);
        assert_eq!(enriched[0].mc_gbp_billion, 80.0);
        assert_eq!(enriched[0].mc_eur_billion, 90.0);
        assert_eq!(enriched[0].mc_inr_billion, 8000.0);
    }

    #[test]
    fn test_enrich_rounds_converted_values() {
        let records = vec![GdpRecord {
            country: "A".to_string(),
            gdp_usd_billions: 3385.09,
        }];

        let enriched = enrich(&records, &test_rates()).unwrap();
        assert_eq!(enriched[0].mc_eur_billion, 3046.58);
    }

    #[test]
    fn test_missing_currency_is_a_lookup_error() {
        let rates = ExchangeRates::from_pairs([("GBP", 0.8), ("EUR", 0.9)]);
        let records = vec![GdpRecord {
            country: "A".to_string(),
            gdp_usd_billions: 1.0,
        }];

        let err = enrich(&records, &rates).unwrap_err();
        match err {
            EtlError::MissingRate(code) => assert_eq!(code, "INR"),
            other => panic!("expected MissingRate, got {other:?}"),
        }
    }

    #[test]
    fn test_rates_load_from_reference_csv() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("exchange_rate.csv");
        fs::write(&path, "Currency,Rate\nEUR,0.93\nGBP,0.8\nINR,82.95\n").unwrap();

        let rates = ExchangeRates::from_csv_path(&path).unwrap();
        assert_eq!(rates.get("EUR").unwrap(), 0.93);
        assert_eq!(rates.get("GBP").unwrap(), 0.8);
        assert_eq!(rates.get("INR").unwrap(), 82.95);
        assert!(rates.get("JPY").is_err());
    }

    #[test]
    fn test_non_positive_rate_is_rejected_at_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("exchange_rate.csv");
        fs::write(&path, "Currency,Rate\nGBP,-0.8\n").unwrap();

        let err = ExchangeRates::from_csv_path(&path).unwrap_err();
        assert!(matches!(err, EtlError::Format { .. }));
    }
}
