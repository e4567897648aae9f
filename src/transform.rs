use crate::error::{EtlError, Result};
use crate::types::{GdpRecord, RawGdpRow};
use tracing::info;

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses one comma-grouped USD-millions figure and converts it to billions.
fn to_billions(raw: &str) -> Result<f64> {
    let cleaned = raw.trim().replace(',', "");
    let millions: f64 = cleaned.parse().map_err(|e: std::num::ParseFloatError| {
        EtlError::Format {
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(round2(millions / 1000.0))
}

/// Converts the raw GDP column from USD-millions text to USD-billions
/// numbers, keeping row order. Any unparseable value fails the whole run.
pub fn transform(rows: Vec<RawGdpRow>) -> Result<Vec<GdpRecord>> {
    let records = rows
        .into_iter()
        .map(|row| {
            Ok(GdpRecord {
                country: row.country,
                gdp_usd_billions: to_billions(&row.gdp_usd_millions)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Converted {} GDP figures to USD billions", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(country: &str, gdp: &str) -> RawGdpRow {
        RawGdpRow {
            country: country.to_string(),
            gdp_usd_millions: gdp.to_string(),
        }
    }

    #[test]
    fn test_converts_millions_text_to_billions() {
        let records = transform(vec![raw("Alphaland", "1,234,567")]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "Alphaland");
        assert_eq!(records[0].gdp_usd_billions, 1234.57);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let records = transform(vec![raw("A", "1,239"), raw("B", "999")]).unwrap();
        assert_eq!(records[0].gdp_usd_billions, 1.24);
        assert_eq!(records[1].gdp_usd_billions, 1.0);
    }

    #[test]
    fn test_tolerates_surrounding_whitespace() {
        let records = transform(vec![raw("A", " 2,500 \n")]).unwrap();
        assert_eq!(records[0].gdp_usd_billions, 2.5);
    }

    #[test]
    fn test_unparseable_value_is_a_format_error() {
        let err = transform(vec![raw("A", "n/a")]).unwrap_err();
        match err {
            EtlError::Format { value, .. } => assert_eq!(value, "n/a"),
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[test]
    fn test_keeps_row_order() {
        let records = transform(vec![raw("B", "2,000"), raw("A", "1,000")]).unwrap();
        assert_eq!(records[0].country, "B");
        assert_eq!(records[1].country, "A");
    }
}
