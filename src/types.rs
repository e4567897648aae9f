use serde::{Deserialize, Serialize};

/// A row as pulled straight out of the source table: the country name from
/// the first cell's link and the untouched GDP text from the third cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGdpRow {
    pub country: String,
    pub gdp_usd_millions: String,
}

/// The normalized record persisted to CSV and SQLite. The serde renames are
/// the exact column names both sinks use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "GDP_USD_billions")]
    pub gdp_usd_billions: f64,
}

/// A record with the three converted market-cap columns appended, in the
/// fixed GBP, EUR, INR order. These live in memory for the run report only;
/// both sinks are written before enrichment happens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedGdpRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "GDP_USD_billions")]
    pub gdp_usd_billions: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub mc_gbp_billion: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub mc_eur_billion: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub mc_inr_billion: f64,
}
