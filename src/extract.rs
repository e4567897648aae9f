use crate::error::{EtlError, Result};
use crate::types::RawGdpRow;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

/// Em dash (U+2014) the source prints in place of an unavailable figure.
const NO_DATA_MARKER: char = '\u{2014}';

/// Output of a successful extraction: how many tables the document carried
/// and the rows accepted from the first one, in document order.
#[derive(Debug)]
pub struct Extraction {
    pub tables_found: usize,
    pub rows: Vec<RawGdpRow>,
}

/// Parses the page and pulls (country, raw GDP text) pairs out of the first
/// table in document order.
///
/// A row is accepted only when it has at least three data cells, its first
/// cell contains a hyperlink, and its third cell does not carry the em-dash
/// no-data marker. The country name is taken from the link's own text, not
/// the whole cell, because footnote markers sit outside the link.
pub fn extract_table(html: &str) -> Result<Extraction> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let tables: Vec<ElementRef> = document.select(&table_selector).collect();
    info!("Found {} tables in document", tables.len());
    let table = tables
        .first()
        .ok_or_else(|| EtlError::Extraction("no <table> element found in document".to_string()))?;

    let table_rows: Vec<ElementRef> = table.select(&row_selector).collect();
    debug!("Found {} rows in the first table", table_rows.len());
    if table_rows.is_empty() {
        return Err(EtlError::Extraction(
            "first table in document has no rows".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for table_row in &table_rows {
        let cells: Vec<ElementRef> = table_row.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }

        let link = match cells[0].select(&link_selector).next() {
            Some(link) => link,
            None => continue,
        };

        let gdp_text = cells[2].text().collect::<String>();
        if gdp_text.contains(NO_DATA_MARKER) {
            continue;
        }

        let country = link.text().collect::<String>().trim().to_string();
        rows.push(RawGdpRow {
            country,
            gdp_usd_millions: gdp_text.trim().to_string(),
        });
    }

    if rows.is_empty() {
        warn!("First table yielded no rows matching the acceptance filter");
        return Err(EtlError::Extraction(
            "no rows in the first table matched the acceptance filter".to_string(),
        ));
    }

    info!("Extracted {} rows from the first table", rows.len());
    Ok(Extraction {
        tables_found: tables.len(),
        rows,
    })
}
