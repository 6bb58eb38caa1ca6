use crate::types::{Dataset, WineRecord};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    info!("Loading wine data from {:?}", path);

    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    let dataset = read_dataset(file)
        .with_context(|| format!("Failed to parse CSV file: {:?}", path))?;

    if dataset.is_empty() {
        warn!("{:?} has no rows; charts will render empty", path);
    }
    info!("Loaded {} countries", dataset.len());
    Ok(dataset)
}

/// Parses the table from any reader. The leading index column, when present,
/// has no header name and is skipped along with any other unknown column.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for (internal, accepted) in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| accepted.contains(&h)) {
            return Err(anyhow!("Column '{}' not found in CSV", internal));
        }
    }

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize::<WineRecord>().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        let line = row + 2;
        let record = result.with_context(|| format!("Invalid value on line {}", line))?;
        if !record.average_price.is_finite() {
            return Err(anyhow!(
                "Invalid value on line {}: average price '{}' is not a finite number",
                line,
                record.average_price
            ));
        }
        records.push(record);
    }

    Ok(Dataset::new(records))
}

const REQUIRED_COLUMNS: [(&str, &[&str]); 3] = [
    ("Country", &["Country", "País", "Pais"]),
    ("AveragePrice", &["AveragePrice", "Average Price", "Preço Médio", "Preco Medio"]),
    ("Count", &["Count", "Número", "Numero"]),
];
