use crate::types::{CountOrder, Dataset, PriceCeiling, WineRecord};
use std::cmp::Ordering;

/// Number of countries each panel ranks.
pub const TOP_N: usize = 5;

/// Countries with the highest average price at or below `ceiling`.
pub fn top_by_price(dataset: &Dataset, ceiling: PriceCeiling) -> Vec<&WineRecord> {
    let mut rows: Vec<&WineRecord> = dataset
        .records()
        .iter()
        .filter(|r| ceiling.admits(r.average_price))
        .collect();

    rows.sort_by(|a, b| by_price_desc(a.average_price, b.average_price));
    rows.truncate(TOP_N);
    rows
}

/// Descending order with NaN ranked after every real price.
fn by_price_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.total_cmp(&a),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// Countries at the requested end of the wine-count ranking.
pub fn top_by_count(dataset: &Dataset, order: CountOrder) -> Vec<&WineRecord> {
    let mut rows: Vec<&WineRecord> = dataset.records().iter().collect();

    rows.sort_by(|a, b| match order {
        CountOrder::Fewest => a.count.cmp(&b.count),
        CountOrder::Most => b.count.cmp(&a.count),
    });
    rows.truncate(TOP_N);
    rows
}
