pub mod console;
pub mod csv;
pub mod html;

use crate::ingest::GroupedSeries;
use num_format::{Locale, ToFormattedString};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Format a count with thousands separators.
pub fn format_count<T: ToFormattedString>(n: T) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Scenario groups in report order (by name).
pub fn scenarios_in_order(
    scenarios: &BTreeMap<String, GroupedSeries>,
) -> Vec<(&str, &GroupedSeries)> {
    scenarios.iter().map(|(k, v)| (k.as_str(), v)).collect()
}

/// Product groups in report order: ascending by numeric id, with any id
/// that is not a plain digit string sorting as if it were 0. Ties keep
/// the order the ids first appeared in the input.
pub fn products_in_order(
    products: &BTreeMap<String, GroupedSeries>,
) -> Vec<(&str, &GroupedSeries)> {
    let mut ordered: Vec<(&str, &GroupedSeries)> =
        products.iter().map(|(k, v)| (k.as_str(), v)).collect();
    ordered.sort_by(|a, b| {
        numeric_key(a.0)
            .cmp(&numeric_key(b.0))
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });
    ordered
}

/// Order-preserving key for an arbitrarily long digit string: significant
/// digit count first, then the digits themselves.
fn numeric_key(id: &str) -> (usize, &str) {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return (0, "");
    }
    let significant = id.trim_start_matches('0');
    (significant.len(), significant)
}

/// Path of a report file next to the input: `results.json` becomes
/// `results.<ext>`. Inputs without a `.json` extension get the new
/// extension appended so the input is never overwritten.
pub fn output_path(input: &Path, ext: &str) -> PathBuf {
    match input.extension() {
        Some(e) if e == "json" => input.with_extension(ext),
        _ => {
            let mut name = input.as_os_str().to_os_string();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        }
    }
}
