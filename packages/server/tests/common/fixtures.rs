//! Test fixtures for element sets and catalog documents.

use tle_format::ElementSet;

/// Element lines for `catalog_number` with the 14-column epoch field
/// `epoch` (e.g. `"24045.50000000"`).
pub fn element_lines(catalog_number: i32, epoch: &str) -> (String, String) {
    (
        format!(
            "1 {:05}U 98067A   {}  .00016717  00000-0  10270-3 0  9999",
            catalog_number, epoch
        ),
        format!(
            "2 {:05}  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579999999",
            catalog_number
        ),
    )
}

/// A decoded element set, built the same way the parser builds one.
pub fn element_set(catalog_number: i32, name: &str, epoch: &str) -> ElementSet {
    let (line1, line2) = element_lines(catalog_number, epoch);
    ElementSet::from_lines(name, &line1, &line2).expect("fixture lines must decode")
}

/// Three-line catalog text for `(catalog_number, name, epoch)` entries.
pub fn catalog_document(entries: &[(i32, &str, &str)]) -> String {
    let mut doc = String::new();
    for (catalog_number, name, epoch) in entries {
        let (line1, line2) = element_lines(*catalog_number, epoch);
        doc.push_str(&format!("{}\n{}\n{}\n", name, line1, line2));
    }
    doc
}
