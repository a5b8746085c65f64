use log::info;

use super::table::Table;

/// Cleans a raw table for enrichment.
///
/// Every cell is trimmed and lowercased and rows whose cells are all blank
/// are dropped. Headers are left untouched so column names keep matching the
/// configured text and category columns.
pub fn stage(raw: &Table) -> Table {
    let mut staged = raw.clone();
    let before = staged.len();

    let rows = staged.rows_mut();
    for row in rows.iter_mut() {
        for cell in row.iter_mut() {
            *cell = cell.trim().to_lowercase();
        }
    }
    rows.retain(|row| row.iter().any(|cell| !cell.is_empty()));

    let dropped = before - staged.len();
    info!("Staged {} rows ({} blank rows dropped)", staged.len(), dropped);
    staged
}
