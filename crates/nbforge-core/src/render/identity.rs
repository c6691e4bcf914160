//! Stable cell identifiers.

use nbforge_notebook::Cell;

/// Prefix of identifiers derived from cell content.
pub const DERIVED_ID_PREFIX: &str = "cell-";

/// Number of hex digits of the digest kept in a derived identifier.
const DERIVED_ID_LEN: usize = 8;

/// Identifier of a cell: its explicit `id`, or one derived from its source.
pub fn cell_id(cell: &Cell) -> String {
    match cell.id() {
        Some(id) => id.to_string(),
        None => derive_id(cell.source()),
    }
}

/// Derive an identifier from cell source.
///
/// Cells with identical source get identical identifiers.
pub fn derive_id(source: &str) -> String {
    let digest = format!("{:x}", md5::compute(source.as_bytes()));
    format!("{}{}", DERIVED_ID_PREFIX, &digest[..DERIVED_ID_LEN])
}
