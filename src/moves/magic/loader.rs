use once_cell::sync::OnceCell;

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;

/// Fixed seed for the magic search; every run builds identical tables.
pub const MAGIC_SEED: u64 = 0x5CA1_AB1E_0DDB_A115;

#[cfg(feature = "load_magic")]
pub const MAGIC_TABLE_PATH: &str = "magics.bin";

/// Returns the sliding attack tables, generating them on first use.
///
/// With the `load_magic` feature a cached `magics.bin` is tried first; a
/// missing or unreadable cache silently falls back to generation.
pub fn load_magic_tables() -> MagicTables {
    #[cfg(feature = "load_magic")]
    if let Some(tables) = read_cached() {
        return tables;
    }

    generate_magic_tables(MagicTableSeed::Fixed(MAGIC_SEED))
        .expect("magic search converges with the fixed seed")
}

/// Process-wide shared tables, built on first use. Prefer this over
/// `load_magic_tables` anywhere more than one consumer runs in the process.
pub fn magic_tables() -> &'static MagicTables {
    static TABLES: OnceCell<MagicTables> = OnceCell::new();
    TABLES.get_or_init(load_magic_tables)
}

#[cfg(feature = "load_magic")]
fn read_cached() -> Option<MagicTables> {
    let file = std::fs::File::open(MAGIC_TABLE_PATH).ok()?;
    bincode::deserialize_from(std::io::BufReader::new(file)).ok()
}

#[cfg(feature = "load_magic")]
pub fn save_magic_tables(tables: &MagicTables) -> Result<(), String> {
    let file = std::fs::File::create(MAGIC_TABLE_PATH).map_err(|e| e.to_string())?;
    bincode::serialize_into(std::io::BufWriter::new(file), tables).map_err(|e| e.to_string())
}
