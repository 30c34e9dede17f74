// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Record parsing for delimited input lines
// No I/O, no async, no external dependencies

mod record;

pub use record::Record;
