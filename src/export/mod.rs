//! Report writers. JSON is the machine-readable artifact; XLSX is the
//! human-readable one. Both carry the same eight columns per record.

pub mod json;
pub mod xlsx;
