#![deny(missing_docs)]
#![doc = "Core error taxonomy, unit constants and canonical hashing for the MTS run driver."]

pub mod errors;
pub mod hash;
pub mod units;

pub use errors::{ErrorInfo, MtsError};
pub use hash::{stable_hash_string, to_canonical_json_bytes};
