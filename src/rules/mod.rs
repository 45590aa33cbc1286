//! Static crop rules: schema, validation, and lookup.
//!
//! The table is loaded once at startup and never mutated afterwards.
mod load;
mod table;
mod types;

pub use load::{load_rules, parse_rules, BUILTIN_ORIGIN, BUILTIN_RULES_JSON};
pub use table::{normalize_crop, RulesTable};
pub use types::*;
