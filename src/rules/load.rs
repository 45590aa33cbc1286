//! Loading the rules table from disk or from the built-in copy.
use super::{RulesFile, RulesTable};
use crate::error::{AdvisorError, Result};
use std::fs;
use std::path::Path;

/// Rules compiled into the binary, used when `--rules` is not given.
pub const BUILTIN_RULES_JSON: &str = include_str!("../../data/rules.json");
/// Origin label reported for the built-in table.
pub const BUILTIN_ORIGIN: &str = "<built-in>";

/// Load rules from `path`, or the built-in table when `path` is `None`.
pub fn load_rules(path: Option<&Path>) -> Result<RulesTable> {
    let table = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|err| AdvisorError::io(format!("read rules {}", path.display()), err))?;
            parse_rules(&text, &path.display().to_string())?
        }
        None => parse_rules(BUILTIN_RULES_JSON, BUILTIN_ORIGIN)?,
    };
    tracing::debug!(
        origin = table.origin(),
        crops = table.list_crops().len(),
        "rules loaded"
    );
    Ok(table)
}

/// Parse and validate a rules JSON document.
pub fn parse_rules(text: &str, origin: &str) -> Result<RulesTable> {
    let file: RulesFile =
        serde_json::from_str(text).map_err(|err| AdvisorError::InvalidRules {
            origin: origin.to_string(),
            reason: err.to_string(),
        })?;
    RulesTable::from_file(file, origin)
}
