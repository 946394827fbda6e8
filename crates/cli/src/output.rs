//! Reading recipes and writing generated geometry as JSON.
//!
//! The document is plain data for a downstream renderer: the recipe that
//! reproduces it, a few counts, and every path as an array of `{x, y}`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use seis_core::Recipe;
use seis_flow::PathSet;
use serde_json::{json, Value};

use crate::error::CliError;

/// Loads a recipe file. Unreadable files are I/O errors; unparseable ones
/// are input errors.
pub fn read_recipe(path: &Path) -> Result<Recipe, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read recipe {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("malformed recipe {}: {e}", path.display())))
}

pub fn document(recipe: &Recipe, set: &PathSet) -> Value {
    json!({
        "recipe": recipe,
        "stats": {
            "paths": set.len(),
            "vertices": set.total_vertices(),
            "collision_stops": set.collision_stops(),
            "skipped_origins": set.skipped_origins(),
        },
        "paths": set.paths(),
    })
}

/// Writes `doc` pretty-printed to `output`, or to stdout when `None`.
pub fn write_document(doc: &Value, output: Option<&Path>) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(doc)?;
    match output {
        Some(path) => fs::write(path, text)
            .map_err(|e| CliError::Io(format!("cannot write {}: {e}", path.display()))),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}")?;
            Ok(())
        }
    }
}
