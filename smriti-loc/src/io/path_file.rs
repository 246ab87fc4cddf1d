//! Matched path files.
//!
//! One `qu_id ref_id state` line per path element, state `0` for hidden and
//! `1` for matched steps. Files written by the localizer list the newest
//! element first.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::{NodeState, PathElement};
use crate::error::{LocError, Result};

/// Load a path file
pub fn load_path(path: &Path) -> Result<Vec<PathElement>> {
    let file = std::fs::File::open(path)?;
    read_path(BufReader::new(file))
}

/// Parse path elements from any buffered reader
pub fn read_path<R: BufRead>(reader: R) -> Result<Vec<PathElement>> {
    let mut elements = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let parse_err = |message: String| LocError::Parse {
            line: i + 1,
            message,
        };
        let [qu, r, state] = fields.as_slice() else {
            return Err(parse_err(format!("expected 3 fields, found {}", fields.len())));
        };

        let qu_id = qu
            .parse::<i32>()
            .map_err(|e| parse_err(format!("invalid query id '{}': {}", qu, e)))?;
        let ref_id = r
            .parse::<i32>()
            .map_err(|e| parse_err(format!("invalid reference id '{}': {}", r, e)))?;
        let state = match *state {
            "0" => NodeState::Hidden,
            "1" => NodeState::Real,
            other => return Err(parse_err(format!("invalid state '{}'", other))),
        };
        elements.push(PathElement::new(qu_id, ref_id, state));
    }
    Ok(elements)
}
