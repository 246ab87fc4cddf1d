//! Precomputed binary feature vectors.
//!
//! Features are extracted and binarized elsewhere. Here they are loaded from
//! text: one feature per line, `0`/`1` characters with whitespace ignored.
//! The feature id is the line index (blank lines excluded).

use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::error::{LocError, Result};

/// A binarized image descriptor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryFeature {
    /// Image id within its sequence
    pub id: usize,
    /// Bit `b` is `true` when dimension `b` is active
    pub bits: Vec<bool>,
}

impl BinaryFeature {
    /// Create a feature from raw bits
    pub fn new(id: usize, bits: Vec<bool>) -> Self {
        Self { id, bits }
    }

    /// Parse from a string such as `"11100100"` (bit 0 first)
    pub fn from_bit_str(id: usize, s: &str) -> Option<Self> {
        let bits = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()?;
        Some(Self { id, bits })
    }

    /// Indices of the active dimensions
    pub fn active_dims(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(d, &bit)| bit.then_some(d))
    }
}

/// Load bit vectors from a text file
pub fn load_bit_vectors(path: &Path) -> Result<Vec<BinaryFeature>> {
    let file = std::fs::File::open(path)?;
    let features = read_bit_vectors(BufReader::new(file))?;
    info!(
        "[Features] Loaded {} bit vectors from {}",
        features.len(),
        path.display()
    );
    Ok(features)
}

/// Parse bit vectors from any buffered reader
pub fn read_bit_vectors<R: BufRead>(reader: R) -> Result<Vec<BinaryFeature>> {
    let mut features = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let feature =
            BinaryFeature::from_bit_str(features.len(), &line).ok_or_else(|| LocError::Parse {
                line: i + 1,
                message: "bit vectors may only contain '0' and '1'".to_string(),
            })?;
        features.push(feature);
    }
    Ok(features)
}
