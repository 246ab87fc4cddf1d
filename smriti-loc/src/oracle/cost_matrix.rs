//! Dense precomputed cost matrix.
//!
//! Text format: one line per query image, whitespace-separated costs for every
//! reference image. Blank lines are skipped. `inf` is accepted for "no match".

use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use super::CostOracle;
use crate::error::{LocError, Result};

/// Query × reference cost matrix held in memory
#[derive(Clone, Debug)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    /// Row-major costs
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build from rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(LocError::Parse {
                    line: i + 1,
                    message: format!("expected {} costs, found {}", cols, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Matrix filled with a single value
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Overwrite one cost
    pub fn set(&mut self, qu_id: usize, ref_id: usize, cost: f64) -> Result<()> {
        let idx = self.index(qu_id, ref_id)?;
        self.data[idx] = cost;
        Ok(())
    }

    /// Number of query images (rows)
    pub fn query_size(&self) -> usize {
        self.rows
    }

    /// Load from a text file
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let matrix = Self::read_from(BufReader::new(file))?;
        info!(
            "[CostMatrix] Loaded {}x{} costs from {}",
            matrix.rows,
            matrix.cols,
            path.display()
        );
        Ok(matrix)
    }

    /// Parse from any buffered reader
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>().map_err(|e| LocError::Parse {
                        line: i + 1,
                        message: format!("invalid cost '{}': {}", tok, e),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    fn index(&self, qu_id: usize, ref_id: usize) -> Result<usize> {
        if qu_id >= self.rows || ref_id >= self.cols {
            return Err(LocError::CostOutOfRange { qu_id, ref_id });
        }
        Ok(qu_id * self.cols + ref_id)
    }
}

impl CostOracle for CostMatrix {
    fn ref_size(&self) -> usize {
        self.cols
    }

    fn cost(&self, qu_id: usize, ref_id: usize) -> Result<f64> {
        self.index(qu_id, ref_id).map(|idx| self.data[idx])
    }
}
