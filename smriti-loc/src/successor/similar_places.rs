//! Aliases between reference images that show the same place.
//!
//! A reference trajectory may revisit a place. Registering the two reference
//! ids as similar lets the search branch to either when it reaches one of
//! them. Pairs are symmetric.
//!
//! File format: one pair per line, `refIdFrom refIdTo`.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{LocError, Result};
use crate::oracle::CostOracle;

/// Symmetric alias table over reference ids
#[derive(Clone, Debug, Default)]
pub struct SimilarPlaces {
    places: BTreeMap<usize, BTreeSet<usize>>,
}

impl SimilarPlaces {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `a` and `b` as the same place (both directions)
    pub fn insert_pair(&mut self, a: usize, b: usize) {
        self.places.entry(a).or_default().insert(b);
        self.places.entry(b).or_default().insert(a);
    }

    /// Aliases of `ref_id`, ascending
    pub fn aliases(&self, ref_id: usize) -> impl Iterator<Item = usize> + '_ {
        self.places
            .get(&ref_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Whether no pair is registered
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Number of distinct registered pairs
    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }

    /// Each registered pair once, as `(larger, smaller)`
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.places
            .iter()
            .flat_map(|(&a, set)| set.range(..=a).map(move |&b| (a, b)))
    }

    /// Estimate similar places from reference-vs-reference costs.
    ///
    /// Registers `(i, j)` for every `j <= i` further apart than
    /// `neighbourhood` whose cost is below `non_match_cost`.
    pub fn estimate(
        self_costs: &dyn CostOracle,
        non_match_cost: f64,
        neighbourhood: usize,
    ) -> Result<Self> {
        let size = self_costs.ref_size();
        let mut places = Self::new();
        for i in 0..size {
            for j in (0..=i).rev() {
                if i - j <= neighbourhood {
                    continue;
                }
                let cost = self_costs.cost(i, j)?;
                if cost < non_match_cost {
                    debug!("[SimilarPlaces] {} ~ {} (cost {:.4})", i, j, cost);
                    places.insert_pair(i, j);
                }
            }
        }
        info!(
            "[SimilarPlaces] Estimated {} pairs over {} reference images",
            places.pair_count(),
            size
        );
        Ok(places)
    }

    /// Load pairs from a text file
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let places = Self::read_from(BufReader::new(file))?;
        info!(
            "[SimilarPlaces] Loaded {} pairs from {}",
            places.pair_count(),
            path.display()
        );
        Ok(places)
    }

    /// Parse pairs from any buffered reader
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut places = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let ids = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<usize>().map_err(|e| LocError::Parse {
                        line: i + 1,
                        message: format!("invalid reference id '{}': {}", tok, e),
                    })
                })
                .collect::<Result<Vec<usize>>>()?;
            match ids.as_slice() {
                [] => continue,
                [from, to] => places.insert_pair(*from, *to),
                _ => {
                    return Err(LocError::Parse {
                        line: i + 1,
                        message: format!("expected 2 reference ids, found {}", ids.len()),
                    });
                }
            }
        }
        Ok(places)
    }

    /// Save pairs to a text file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!("[SimilarPlaces] Pairs written to {}", path.display());
        Ok(())
    }

    /// Write pairs in the text format
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (a, b) in self.pairs() {
            writeln!(writer, "{} {}", a, b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::CostMatrix;

    #[test]
    fn test_pairs_are_symmetric() {
        let mut places = SimilarPlaces::new();
        places.insert_pair(2, 0);

        assert_eq!(places.aliases(2).collect::<Vec<_>>(), vec![0]);
        assert_eq!(places.aliases(0).collect::<Vec<_>>(), vec![2]);
        assert_eq!(places.aliases(1).count(), 0);
        assert_eq!(places.pair_count(), 1);
    }

    #[test]
    fn test_read_and_write() {
        let places = SimilarPlaces::read_from("2 0\n\n5 9\n".as_bytes()).unwrap();
        assert_eq!(places.aliases(9).collect::<Vec<_>>(), vec![5]);

        let mut out = Vec::new();
        places.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 0\n9 5\n");
    }

    #[test]
    fn test_read_rejects_odd_lines() {
        let err = SimilarPlaces::read_from("1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LocError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_estimate_skips_neighbours() {
        let mut costs = CostMatrix::filled(6, 6, 10.0);
        // revisit of place 0 at index 5, and a cheap but adjacent pair
        costs.set(5, 0, 1.0).unwrap();
        costs.set(3, 2, 1.0).unwrap();

        let places = SimilarPlaces::estimate(&costs, 5.0, 2).unwrap();
        assert_eq!(places.pairs().collect::<Vec<_>>(), vec![(5, 0)]);
    }
}
