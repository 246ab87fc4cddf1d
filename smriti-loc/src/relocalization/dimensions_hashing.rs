//! Inverted index over active feature dimensions.
//!
//! Every bit dimension maps to the reference features that have it active.
//! A query feature votes for each reference sharing one of its active
//! dimensions, weighted by how rare that dimension is in the reference
//! sequence (inverse document frequency):
//!
//! ```text
//! weight[d] = ln(ref_size / |index[d]|)
//! score[f]  = Σ weight[d]   for active d in query with f ∈ index[d]
//! accept f  if score[f] >= min + 0.7 · (max - min)
//! ```
//!
//! # Index file format
//!
//! One line per populated dimension: `<dim> <feature-id> <feature-id> ...`.
//! Weights are not stored; call [`DimensionsHashing::weight_index`] with the
//! reference sequence size after loading.

use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use log::{debug, info, trace, warn};

use crate::error::{LocError, Result};
use crate::features::BinaryFeature;
use crate::oracle::Relocalizer;

/// Fraction of the score range a candidate must reach to be accepted.
const ACCEPTANCE_FRACTION: f64 = 0.7;

/// Hashing-based candidate retrieval over binary features
#[derive(Clone, Debug, Default)]
pub struct DimensionsHashing {
    /// Dimension → reference feature ids with that dimension active
    index: BTreeMap<usize, Vec<usize>>,
    /// Dimension → IDF weight
    weights: HashMap<usize, f64>,
    /// Query bit vectors, indexed by query image id
    query_features: Vec<BinaryFeature>,
}

impl DimensionsHashing {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from reference features and compute weights.
    ///
    /// All features must have the same number of bits.
    pub fn build(features: &[BinaryFeature]) -> Result<Self> {
        let first = features.first().ok_or(LocError::EmptyFeatureSet)?;
        let expected = first.bits.len();

        let mut index: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for feature in features {
            if feature.bits.len() != expected {
                return Err(LocError::FeatureLengthMismatch {
                    id: feature.id,
                    expected,
                    found: feature.bits.len(),
                });
            }
            for dim in feature.active_dims() {
                index.entry(dim).or_default().push(feature.id);
            }
        }

        let mut hashing = Self {
            index,
            ..Self::default()
        };
        hashing.weight_index(features.len())?;
        info!(
            "[DimensionsHashing] Indexed {} features over {} dimensions",
            features.len(),
            hashing.index.len()
        );
        Ok(hashing)
    }

    /// Attach the query bit vectors used by [`Relocalizer::candidates`]
    pub fn with_query_features(mut self, features: Vec<BinaryFeature>) -> Self {
        self.query_features = features;
        self
    }

    /// Replace the query bit vectors
    pub fn set_query_features(&mut self, features: Vec<BinaryFeature>) {
        self.query_features = features;
    }

    /// Feature ids stored for a dimension
    pub fn bin(&self, dim: usize) -> Option<&[usize]> {
        self.index.get(&dim).map(Vec::as_slice)
    }

    /// Number of populated dimensions
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no dimension is populated
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether IDF weights are available
    pub fn is_weighted(&self) -> bool {
        !self.weights.is_empty()
    }

    /// IDF weight of a dimension
    pub fn weight(&self, dim: usize) -> Option<f64> {
        self.weights.get(&dim).copied()
    }

    /// Compute IDF weights for a reference sequence of `ref_size` images.
    ///
    /// Must be called after [`load`](Self::load) before any query.
    /// `ref_size` must cover the most populated dimension.
    pub fn weight_index(&mut self, ref_size: usize) -> Result<()> {
        if self.index.is_empty() {
            return Err(LocError::EmptyIndex);
        }
        let largest_bin = self.index.values().map(Vec::len).max().unwrap_or(0);
        if ref_size == 0 || ref_size < largest_bin {
            return Err(LocError::Config(format!(
                "ref_size {} is smaller than the largest bin ({} features)",
                ref_size, largest_bin
            )));
        }
        self.weights = self
            .index
            .iter()
            .map(|(&dim, ids)| (dim, (ref_size as f64 / ids.len() as f64).ln()))
            .collect();
        debug!(
            "[DimensionsHashing] IDF weights computed for ref_size={}",
            ref_size
        );
        Ok(())
    }

    /// Retrieve candidate reference ids for a query bit vector.
    ///
    /// Returned ids are sorted ascending.
    pub fn query(&self, bits: &[bool]) -> Result<Vec<usize>> {
        if self.weights.is_empty() {
            return Err(LocError::WeightsNotComputed);
        }
        let start = Instant::now();

        let mut scores: HashMap<usize, f64> = HashMap::new();
        for (dim, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
            let (Some(ids), Some(&weight)) = (self.index.get(&dim), self.weights.get(&dim)) else {
                continue;
            };
            for &id in ids {
                *scores.entry(id).or_insert(0.0) += weight;
            }
        }

        if scores.is_empty() {
            return Ok(Vec::new());
        }

        let (min_score, max_score) = scores
            .values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        let accepted = ACCEPTANCE_FRACTION * (max_score - min_score) + min_score;

        let mut candidates: Vec<usize> = scores
            .into_iter()
            .filter(|&(_, score)| score >= accepted)
            .map(|(id, _)| id)
            .collect();
        candidates.sort_unstable();

        trace!(
            "[DimensionsHashing] scores min={:.3} max={:.3} accept>={:.3}: {} candidates in {:?}",
            min_score,
            max_score,
            accepted,
            candidates.len(),
            start.elapsed()
        );
        Ok(candidates)
    }

    /// Dump the index at debug level. Verbose for high-dimensional features.
    pub fn log_index(&self) {
        for (dim, ids) in &self.index {
            debug!("[DimensionsHashing] dim {}: {:?}", dim, ids);
        }
    }

    /// Save the index to a text file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!("[DimensionsHashing] Index written to {}", path.display());
        Ok(())
    }

    /// Write the index in the text format
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (dim, ids) in &self.index {
            write!(writer, "{}", dim)?;
            for id in ids {
                write!(writer, " {}", id)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Load an index from a text file. Weights must be computed afterwards.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let hashing = Self::read_from(BufReader::new(file))?;
        info!(
            "[DimensionsHashing] Loaded {} dimensions from {}",
            hashing.index.len(),
            path.display()
        );
        Ok(hashing)
    }

    /// Parse an index from any buffered reader
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace().map(|tok| {
                tok.parse::<usize>().map_err(|e| LocError::Parse {
                    line: i + 1,
                    message: format!("invalid id '{}': {}", tok, e),
                })
            });
            let Some(dim) = tokens.next().transpose()? else {
                continue;
            };
            let ids = tokens.collect::<Result<Vec<usize>>>()?;
            if ids.is_empty() {
                warn!(
                    "[DimensionsHashing] Dimension {} has no features, skipping",
                    dim
                );
                continue;
            }
            index.insert(dim, ids);
        }
        Ok(Self {
            index,
            ..Self::default()
        })
    }
}

impl Relocalizer for DimensionsHashing {
    fn candidates(&self, qu_id: usize) -> Result<Vec<usize>> {
        let feature = self
            .query_features
            .get(qu_id)
            .ok_or(LocError::MissingQueryFeature(qu_id))?;
        let candidates = self.query(&feature.bits)?;
        debug!(
            "[DimensionsHashing] Query {} -> {} candidates",
            qu_id,
            candidates.len()
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_features() -> Vec<BinaryFeature> {
        ["11100000", "11100100", "00001011"]
            .iter()
            .enumerate()
            .map(|(id, s)| BinaryFeature::from_bit_str(id, s).unwrap())
            .collect()
    }

    #[test]
    fn test_build_bins() {
        let hashing = DimensionsHashing::build(&reference_features()).unwrap();

        assert_eq!(hashing.bin(0), Some(&[0, 1][..]));
        assert_eq!(hashing.bin(1), Some(&[0, 1][..]));
        assert_eq!(hashing.bin(2), Some(&[0, 1][..]));
        assert_eq!(hashing.bin(3), None);
        assert_eq!(hashing.bin(4), Some(&[2][..]));
        assert_eq!(hashing.bin(5), Some(&[1][..]));
        assert_eq!(hashing.bin(6), Some(&[2][..]));
        assert_eq!(hashing.bin(7), Some(&[2][..]));
    }

    #[test]
    fn test_idf_weights() {
        let hashing = DimensionsHashing::build(&reference_features()).unwrap();
        assert_relative_eq!(hashing.weight(0).unwrap(), (3.0f64 / 2.0).ln(), epsilon = 1e-12);
        assert_relative_eq!(hashing.weight(7).unwrap(), 3.0f64.ln(), epsilon = 1e-12);
        assert!(hashing.weight(3).is_none());
    }

    #[test]
    fn test_query_accepts_top_scores() {
        let hashing = DimensionsHashing::build(&reference_features()).unwrap();
        let query = BinaryFeature::from_bit_str(0, "11101000").unwrap();
        assert_eq!(hashing.query(&query.bits).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_query_without_overlap_is_empty() {
        let hashing = DimensionsHashing::build(&reference_features()).unwrap();
        let query = BinaryFeature::from_bit_str(0, "00010000").unwrap();
        assert!(hashing.query(&query.bits).unwrap().is_empty());
    }

    #[test]
    fn test_query_requires_weights() {
        let text = "0 0 1\n4 2\n";
        let hashing = DimensionsHashing::read_from(text.as_bytes()).unwrap();
        assert!(!hashing.is_weighted());
        assert!(matches!(
            hashing.query(&[true, false]),
            Err(LocError::WeightsNotComputed)
        ));
    }

    #[test]
    fn test_weight_index_rejects_small_ref_size() {
        let mut hashing = DimensionsHashing::read_from("0 0 1\n4 2\n".as_bytes()).unwrap();
        assert!(matches!(hashing.weight_index(0), Err(LocError::Config(_))));
        assert!(matches!(hashing.weight_index(1), Err(LocError::Config(_))));
        assert!(!hashing.is_weighted());

        hashing.weight_index(2).unwrap();
        assert_relative_eq!(hashing.weight(0).unwrap(), 0.0);
        assert_relative_eq!(hashing.weight(4).unwrap(), 2.0f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_build_rejects_empty_and_ragged() {
        assert!(matches!(
            DimensionsHashing::build(&[]),
            Err(LocError::EmptyFeatureSet)
        ));

        let ragged = vec![
            BinaryFeature::from_bit_str(0, "1100").unwrap(),
            BinaryFeature::from_bit_str(1, "110").unwrap(),
        ];
        assert!(matches!(
            DimensionsHashing::build(&ragged),
            Err(LocError::FeatureLengthMismatch {
                id: 1,
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn test_build_all_zero_features_is_empty_index() {
        let zeros = vec![BinaryFeature::from_bit_str(0, "0000").unwrap()];
        assert!(matches!(
            DimensionsHashing::build(&zeros),
            Err(LocError::EmptyIndex)
        ));
    }

    #[test]
    fn test_text_format() {
        let hashing = DimensionsHashing::build(&reference_features()).unwrap();
        let mut out = Vec::new();
        hashing.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "0 0 1\n1 0 1\n2 0 1\n4 2\n5 1\n6 2\n7 2\n");

        let mut loaded = DimensionsHashing::read_from(text.as_bytes()).unwrap();
        loaded.weight_index(3).unwrap();
        let query = BinaryFeature::from_bit_str(0, "11101000").unwrap();
        assert_eq!(loaded.query(&query.bits).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_relocalizer_uses_query_features() {
        let queries = vec![
            BinaryFeature::from_bit_str(0, "00001011").unwrap(),
            BinaryFeature::from_bit_str(1, "11101000").unwrap(),
        ];
        let hashing = DimensionsHashing::build(&reference_features())
            .unwrap()
            .with_query_features(queries);

        assert_eq!(hashing.candidates(0).unwrap(), vec![2]);
        assert_eq!(hashing.candidates(1).unwrap(), vec![0, 1]);
        assert!(matches!(
            hashing.candidates(2),
            Err(LocError::MissingQueryFeature(2))
        ));
    }
}
