//! File round trips for the matching inputs and the offline tools.

use std::path::Path;

use smriti_loc::config::SmritiConfig;
use smriti_loc::{
    CostMatrix, CostOracle, DimensionsHashing, Relocalizer, SimilarPlaces, load_bit_vectors,
};

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_hash_index_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let bits = dir.path().join("reference_bits.txt");
    let table = dir.path().join("hash_table.txt");
    write(&bits, "11100000\n11100100\n00001011\n");

    let features = load_bit_vectors(&bits).unwrap();
    let built = DimensionsHashing::build(&features).unwrap();
    built.save(&table).unwrap();

    let mut loaded = DimensionsHashing::load(&table).unwrap();
    assert!(!loaded.is_weighted());
    loaded.weight_index(features.len()).unwrap();

    assert_eq!(loaded.len(), built.len());
    let query = [true, true, true, false, true, false, false, false];
    assert_eq!(loaded.query(&query).unwrap(), built.query(&query).unwrap());
    assert_eq!(loaded.query(&query).unwrap(), vec![0, 1]);
}

#[test]
fn test_hashing_relocalizer_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let reference = dir.path().join("reference_bits.txt");
    let query = dir.path().join("query_bits.txt");
    write(&reference, "1100\n0110\n0011\n");
    write(&query, "0011\n1000\n");

    let hashing = DimensionsHashing::build(&load_bit_vectors(&reference).unwrap())
        .unwrap()
        .with_query_features(load_bit_vectors(&query).unwrap());

    assert_eq!(hashing.candidates(0).unwrap(), vec![2]);
    assert_eq!(hashing.candidates(1).unwrap(), vec![0]);
    assert!(hashing.candidates(2).is_err());
}

#[test]
fn test_similar_places_estimate_save_load() {
    let dir = tempfile::tempdir().unwrap();
    let costs_file = dir.path().join("ref_vs_ref.txt");
    let pairs_file = dir.path().join("similar_places.txt");

    // 6 reference images, image 5 revisits image 0
    let mut rows = vec![vec![9.0; 6]; 6];
    for (i, row) in rows.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    rows[5][0] = 1.0;
    rows[0][5] = 1.0;
    let text: String = rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            cells.join(" ") + "\n"
        })
        .collect();
    write(&costs_file, &text);

    let costs = CostMatrix::load(&costs_file).unwrap();
    assert_eq!(costs.ref_size(), 6);
    let places = SimilarPlaces::estimate(&costs, 3.0, 2).unwrap();
    places.save(&pairs_file).unwrap();

    assert_eq!(std::fs::read_to_string(&pairs_file).unwrap(), "5 0\n");
    let loaded = SimilarPlaces::load(&pairs_file).unwrap();
    assert_eq!(loaded.aliases(0).collect::<Vec<_>>(), vec![5]);
    assert_eq!(loaded.aliases(5).collect::<Vec<_>>(), vec![0]);
}

#[test]
fn test_sample_config_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/smriti.yaml");
    let config = SmritiConfig::load(&path).unwrap();

    assert_eq!(config.search.fan_out, 2);
    assert!(config.data.hash_table.is_some());
    assert!(config.output.svg_file.is_none());
    assert_eq!(config.search.to_localizer_config(100).query_size, 100);
}

#[test]
fn test_missing_files_are_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    assert!(matches!(
        CostMatrix::load(&missing),
        Err(smriti_loc::LocError::Io(_))
    ));
    assert!(matches!(
        DimensionsHashing::load(&missing),
        Err(smriti_loc::LocError::Io(_))
    ));
}
