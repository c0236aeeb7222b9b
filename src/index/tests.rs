use super::*;

use tempfile::tempdir;

fn normalized(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    v.iter().map(|x| x / norm).collect()
}

fn fixture_index(dir: &std::path::Path) -> VectorIndex {
    // Three well-separated unit vectors in 4 dims.
    let vectors = vec![
        normalized(&[1.0, 0.0, 0.0, 0.0]),
        normalized(&[0.0, 1.0, 0.0, 0.0]),
        normalized(&[1.0, 1.0, 0.0, 0.0]),
    ];
    let path = dir.join("reviews.idx");
    VectorIndex::write(&path, 4, &vectors).expect("write index");
    VectorIndex::open(&path).expect("open index")
}

#[test]
fn search_returns_descending_similarities() {
    let dir = tempdir().unwrap();
    let index = fixture_index(dir.path());

    let query = normalized(&[1.0, 0.1, 0.0, 0.0]);
    let hits = index.search(&query, 3);

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].1, 0);
    assert!(hits[0].0 >= hits[1].0 && hits[1].0 >= hits[2].0);
    for (sim, _) in &hits {
        assert!((-1.0..=1.0).contains(sim));
    }
}

#[test]
fn k_is_clamped_to_row_count() {
    let dir = tempdir().unwrap();
    let index = fixture_index(dir.path());

    let query = normalized(&[0.0, 1.0, 0.0, 0.0]);
    assert_eq!(index.search(&query, 100).len(), 3);
    assert_eq!(index.search(&query, 0).len(), 0);
}

#[test]
fn dimension_mismatch_returns_empty() {
    let dir = tempdir().unwrap();
    let index = fixture_index(dir.path());
    assert!(index.search(&[1.0, 0.0], 3).is_empty());
}

#[test]
fn metadata_accessors() {
    let dir = tempdir().unwrap();
    let index = fixture_index(dir.path());
    assert_eq!(index.len(), 3);
    assert!(!index.is_empty());
    assert_eq!(index.dim(), Some(4));
    assert!(index.is_available());
}

#[test]
fn missing_file_is_unavailable() {
    let err = VectorIndex::open("/nonexistent/reviews.idx").unwrap_err();
    assert!(matches!(err, IndexError::NotFound { .. }));

    let index = VectorIndex::open_or_unavailable("/nonexistent/reviews.idx");
    assert!(!index.is_available());
    assert!(index.search(&[1.0], 5).is_empty());
    assert_eq!(index.len(), 0);
    assert_eq!(index.dim(), None);
}

#[test]
fn bad_magic_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.idx");
    std::fs::write(&path, b"NOTANIDXooooooooooooooo").unwrap();

    let err = VectorIndex::open(&path).unwrap_err();
    assert!(matches!(err, IndexError::InvalidMagic));
}

#[test]
fn truncated_body_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.idx");
    VectorIndex::write(&path, 4, &[vec![0.5; 4], vec![0.5; 4]]).unwrap();

    // Chop off the second vector.
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();

    let err = VectorIndex::open(&path).unwrap_err();
    assert!(matches!(err, IndexError::Truncated { .. }));
}

#[test]
fn write_rejects_ragged_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ragged.idx");
    let err = VectorIndex::write(&path, 4, &[vec![0.5; 4], vec![0.5; 3]]).unwrap_err();
    assert!(matches!(err, IndexError::InvalidHeader { .. }));
}
