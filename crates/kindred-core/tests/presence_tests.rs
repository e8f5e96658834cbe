use kindred_core::analysis::PresenceMatrix;
use kindred_core::Error;

fn relation(rows: &[(&str, &str)]) -> Vec<(String, String)> {
    rows.iter()
        .map(|(collection, fingerprint)| (collection.to_string(), fingerprint.to_string()))
        .collect()
}

#[test]
fn test_presence_from_simple_relation() {
    // A holds h1 and h2, B holds only h1.
    let rows = relation(&[("A", "h1"), ("A", "h2"), ("B", "h1")]);
    let matrix = PresenceMatrix::from_relation(&rows).unwrap();

    assert_eq!(matrix.fingerprints(), ["h1", "h2"]);
    assert_eq!(matrix.collections(), ["A", "B"]);

    assert_eq!(matrix.cell(0, 0), 1); // (h1, A)
    assert_eq!(matrix.cell(0, 1), 1); // (h1, B)
    assert_eq!(matrix.cell(1, 0), 1); // (h2, A)
    assert_eq!(matrix.cell(1, 1), 0); // (h2, B)

    assert_eq!(matrix.column_sum(0), 2);
    assert_eq!(matrix.column_sum(1), 1);
}

#[test]
fn test_empty_relation_is_rejected() {
    let err = PresenceMatrix::from_relation(&[]).unwrap_err();
    assert!(matches!(err, Error::EmptyInput(_)));
}

#[test]
fn test_every_row_has_a_presence() {
    let rows = relation(&[("x", "f1"), ("y", "f2"), ("z", "f3")]);
    let matrix = PresenceMatrix::from_relation(&rows).unwrap();

    for row in 0..matrix.fingerprints().len() {
        let row_sum: i64 = (0..matrix.collections().len())
            .map(|col| matrix.cell(row, col))
            .sum();
        assert!(row_sum >= 1, "row {} has no presence", row);
    }
}

#[test]
fn test_duplicate_pairs_collapse() {
    let rows = relation(&[("A", "h1"), ("A", "h1"), ("A", "h1")]);
    let matrix = PresenceMatrix::from_relation(&rows).unwrap();
    assert_eq!(matrix.fingerprints().len(), 1);
    assert_eq!(matrix.cell(0, 0), 1);
}

#[test]
fn test_ordering_is_input_order_independent() {
    let forward = relation(&[("A", "h1"), ("A", "h2"), ("B", "h1")]);
    let shuffled = relation(&[("B", "h1"), ("A", "h2"), ("A", "h1")]);

    let m1 = PresenceMatrix::from_relation(&forward).unwrap();
    let m2 = PresenceMatrix::from_relation(&shuffled).unwrap();

    assert_eq!(m1.fingerprints(), m2.fingerprints());
    assert_eq!(m1.collections(), m2.collections());
    for row in 0..m1.fingerprints().len() {
        for col in 0..m1.collections().len() {
            assert_eq!(m1.cell(row, col), m2.cell(row, col));
        }
    }
}

#[test]
fn test_ordering_is_lexicographic() {
    let rows = relation(&[("zeta", "ff"), ("alpha", "0a"), ("mid", "7c")]);
    let matrix = PresenceMatrix::from_relation(&rows).unwrap();
    assert_eq!(matrix.collections(), ["alpha", "mid", "zeta"]);
    assert_eq!(matrix.fingerprints(), ["0a", "7c", "ff"]);
}
