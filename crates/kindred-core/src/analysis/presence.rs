use crate::error::Error;
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Binary indicator matrix: which fingerprints occur in which collections.
///
/// Rows are the distinct fingerprints, columns the distinct collections,
/// both lexicographically sorted so the persisted form is stable and
/// diffable across runs on the same relation. Cells are kept as `i64`
/// because a matrix re-loaded from disk may hold out-of-range values; the
/// similarity engine validates before computing.
#[derive(Debug, Clone)]
pub struct PresenceMatrix {
    fingerprints: Vec<String>,
    collections: Vec<String>,
    cells: Vec<i64>,
}

impl PresenceMatrix {
    /// Build from the flat (collection, fingerprint) relation.
    ///
    /// O(R) in relation rows after the two index maps are built. Fails with
    /// `EmptyInput` when no fingerprint or no collection is present — there
    /// is no matrix to build, which is distinct from an all-zero matrix
    /// (impossible by construction here).
    pub fn from_relation(rows: &[(String, String)]) -> Result<Self, Error> {
        let collections: Vec<String> = rows
            .iter()
            .map(|(collection, _)| collection.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let fingerprints: Vec<String> = rows
            .iter()
            .map(|(_, fingerprint)| fingerprint.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if fingerprints.is_empty() || collections.is_empty() {
            return Err(Error::EmptyInput(
                "relation holds no (collection, fingerprint) pairs".to_string(),
            ));
        }

        let fingerprint_index: AHashMap<&str, usize> = fingerprints
            .iter()
            .enumerate()
            .map(|(i, f)| (f.as_str(), i))
            .collect();
        let collection_index: AHashMap<&str, usize> = collections
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut cells = vec![0i64; fingerprints.len() * collections.len()];
        for (collection, fingerprint) in rows {
            let row = fingerprint_index[fingerprint.as_str()];
            let col = collection_index[collection.as_str()];
            cells[row * collections.len() + col] = 1;
        }

        Ok(PresenceMatrix {
            fingerprints,
            collections,
            cells,
        })
    }

    /// Assemble from already-validated parts (the CSV loader and tests).
    /// `cells` is row-major and must hold exactly rows × columns values.
    pub fn from_parts(
        fingerprints: Vec<String>,
        collections: Vec<String>,
        cells: Vec<i64>,
    ) -> Self {
        debug_assert_eq!(cells.len(), fingerprints.len() * collections.len());
        PresenceMatrix {
            fingerprints,
            collections,
            cells,
        }
    }

    pub fn fingerprints(&self) -> &[String] {
        &self.fingerprints
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    pub fn cell(&self, row: usize, col: usize) -> i64 {
        self.cells[row * self.collections.len() + col]
    }

    /// Number of fingerprints present in one collection.
    pub fn column_sum(&self, col: usize) -> i64 {
        (0..self.fingerprints.len()).map(|row| self.cell(row, col)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty() || self.collections.is_empty()
    }
}
