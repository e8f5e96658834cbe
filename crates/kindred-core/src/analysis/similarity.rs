use crate::analysis::presence::PresenceMatrix;
use crate::error::Error;
use tracing::{debug, info};

/// Symmetric collection × collection similarity scores in [0,1],
/// diagonal fixed at 1.0. Derived entirely from a presence matrix.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    collections: Vec<String>,
    cells: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    pub fn cell(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.collections.len() + col]
    }
}

/// Compute pairwise collection similarity from the presence matrix.
///
/// 1. Validate: every cell must be 0 or 1, matrix must be non-empty
/// 2. n_max = max column sum (fingerprint count of the busiest collection)
/// 3. For each unordered pair (i, j): d = Hamming distance between the two
///    presence columns, similarity = 1 − d / n_max, clamped into [0,1]
///
/// The normalizer is global (busiest collection), not a per-pair union size:
/// a near-empty collection is never inflated to high similarity against a
/// populous one just because few absolute positions differ.
pub fn compute_similarity(matrix: &PresenceMatrix) -> Result<SimilarityMatrix, Error> {
    if matrix.is_empty() {
        return Err(Error::InvalidMatrix(
            "matrix has no fingerprint rows or no collection columns".to_string(),
        ));
    }

    let rows = matrix.fingerprints().len();
    let cols = matrix.collections().len();

    for row in 0..rows {
        for col in 0..cols {
            let value = matrix.cell(row, col);
            if value != 0 && value != 1 {
                return Err(Error::InvalidMatrix(format!(
                    "cell ({}, {}) holds {}, expected 0 or 1",
                    matrix.fingerprints()[row],
                    matrix.collections()[col],
                    value
                )));
            }
        }
    }

    let n_max = (0..cols)
        .map(|col| matrix.column_sum(col))
        .max()
        .unwrap_or(0);
    if n_max == 0 {
        return Err(Error::DegenerateInput(
            "no collection has any fingerprint (n_max = 0), cannot normalize".to_string(),
        ));
    }
    debug!("Normalizing against busiest collection: n_max = {}", n_max);

    // Diagonal is fixed at 1.0, not computed from the formula.
    let mut cells = vec![1.0f64; cols * cols];
    for i in 0..cols {
        for j in (i + 1)..cols {
            let differing = (0..rows)
                .filter(|&row| matrix.cell(row, i) != matrix.cell(row, j))
                .count();
            let similarity =
                (1.0 - differing as f64 / n_max as f64).clamp(0.0, 1.0);
            cells[i * cols + j] = similarity;
            cells[j * cols + i] = similarity;
        }
    }

    info!(
        "Computed {0}x{0} similarity matrix over {1} fingerprints",
        cols, rows
    );

    Ok(SimilarityMatrix {
        collections: matrix.collections().to_vec(),
        cells,
    })
}
