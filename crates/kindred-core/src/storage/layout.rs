use std::path::{Path, PathBuf};

/// Numbered stage directories under one working directory.
///
/// Every stage reads its input from the previous stage's artifact and writes
/// its own, so a run can resume from any stage without redoing earlier ones.
#[derive(Debug, Clone)]
pub struct WorkingLayout {
    root: PathBuf,
}

impl WorkingLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        WorkingLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Protected copy of the original media.
    pub fn corpus_dir(&self) -> PathBuf {
        self.root.join("0-corpus")
    }

    /// Normalized ODT tree mirroring the corpus structure.
    pub fn extract_dir(&self) -> PathBuf {
        self.root.join("1-extract")
    }

    /// Relation table: one (Folder, Hash) row per distinct pair.
    pub fn relation_table(&self) -> PathBuf {
        self.root.join("2-hash").join("hashes.csv")
    }

    /// Presence matrix: fingerprints × collections, cells 0/1.
    pub fn presence_table(&self) -> PathBuf {
        self.root.join("3-binary").join("binary_matrix.csv")
    }

    /// Similarity matrix: collections × collections, cells in [0,1].
    pub fn similarity_table(&self) -> PathBuf {
        self.root.join("4-similarity").join("similarity_matrix.csv")
    }
}
