use crate::analysis::{self, PresenceMatrix};
use crate::config::{AppConfig, ExclusionPolicy};
use crate::error::Error;
use crate::hasher::{self, DecideBinary};
use crate::progress::ProgressReporter;
use crate::staging::{self, ConvertStats, StageStats};
use crate::storage::{tables, WorkingLayout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Orchestrates the batch stages over one working directory.
///
/// Stages are independent: each loads its input from the previous stage's
/// persisted artifact and writes its own, never sharing in-memory state, so
/// a run can resume from any stage.
pub struct Pipeline {
    config: AppConfig,
    layout: WorkingLayout,
    policy: ExclusionPolicy,
}

#[derive(Debug)]
pub struct HashResult {
    pub collections: usize,
    pub pairs: usize,
    pub table: PathBuf,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct PresenceResult {
    pub fingerprints: usize,
    pub collections: usize,
    pub table: PathBuf,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct SimilarityResult {
    pub collections: usize,
    pub table: PathBuf,
    pub duration: Duration,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        let layout = WorkingLayout::new(&config.working_dir);
        let policy = ExclusionPolicy::with_defaults()
            .with_files(&config.exclude_files)
            .with_folders(&config.exclude_folders)
            .with_globs(&config.ignore_patterns);
        Pipeline {
            config,
            layout,
            policy,
        }
    }

    pub fn layout(&self) -> &WorkingLayout {
        &self.layout
    }

    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    /// Stage 0: copy the original media into the protected working area.
    pub fn stage_corpus(
        &self,
        source: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<StageStats, Error> {
        reporter.on_stage_start("stage");
        let start = Instant::now();
        let stats = staging::stage_corpus(source, &self.layout.corpus_dir(), reporter)?;
        reporter.on_stage_complete("stage", stats.copied, start.elapsed().as_secs_f64());
        Ok(stats)
    }

    /// Stage 1: normalize corpus documents to ODT via LibreOffice.
    pub fn convert_corpus(&self, reporter: &dyn ProgressReporter) -> Result<ConvertStats, Error> {
        reporter.on_stage_start("convert");
        let start = Instant::now();
        let stats = staging::convert_corpus(
            &self.layout.corpus_dir(),
            &self.layout.extract_dir(),
            Path::new(&self.config.soffice_path),
            &self.policy,
            reporter,
        )?;
        reporter.on_stage_complete("convert", stats.converted, start.elapsed().as_secs_f64());
        Ok(stats)
    }

    /// Stage 2: fingerprint the extracted tree and persist the relation.
    pub fn extract_hashes(
        &self,
        decider: &dyn DecideBinary,
        reporter: &dyn ProgressReporter,
    ) -> Result<HashResult, Error> {
        reporter.on_stage_start("hash");
        let start = Instant::now();

        info!("Fingerprinting files under {}...", self.layout.extract_dir().display());
        let sets =
            hasher::extract_fingerprints(&self.layout.extract_dir(), &self.policy, decider, reporter)?;

        let table = self.layout.relation_table();
        let pairs = tables::write_relation(&table, &sets)?;

        let duration = start.elapsed();
        debug!(
            "Hash stage completed in {:.2}s — {} collections, {} pairs",
            duration.as_secs_f64(),
            sets.len(),
            pairs,
        );
        reporter.on_stage_complete("hash", pairs, duration.as_secs_f64());

        Ok(HashResult {
            collections: sets.len(),
            pairs,
            table,
            duration,
        })
    }

    /// Stage 3: build the presence matrix from the persisted relation.
    pub fn build_presence(&self, reporter: &dyn ProgressReporter) -> Result<PresenceResult, Error> {
        reporter.on_stage_start("binary");
        let start = Instant::now();

        let rows = tables::read_relation(&self.layout.relation_table())?;
        let matrix = PresenceMatrix::from_relation(&rows)?;

        let table = self.layout.presence_table();
        tables::write_presence(&table, &matrix)?;

        let duration = start.elapsed();
        info!(
            "Presence matrix built: {} fingerprints x {} collections",
            matrix.fingerprints().len(),
            matrix.collections().len(),
        );
        reporter.on_stage_complete("binary", matrix.fingerprints().len(), duration.as_secs_f64());

        Ok(PresenceResult {
            fingerprints: matrix.fingerprints().len(),
            collections: matrix.collections().len(),
            table,
            duration,
        })
    }

    /// Stage 4: compute the similarity matrix from the persisted presence
    /// matrix.
    pub fn compute_similarity(
        &self,
        reporter: &dyn ProgressReporter,
    ) -> Result<SimilarityResult, Error> {
        reporter.on_stage_start("similarity");
        let start = Instant::now();

        let matrix = tables::read_presence(&self.layout.presence_table())?;
        let similarity = analysis::compute_similarity(&matrix)?;

        let table = self.layout.similarity_table();
        tables::write_similarity(&table, &similarity)?;

        let duration = start.elapsed();
        reporter.on_stage_complete(
            "similarity",
            similarity.collections().len(),
            duration.as_secs_f64(),
        );

        Ok(SimilarityResult {
            collections: similarity.collections().len(),
            table,
            duration,
        })
    }
}
