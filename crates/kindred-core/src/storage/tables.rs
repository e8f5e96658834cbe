use crate::analysis::presence::PresenceMatrix;
use crate::analysis::similarity::SimilarityMatrix;
use crate::error::Error;
use crate::hasher::FingerprintSets;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes go to a temporary sibling first and are renamed into place, so a
/// failed stage never leaves a partial table that looks like a real result.
fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct RelationRow {
    #[serde(rename = "Folder")]
    folder: String,
    #[serde(rename = "Hash")]
    hash: String,
}

/// Write the (Folder, Hash) relation, one row per distinct pair, sorted by
/// collection then fingerprint. Returns the number of rows written.
pub fn write_relation(path: &Path, sets: &FingerprintSets) -> Result<usize, Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Folder", "Hash"])?;

    let mut rows = 0;
    for (collection, fingerprints) in sets {
        for fingerprint in fingerprints {
            wtr.write_record([collection.as_str(), fingerprint.as_str()])?;
            rows += 1;
        }
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    atomic_write(path, &bytes)?;
    debug!("Wrote {} relation rows to {}", rows, path.display());
    Ok(rows)
}

pub fn read_relation(path: &Path) -> Result<Vec<(String, String)>, Error> {
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in rdr.deserialize::<RelationRow>() {
        let row = record?;
        rows.push((row.folder, row.hash));
    }
    Ok(rows)
}

pub fn write_presence(path: &Path, matrix: &PresenceMatrix) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Hash".to_string()];
    header.extend(matrix.collections().iter().cloned());
    wtr.write_record(&header)?;

    for (row, fingerprint) in matrix.fingerprints().iter().enumerate() {
        let mut record = vec![fingerprint.clone()];
        for col in 0..matrix.collections().len() {
            record.push(matrix.cell(row, col).to_string());
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    atomic_write(path, &bytes)?;
    debug!(
        "Wrote {}x{} presence matrix to {}",
        matrix.fingerprints().len(),
        matrix.collections().len(),
        path.display()
    );
    Ok(())
}

/// Load a presence matrix from its CSV form. Structural problems (ragged
/// rows, unparseable cells) are `InvalidMatrix`; out-of-range cell values
/// are caught later by the similarity engine's validation pass.
pub fn read_presence(path: &Path) -> Result<PresenceMatrix, Error> {
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();
    let collections: Vec<String> = headers.iter().skip(1).map(|c| c.to_string()).collect();

    let mut fingerprints = Vec::new();
    let mut cells = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(Error::InvalidMatrix(format!(
                "{}: row {} has {} fields, expected {}",
                path.display(),
                fingerprints.len() + 1,
                record.len(),
                headers.len()
            )));
        }

        let fingerprint = record
            .get(0)
            .unwrap_or_default()
            .to_string();
        for (col, field) in record.iter().skip(1).enumerate() {
            let value: i64 = field.parse().map_err(|_| {
                Error::InvalidMatrix(format!(
                    "{}: cell ({}, {}) holds '{}', expected an integer",
                    path.display(),
                    fingerprint,
                    collections[col],
                    field
                ))
            })?;
            cells.push(value);
        }
        fingerprints.push(fingerprint);
    }

    Ok(PresenceMatrix::from_parts(fingerprints, collections, cells))
}

pub fn write_similarity(path: &Path, matrix: &SimilarityMatrix) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Folder".to_string()];
    header.extend(matrix.collections().iter().cloned());
    wtr.write_record(&header)?;

    for (row, collection) in matrix.collections().iter().enumerate() {
        let mut record = vec![collection.clone()];
        for col in 0..matrix.collections().len() {
            record.push(format!("{:.6}", matrix.cell(row, col)));
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    atomic_write(path, &bytes)?;
    debug!(
        "Wrote {0}x{0} similarity matrix to {1}",
        matrix.collections().len(),
        path.display()
    );
    Ok(())
}
