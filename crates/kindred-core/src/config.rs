use config::{Config, ConfigError, File as ConfigFile};
use glob::Pattern;
use serde::Deserialize;
use std::path::Path;
use tracing::error;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_working_dir")]
    pub working_dir: String,
    #[serde(default = "default_soffice_path")]
    pub soffice_path: String,
    #[serde(default)]
    pub exclude_files: Vec<String>,
    #[serde(default)]
    pub exclude_folders: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_working_dir() -> String {
    "./workdir".to_string()
}

fn default_soffice_path() -> String {
    "soffice".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            working_dir: default_working_dir(),
            soffice_path: default_soffice_path(),
            exclude_files: Vec::new(),
            exclude_folders: Vec::new(),
            ignore_patterns: Vec::new(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// File/folder denylist applied during conversion and fingerprinting.
///
/// Immutable once built: the `with_*` methods consume the policy and return
/// an extended copy, so a policy handed to a stage can never change under it.
/// Names are matched case-insensitively against the final path component.
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    file_names: Vec<String>,
    file_fragments: Vec<String>,
    folder_fragments: Vec<String>,
    globs: Vec<Pattern>,
}

/// Filesystem artifacts of legacy media that carry no document content:
/// FAT tables, boot records, resource forks, Finder/desktop databases.
const DEFAULT_FILE_NAMES: &[&str] = &[
    "[unallocated space]",
    "fat1",
    "fat2",
    "vbr",
    "resource.frk",
    "desktop",
    "desktop printersdb",
    "finder.dat",
    "openfolderlist",
    "deletelog",
    "desktop db",
    "desktop df",
    ".ds_store",
    "desktopprinters db",
    "openfolderlistdf",
    "indexervolumeguid",
    "extents",
    "catalog",
    "backup mdb",
    "allocation",
    "mdb",
    "desktop.ini",
    "system volume information",
];

const DEFAULT_FILE_FRAGMENTS: &[&str] = &["delete-log", "desktopprinters db", "openfolderlistdf"];

const DEFAULT_FOLDER_FRAGMENTS: &[&str] = &[
    "system volume information",
    "__macosx",
    "[unallocated space]",
    "thevolumesettingsfolder",
    "resource.frk",
    "trash",
];

impl ExclusionPolicy {
    /// Policy seeded with the standard legacy-filesystem denylists.
    pub fn with_defaults() -> Self {
        ExclusionPolicy {
            file_names: DEFAULT_FILE_NAMES.iter().map(|s| s.to_string()).collect(),
            file_fragments: DEFAULT_FILE_FRAGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            folder_fragments: DEFAULT_FOLDER_FRAGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            globs: Vec::new(),
        }
    }

    /// Policy with no name denylists. The hidden-file and junk-suffix rules
    /// still apply; they are inherent, not configurable.
    pub fn empty() -> Self {
        ExclusionPolicy {
            file_names: Vec::new(),
            file_fragments: Vec::new(),
            folder_fragments: Vec::new(),
            globs: Vec::new(),
        }
    }

    pub fn with_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.file_names
            .extend(names.into_iter().map(|n| n.as_ref().trim().to_lowercase()));
        self
    }

    pub fn with_folders<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.folder_fragments
            .extend(names.into_iter().map(|n| n.as_ref().trim().to_lowercase()));
        self
    }

    /// Invalid glob patterns are logged and dropped rather than failing the run.
    pub fn with_globs<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            match Pattern::new(pattern.as_ref()) {
                Ok(p) => self.globs.push(p),
                Err(e) => error!("Invalid glob pattern '{}': {}", pattern.as_ref(), e),
            }
        }
        self
    }

    pub fn excludes_folder(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.folder_fragments.iter().any(|f| name.contains(f))
    }

    pub fn excludes_file(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        if self.file_names.iter().any(|n| *n == name) {
            return true;
        }
        if self.file_fragments.iter().any(|f| name.contains(f)) {
            return true;
        }
        name.starts_with('.')
            || name.ends_with(".tmp")
            || name.ends_with('~')
            || name.ends_with(".copy0")
    }

    pub fn excludes_path(&self, path: &Path) -> bool {
        self.globs.iter().any(|p| p.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_excludes_legacy_artifacts() {
        let policy = ExclusionPolicy::with_defaults();
        assert!(policy.excludes_file("FAT1"));
        assert!(policy.excludes_file(".DS_Store"));
        assert!(policy.excludes_file("Desktop DB"));
        assert!(policy.excludes_file("notes.tmp"));
        assert!(policy.excludes_file("draft.doc~"));
        assert!(policy.excludes_file("letter.copy0"));
        assert!(!policy.excludes_file("letter.odt"));

        assert!(policy.excludes_folder("System Volume Information"));
        assert!(policy.excludes_folder("__MACOSX"));
        assert!(policy.excludes_folder("RESOURCE.FRK"));
        assert!(!policy.excludes_folder("disk-042"));
    }

    #[test]
    fn test_extension_returns_new_policy() {
        let base = ExclusionPolicy::empty();
        assert!(!base.excludes_file("thumbs.db"));

        let extended = base.clone().with_files(["Thumbs.db"]);
        assert!(extended.excludes_file("thumbs.db"));
        assert!(extended.excludes_file("THUMBS.DB"));
        assert!(!base.excludes_file("thumbs.db"));
    }

    #[test]
    fn test_glob_patterns_match_paths() {
        let policy = ExclusionPolicy::empty().with_globs(["**/scratch/**"]);
        assert!(policy.excludes_path(Path::new("/data/scratch/file.odt")));
        assert!(!policy.excludes_path(Path::new("/data/disk-1/file.odt")));
    }

    #[test]
    fn test_invalid_glob_is_dropped() {
        let policy = ExclusionPolicy::empty().with_globs(["[invalid"]);
        assert!(!policy.excludes_path(Path::new("anything")));
    }
}
