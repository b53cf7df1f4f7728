use crate::model::ThemeSet;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Marker file that turns a directory into an icon theme.
pub const THEME_INDEX_FILE: &str = "index.theme";

/// A root that contributed nothing to a scan because it could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRoot {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a scan together with the roots that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub themes: ThemeSet,
    pub skipped: Vec<SkippedRoot>,
}

/// Discovers icon themes under a fixed, ordered list of root directories.
///
/// Each immediate subdirectory of a root that holds an `index.theme` file is
/// a theme, named after the subdirectory. Roots that are missing, unreadable
/// or not directories are skipped without error.
#[derive(Debug, Clone)]
pub struct ThemeScanner {
    roots: Vec<PathBuf>,
}

impl ThemeScanner {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn scan(&self) -> ThemeSet {
        self.scan_with_report().themes
    }

    pub fn scan_with_report(&self) -> ScanReport {
        let mut names = HashSet::new();
        let mut skipped = Vec::new();

        for root in &self.roots {
            if let Err(e) = collect_themes(root, &mut names) {
                log::debug!("Skipping icon root '{}': {}", root.display(), e);
                skipped.push(SkippedRoot {
                    path: root.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let themes = ThemeSet::from_names(names);
        log::debug!(
            "Discovered {} icon themes across {} roots ({} skipped)",
            themes.len(),
            self.roots.len(),
            skipped.len()
        );

        ScanReport { themes, skipped }
    }
}

/// Scan `roots` in order and return the discovered theme set.
pub fn scan<P: AsRef<Path>>(roots: &[P]) -> ThemeSet {
    ThemeScanner::new(roots.iter().map(|root| root.as_ref().to_path_buf())).scan()
}

fn collect_themes(root: &Path, names: &mut HashSet<String>) -> io::Result<()> {
    for entry in fs::read_dir(root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Unreadable entry under '{}': {}", root.display(), e);
                continue;
            }
        };

        // Follows symlinks, so linked theme directories count.
        let path = entry.path();
        if !path.is_dir() || !path.join(THEME_INDEX_FILE).is_file() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => {
                names.insert(name);
            }
            Err(raw) => {
                log::debug!("Ignoring theme directory with non UTF-8 name: {raw:?}");
            }
        }
    }

    Ok(())
}
