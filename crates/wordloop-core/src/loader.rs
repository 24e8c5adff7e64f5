//! Word package loading.
//!
//! A package is a directory holding `index.csv` plus one image folder per
//! catalog id:
//!
//! ```text
//! mini-german-package-k3/
//!   index.csv          # header, then rows ending in `...,<id>,<word>`
//!   1042/cat_01.jpg
//!   1042/cat_02.png
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{CatalogEntry, Language};
use crate::traits::CatalogSource;

const INDEX_FILE: &str = "index.csv";
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// One usable row of `index.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// 1-based line number in the file.
    pub line: usize,
    pub catalog_id: String,
    pub word: String,
}

/// A row that was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// Result of parsing the index text.
#[derive(Debug, Clone, Default)]
pub struct ParsedIndex {
    pub rows: Vec<IndexRow>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse `index.csv` content. The first line is a header.
pub fn parse_index_str(content: &str) -> ParsedIndex {
    let mut parsed = ParsedIndex::default();

    for (i, raw) in content.lines().enumerate().skip(1) {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parts: Vec<&str> = trimmed.split(',').collect();
        if parts.len() < 2 {
            parsed.skipped.push(SkippedRow {
                line,
                reason: "fewer than two columns".to_string(),
            });
            continue;
        }
        let word = parts[parts.len() - 1].trim();
        let catalog_id = parts[parts.len() - 2].trim();
        if word.is_empty() || catalog_id.is_empty() {
            parsed.skipped.push(SkippedRow {
                line,
                reason: "empty word or id".to_string(),
            });
            continue;
        }
        parsed.rows.push(IndexRow {
            line,
            catalog_id: catalog_id.to_string(),
            word: word.to_string(),
        });
    }

    parsed
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Image file names in `dir`, sorted. A missing directory yields none.
fn list_images(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image(path))
        .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

/// Per-package summary for the `inspect` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageReport {
    pub package: String,
    pub language: Language,
    pub words: Vec<PackageWord>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageWord {
    pub word: String,
    pub catalog_id: String,
    pub image_count: usize,
}

/// Loads packages from a directory on disk.
#[derive(Debug, Clone)]
pub struct PackageSource {
    root: PathBuf,
    overrides: HashMap<Language, String>,
}

impl PackageSource {
    /// Packages live directly under `root`, named per
    /// [`Language::default_package`] unless overridden.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            overrides: HashMap::new(),
        }
    }

    /// Use `package` instead of the default directory for `language`.
    pub fn with_package(mut self, language: Language, package: impl Into<String>) -> Self {
        self.overrides.insert(language, package.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_name(&self, language: Language) -> String {
        self.overrides
            .get(&language)
            .cloned()
            .unwrap_or_else(|| language.default_package())
    }

    /// Absolute path of an image reference returned in a [`CatalogEntry`].
    pub fn resolve_image(&self, image: &str) -> PathBuf {
        self.root.join(image)
    }

    fn read_index(&self, package: &str) -> Result<ParsedIndex, SessionError> {
        let path = self.root.join(package).join(INDEX_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            SessionError::DataUnavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        Ok(parse_index_str(&content))
    }

    /// Parse the package and count images, without building a catalog.
    pub fn inspect(&self, language: Language) -> Result<PackageReport, SessionError> {
        let package = self.package_name(language);
        let parsed = self.read_index(&package)?;
        let dir = self.root.join(&package);

        let words = parsed
            .rows
            .into_iter()
            .map(|row| PackageWord {
                image_count: list_images(&dir.join(&row.catalog_id)).len(),
                word: row.word,
                catalog_id: row.catalog_id,
            })
            .collect();

        Ok(PackageReport {
            package,
            language,
            words,
            skipped: parsed.skipped,
        })
    }
}

impl CatalogSource for PackageSource {
    fn load(&self, language: Language) -> Result<Vec<CatalogEntry>, SessionError> {
        let package = self.package_name(language);
        let parsed = self.read_index(&package)?;
        let dir = self.root.join(&package);

        for skipped in &parsed.skipped {
            tracing::debug!(package = %package, line = skipped.line, reason = %skipped.reason, "index row skipped");
        }

        let mut entries = Vec::with_capacity(parsed.rows.len());
        for row in parsed.rows {
            let images = list_images(&dir.join(&row.catalog_id));
            if images.is_empty() {
                tracing::debug!(package = %package, id = %row.catalog_id, "no images, row skipped");
                continue;
            }
            let images = images
                .into_iter()
                .map(|file| format!("{package}/{}/{file}", row.catalog_id))
                .collect();
            entries.push(CatalogEntry::new(row.word, row.catalog_id, images));
        }

        if entries.is_empty() {
            return Err(SessionError::DataUnavailable(format!(
                "package {package} has no words with images"
            )));
        }
        tracing::info!(package = %package, entries = entries.len(), "package loaded");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_package(root: &Path, name: &str, index: &str, images: &[(&str, &str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(INDEX_FILE), index).unwrap();
        for (id, file) in images {
            let image_dir = dir.join(id);
            fs::create_dir_all(&image_dir).unwrap();
            fs::write(image_dir.join(file), b"img").unwrap();
        }
    }

    #[test]
    fn parse_uses_last_two_columns() {
        let parsed = parse_index_str("rank,id,word\n1,10,der Hund\n2,11,die Katze\n");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].catalog_id, "10");
        assert_eq!(parsed.rows[0].word, "der Hund");
        assert_eq!(parsed.rows[1].line, 3);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn parse_skips_blank_and_short_rows() {
        let parsed = parse_index_str("id,word\n\n10,Hund\nlonely\n  \n,Katze\n");
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].line, 4);
        assert_eq!(parsed.skipped[1].line, 6);
    }

    #[test]
    fn parse_header_only() {
        let parsed = parse_index_str("id,word\n");
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn load_collects_sorted_images() {
        let tmp = TempDir::new().unwrap();
        write_package(
            tmp.path(),
            "pkg",
            "id,word\n1,der Hund\n2,die Katze\n3,das Haus\n",
            &[
                ("1", "b.JPG"),
                ("1", "a.png"),
                ("1", "notes.txt"),
                ("2", "cat.jpeg"),
            ],
        );
        let source = PackageSource::new(tmp.path()).with_package(Language::German, "pkg");
        let entries = source.load(Language::German).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].raw_word, "der Hund");
        assert_eq!(entries[0].images, vec!["pkg/1/a.png", "pkg/1/b.JPG"]);
        assert_eq!(entries[1].images, vec!["pkg/2/cat.jpeg"]);
        assert!(source.resolve_image(&entries[1].images[0]).is_file());
    }

    #[test]
    fn load_without_images_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "pkg", "id,word\n1,Hund\n", &[]);
        let source = PackageSource::new(tmp.path()).with_package(Language::German, "pkg");
        let err = source.load(Language::German).unwrap_err();
        assert!(matches!(err, SessionError::DataUnavailable(_)));
    }

    #[test]
    fn missing_package_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let source = PackageSource::new(tmp.path());
        let err = source.load(Language::Spanish).unwrap_err();
        assert!(err.to_string().contains("mini-spanish-package-k3"));
    }

    #[test]
    fn default_package_names() {
        let source = PackageSource::new("/data").with_package(Language::Japanese, "custom");
        assert_eq!(source.package_name(Language::German), "mini-german-package-k3");
        assert_eq!(source.package_name(Language::Japanese), "custom");
    }

    #[test]
    fn inspect_reports_counts_and_skips() {
        let tmp = TempDir::new().unwrap();
        write_package(
            tmp.path(),
            "mini-english-package-k3",
            "id,word\n1,dog\nbroken\n2,cat\n",
            &[("1", "a.png"), ("1", "b.png")],
        );
        let report = PackageSource::new(tmp.path())
            .inspect(Language::English)
            .unwrap();

        assert_eq!(report.package, "mini-english-package-k3");
        assert_eq!(report.words.len(), 2);
        assert_eq!(report.words[0].image_count, 2);
        assert_eq!(report.words[1].image_count, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 3);
    }
}
