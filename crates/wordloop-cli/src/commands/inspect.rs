//! The `wordloop inspect` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use wordloop_core::model::{normalize_word, Language};

use super::package_source;

pub fn execute(package: PathBuf, language: Language) -> Result<()> {
    if !package.is_dir() {
        anyhow::bail!("not a directory: {}", package.display());
    }
    let source = package_source(&package, Some(&package), language);
    let report = source
        .inspect(language)
        .with_context(|| format!("failed to inspect {}", package.display()))?;

    let mut table = Table::new();
    table.set_header(vec!["Word", "Key", "ID", "Images", "Status"]);

    let mut first_seen: HashMap<String, String> = HashMap::new();
    let mut usable = 0;
    for word in &report.words {
        let key = normalize_word(&word.word, language);
        let status = if word.image_count == 0 {
            "no images".to_string()
        } else if let Some(first) = first_seen.get(&key) {
            format!("duplicate of {first}")
        } else {
            first_seen.insert(key.clone(), word.word.clone());
            usable += 1;
            "ok".to_string()
        };
        table.add_row(vec![
            Cell::new(&word.word),
            Cell::new(&key),
            Cell::new(&word.catalog_id),
            Cell::new(word.image_count),
            Cell::new(status),
        ]);
    }

    println!("Package: {} ({})", report.package, language.label());
    println!("{table}");

    for skipped in &report.skipped {
        println!("  line {}: {}", skipped.line, skipped.reason);
    }
    println!(
        "{usable} usable words, {} rows listed, {} rows skipped",
        report.words.len(),
        report.skipped.len()
    );

    Ok(())
}
