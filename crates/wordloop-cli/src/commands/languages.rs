//! The `wordloop languages` command.

use anyhow::Result;
use comfy_table::Table;

use wordloop_core::model::Language;
use wordloop_providers::google::voice_name;

pub fn execute() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Language", "Voice", "Default package"]);

    for language in Language::ALL {
        table.add_row(vec![
            language.code().to_string(),
            language.label().to_string(),
            voice_name(language).to_string(),
            language.default_package(),
        ]);
    }

    println!("{table}");
    Ok(())
}
