//! The `wordloop init` command.

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("wordloop.toml");
    if path.exists() {
        println!("wordloop.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG).context("failed to write wordloop.toml")?;
        println!("Created wordloop.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point packages_dir at the directory holding your word packages");
    println!("  2. Export GOOGLE_TTS_API_KEY, or set [synthesis] type = \"none\"");
    println!("  3. Run: wordloop play --language de");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# wordloop configuration

packages_dir = "."
default_language = "de"
group_size = 5
option_count = 3

[synthesis]
type = "google"
api_key = "${GOOGLE_TTS_API_KEY}"
base_url = "https://texttospeech.googleapis.com"
speaking_rate = 0.9
volume_gain_db = 10.0

[fallback_voice]
program = "espeak-ng"
args = ["-v", "{lang}"]

[player]
program = "mpg123"
args = ["-q"]
"#;
