//! `wordloop.toml` configuration and backend factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wordloop_core::audio::AudioResolver;
use wordloop_core::model::Language;
use wordloop_core::scheduler::DEFAULT_GROUP_SIZE;
use wordloop_core::selector::DEFAULT_OPTION_COUNT;
use wordloop_core::session::SessionSettings;
use wordloop_core::traits::SpeechSynthesizer;

use crate::google::{
    GoogleTtsSynthesizer, DEFAULT_BASE_URL, DEFAULT_SPEAKING_RATE, DEFAULT_VOLUME_GAIN_DB,
};
use crate::player::{CommandPlayer, NullPlayer};
use crate::voice::CommandVoice;

/// Environment variable that overrides the synthesis API key.
pub const API_KEY_ENV: &str = "WORDLOOP_GOOGLE_TTS_KEY";

/// Remote synthesis backend.
///
/// Note: Custom Debug impl masks the API key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SynthesisConfig {
    Google {
        #[serde(default = "default_api_key")]
        api_key: String,
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_speaking_rate")]
        speaking_rate: f64,
        #[serde(default = "default_volume_gain_db")]
        volume_gain_db: f64,
    },
    None,
}

impl std::fmt::Debug for SynthesisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisConfig::Google {
                api_key: _,
                base_url,
                speaking_rate,
                volume_gain_db,
            } => f
                .debug_struct("Google")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("speaking_rate", speaking_rate)
                .field("volume_gain_db", volume_gain_db)
                .finish(),
            SynthesisConfig::None => f.write_str("None"),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig::Google {
            api_key: default_api_key(),
            base_url: default_base_url(),
            speaking_rate: default_speaking_rate(),
            volume_gain_db: default_volume_gain_db(),
        }
    }
}

fn default_api_key() -> String {
    "${GOOGLE_TTS_API_KEY}".to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_speaking_rate() -> f64 {
    DEFAULT_SPEAKING_RATE
}
fn default_volume_gain_db() -> f64 {
    DEFAULT_VOLUME_GAIN_DB
}

/// An external program plus its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_fallback_voice() -> CommandConfig {
    CommandConfig {
        program: "espeak-ng".to_string(),
        args: vec!["-v".to_string(), "{lang}".to_string()],
    }
}

fn default_player() -> CommandConfig {
    CommandConfig {
        program: "mpg123".to_string(),
        args: vec!["-q".to_string()],
    }
}

/// Top-level wordloop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordloopConfig {
    /// Directory holding the word packages.
    #[serde(default = "default_packages_dir")]
    pub packages_dir: PathBuf,
    #[serde(default = "default_language")]
    pub default_language: Language,
    /// Words per scheduling window.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    /// Choices per question.
    #[serde(default = "default_option_count")]
    pub option_count: usize,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default = "default_fallback_voice")]
    pub fallback_voice: CommandConfig,
    #[serde(default = "default_player")]
    pub player: CommandConfig,
}

fn default_packages_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_language() -> Language {
    Language::German
}
fn default_group_size() -> usize {
    DEFAULT_GROUP_SIZE
}
fn default_option_count() -> usize {
    DEFAULT_OPTION_COUNT
}

impl Default for WordloopConfig {
    fn default() -> Self {
        Self {
            packages_dir: default_packages_dir(),
            default_language: default_language(),
            group_size: default_group_size(),
            option_count: default_option_count(),
            synthesis: SynthesisConfig::default(),
            fallback_voice: default_fallback_voice(),
            player: default_player(),
        }
    }
}

impl WordloopConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            group_size: self.group_size,
            option_count: self.option_count,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_synthesis_config(config: &SynthesisConfig) -> SynthesisConfig {
    match config {
        SynthesisConfig::Google {
            api_key,
            base_url,
            speaking_rate,
            volume_gain_db,
        } => SynthesisConfig::Google {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_env_vars(base_url),
            speaking_rate: *speaking_rate,
            volume_gain_db: *volume_gain_db,
        },
        SynthesisConfig::None => SynthesisConfig::None,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `wordloop.toml` in the current directory
/// 2. `~/.config/wordloop/config.toml`
///
/// `WORDLOOP_GOOGLE_TTS_KEY` overrides the synthesis API key.
pub fn load_config() -> Result<WordloopConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<WordloopConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("wordloop.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loading config");
            toml::from_str::<WordloopConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => WordloopConfig::default(),
    };

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if let SynthesisConfig::Google { api_key, .. } = &mut config.synthesis {
            *api_key = key;
        }
    }
    config.synthesis = resolve_synthesis_config(&config.synthesis);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("wordloop"))
}

/// Build the synthesizer, or `None` when synthesis is off or has no key.
pub fn create_synthesizer(config: &SynthesisConfig) -> Result<Option<Arc<dyn SpeechSynthesizer>>> {
    match config {
        SynthesisConfig::Google {
            api_key,
            base_url,
            speaking_rate,
            volume_gain_db,
        } => {
            if api_key.trim().is_empty() {
                tracing::info!("no Google TTS API key configured, using the local voice");
                return Ok(None);
            }
            let synth: Arc<dyn SpeechSynthesizer> = Arc::new(
                GoogleTtsSynthesizer::new(api_key, Some(base_url.clone()))
                    .context("failed to create Google TTS client")?
                    .with_audio_config(*speaking_rate, *volume_gain_db),
            );
            Ok(Some(synth))
        }
        SynthesisConfig::None => Ok(None),
    }
}

/// Assemble the audio chain. `silent` discards all audio.
pub fn create_resolver(config: &WordloopConfig, silent: bool) -> Result<AudioResolver> {
    if silent {
        return Ok(AudioResolver::new(Arc::new(NullPlayer)));
    }

    let player = CommandPlayer::new(config.player.program.clone(), config.player.args.clone());
    let voice = CommandVoice::new(
        config.fallback_voice.program.clone(),
        config.fallback_voice.args.clone(),
    );
    let mut resolver = AudioResolver::new(Arc::new(player)).with_fallback(Arc::new(voice));
    if let Some(synth) = create_synthesizer(&config.synthesis)? {
        resolver = resolver.with_synthesizer(synth);
    }
    Ok(resolver)
}
