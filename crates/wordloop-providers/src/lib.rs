//! wordloop-providers: Audio backends and configuration.
//!
//! Implements the core collaborator traits: Google Cloud Text-to-Speech for
//! synthesis, a local command for the fallback voice and a command-line
//! player for clips. Also owns `wordloop.toml` loading.

pub mod config;
pub mod google;
pub mod mock;
pub mod player;
pub mod voice;

pub use config::{create_resolver, load_config, load_config_from, SynthesisConfig, WordloopConfig};
pub use google::GoogleTtsSynthesizer;
pub use player::{CommandPlayer, NullPlayer};
pub use voice::CommandVoice;
