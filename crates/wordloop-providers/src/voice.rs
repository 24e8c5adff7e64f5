//! Local fallback voice driven by an external command.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use wordloop_core::error::FallbackError;
use wordloop_core::traits::{FallbackVoice, SpeechRequest};

/// Placeholder replaced by the short language code (e.g. `de`).
pub const LANG_PLACEHOLDER: &str = "{lang}";
/// Placeholder replaced by the BCP-47 tag (e.g. `de-DE`).
pub const BCP47_PLACEHOLDER: &str = "{bcp47}";

/// Speaks text through a local TTS program such as `espeak-ng`.
///
/// The configured arguments are passed first, with `{lang}` and `{bcp47}`
/// substituted, followed by the text itself.
#[derive(Debug, Clone)]
pub struct CommandVoice {
    program: String,
    args: Vec<String>,
}

impl CommandVoice {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn espeak() -> Self {
        Self::new("espeak-ng", vec!["-v".into(), LANG_PLACEHOLDER.into()])
    }

    fn command_args(&self, request: &SpeechRequest) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                a.replace(LANG_PLACEHOLDER, request.language.code())
                    .replace(BCP47_PLACEHOLDER, request.language.bcp47())
            })
            .collect();
        args.push(request.text.clone());
        args
    }
}

impl Default for CommandVoice {
    fn default() -> Self {
        Self::espeak()
    }
}

#[async_trait]
impl FallbackVoice for CommandVoice {
    fn name(&self) -> &str {
        &self.program
    }

    async fn speak(&self, request: &SpeechRequest) -> Result<(), FallbackError> {
        let status = Command::new(&self.program)
            .args(self.command_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FallbackError::Unavailable(format!("{} not found", self.program))
                } else {
                    FallbackError::Failed(format!("failed to run {}: {e}", self.program))
                }
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(FallbackError::Failed(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}
