//! Clip playback.

use std::io::Write;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use wordloop_core::error::PlaybackError;
use wordloop_core::traits::{AudioClip, AudioPlayer};

/// Plays clips by writing them to a temporary file and running a player
/// program on it (default `mpg123 -q`).
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn mpg123() -> Self {
        Self::new("mpg123", vec!["-q".into()])
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::mpg123()
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, clip: &AudioClip) -> Result<(), PlaybackError> {
        let mut file = tempfile::Builder::new()
            .prefix("wordloop-")
            .suffix(".mp3")
            .tempfile()
            .map_err(|e| PlaybackError::Failed(format!("failed to create temp file: {e}")))?;
        file.write_all(&clip.bytes)
            .and_then(|_| file.flush())
            .map_err(|e| PlaybackError::Failed(format!("failed to write clip: {e}")))?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PlaybackError::Unavailable(format!("{} not found", self.program))
                } else {
                    PlaybackError::Failed(format!("failed to run {}: {e}", self.program))
                }
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PlaybackError::Failed(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}

/// Discards every clip. Used for `--silent` runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayer;

#[async_trait]
impl AudioPlayer for NullPlayer {
    async fn play(&self, _clip: &AudioClip) -> Result<(), PlaybackError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_player_always_succeeds() {
        assert!(NullPlayer.play(&AudioClip::mp3(vec![1, 2])).await.is_ok());
    }

    #[tokio::test]
    async fn missing_player_is_unavailable() {
        let player = CommandPlayer::new("wordloop-no-such-player", vec![]);
        let err = player.play(&AudioClip::mp3(vec![0])).await.unwrap_err();
        assert!(matches!(err, PlaybackError::Unavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn player_receives_clip_file() {
        // `test -s FILE` succeeds only for a non-empty file.
        let player = CommandPlayer::new("test", vec!["-s".into()]);
        assert!(player.play(&AudioClip::mp3(vec![9; 16])).await.is_ok());
        assert!(player.play(&AudioClip::mp3(vec![])).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dropped_playback_kills_player_process() {
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("played");
        let script = format!("sleep 1; touch '{}'", marker.display());
        let player = CommandPlayer::new("sh", vec!["-c".into(), script, "sh".into()]);

        let clip = AudioClip::mp3(vec![1]);
        let result =
            tokio::time::timeout(Duration::from_millis(200), player.play(&clip)).await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
