//! Google Cloud Text-to-Speech synthesizer.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use wordloop_core::error::SynthesisError;
use wordloop_core::model::Language;
use wordloop_core::traits::{AudioClip, SpeechRequest, SpeechSynthesizer};

pub const DEFAULT_BASE_URL: &str = "https://texttospeech.googleapis.com";
pub const DEFAULT_SPEAKING_RATE: f64 = 0.9;
pub const DEFAULT_VOLUME_GAIN_DB: f64 = 10.0;

/// Wavenet voice used for each language.
pub fn voice_name(language: Language) -> &'static str {
    match language {
        Language::German => "de-DE-Wavenet-G",
        Language::Japanese => "ja-JP-Wavenet-A",
        Language::Spanish => "es-ES-Wavenet-F",
        Language::English => "en-US-Wavenet-F",
    }
}

pub struct GoogleTtsSynthesizer {
    api_key: String,
    base_url: String,
    speaking_rate: f64,
    volume_gain_db: f64,
    client: reqwest::Client,
}

impl GoogleTtsSynthesizer {
    /// The client has no request timeout; slow calls end only through the
    /// audio job's abort handle.
    pub fn new(api_key: &str, base_url: Option<String>) -> Result<Self, SynthesisError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SynthesisError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            speaking_rate: DEFAULT_SPEAKING_RATE,
            volume_gain_db: DEFAULT_VOLUME_GAIN_DB,
            client,
        })
    }

    pub fn with_audio_config(mut self, speaking_rate: f64, volume_gain_db: f64) -> Self {
        self.speaking_rate = speaking_rate;
        self.volume_gain_db = volume_gain_db;
        self
    }
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f64,
    volume_gain_db: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Map a service error message to an error kind.
fn api_error(status: u16, message: String) -> SynthesisError {
    if message.contains("blocked") {
        tracing::warn!("Google TTS API not enabled or blocked, using fallback voice");
        SynthesisError::Unavailable(message)
    } else {
        SynthesisError::Api { status, message }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    fn name(&self) -> &str {
        "google"
    }

    #[instrument(skip(self, request), fields(language = %request.language))]
    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioClip, SynthesisError> {
        let body = SynthesizeRequest {
            input: SynthesisInput {
                text: &request.text,
            },
            voice: VoiceSelection {
                language_code: request.language.bcp47(),
                name: voice_name(request.language),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: self.speaking_rate,
                volume_gain_db: self.volume_gain_db,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/text:synthesize?key={}",
                self.base_url, self.api_key
            ))
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;
        let parsed = serde_json::from_str::<SynthesizeResponse>(&text);

        if status >= 400 {
            let message = match parsed {
                Ok(SynthesizeResponse {
                    error: Some(err), ..
                }) => err.message,
                _ => text,
            };
            return Err(api_error(status, message));
        }

        let parsed = parsed
            .map_err(|e| SynthesisError::Malformed(format!("failed to parse response: {e}")))?;

        match (parsed.audio_content, parsed.error) {
            (Some(encoded), _) => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| SynthesisError::Malformed(format!("invalid audioContent: {e}")))?;
                tracing::debug!(bytes = bytes.len(), "synthesized clip");
                Ok(AudioClip::mp3(bytes))
            }
            (None, Some(err)) => Err(api_error(status, err.message)),
            (None, None) => Err(SynthesisError::Malformed(
                "response has no audioContent".to_string(),
            )),
        }
    }
}
