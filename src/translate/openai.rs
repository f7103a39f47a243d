//! OpenAI-compatible chat-completions translator.
//!
//! Sends one blocking request per text. Transient failures (connection
//! errors, HTTP 429 and 5xx) are retried with exponential backoff.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use super::Translator;
use crate::error::{Error, Result};

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Configuration for [`OpenAiTranslator`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token
    pub api_key: String,

    /// Chat-completions URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// System prompt; `{source}` and `{target}` are replaced by language names
    pub system_prompt: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Attempts per text, including the first
    pub max_retries: u32,
}

impl OpenAiConfig {
    /// Create a configuration with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Read the API key from `OPENAI_API_KEY`.
    pub fn from_env() -> Option<Self> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(Self::new)
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of attempts per text (at least 1).
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// System prompt for a language pair.
    pub fn system_prompt_for(&self, source_lang: &str, target_lang: &str) -> String {
        let template = self.system_prompt.as_deref().unwrap_or(
            "You are a professional translator. Translate from {source} to {target}. \
             Preserve structure, bullet lists, tables and numbers. \
             Keep a neutral finance tone.",
        );
        template
            .replace("{source}", language_name(source_lang))
            .replace("{target}", language_name(target_lang))
    }
}

/// Human-readable name for common language codes.
fn language_name(code: &str) -> &str {
    match code.to_ascii_lowercase().as_str() {
        "fr" => "French",
        "nl" => "Dutch (Belgium)",
        "en" => "English",
        "de" => "German",
        _ => code,
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Translator backed by an OpenAI-compatible HTTP API.
pub struct OpenAiTranslator {
    config: OpenAiConfig,
    client: reqwest::blocking::Client,
}

impl OpenAiTranslator {
    /// Create a translator.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("docmap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn request_once(&self, body: &ChatRequest<'_>) -> std::result::Result<String, Attempt> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .map_err(|e| Attempt::Retry(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let parsed: ChatResponse = response
                .json()
                .map_err(|e| Attempt::Fatal(format!("invalid response: {}", e)))?;
            return parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|s| s.trim().to_string())
                .ok_or_else(|| Attempt::Fatal("response has no content".to_string()));
        }

        let detail = response
            .text()
            .unwrap_or_else(|_| "unknown error".to_string());
        let message = format!("HTTP {}: {}", status, detail);
        if status.as_u16() == 429 || status.is_server_error() {
            Err(Attempt::Retry(message))
        } else {
            Err(Attempt::Fatal(message))
        }
    }
}

enum Attempt {
    Retry(String),
    Fatal(String),
}

impl Translator for OpenAiTranslator {
    fn name(&self) -> &str {
        "openai"
    }

    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let system = self.config.system_prompt_for(source_lang, target_lang);
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let max_retries = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut last_error = String::from("max retries exceeded");

        while attempts < max_retries {
            match self.request_once(&body) {
                Ok(translated) => return Ok(translated),
                Err(Attempt::Fatal(message)) => {
                    return Err(Error::TranslationUnavailable(message));
                }
                Err(Attempt::Retry(message)) => {
                    debug!("attempt {} failed: {}", attempts + 1, message);
                    last_error = message;
                }
            }

            attempts += 1;
            if attempts < max_retries {
                // 1s, 2s, 4s, ...
                std::thread::sleep(Duration::from_secs(2u64.pow(attempts - 1)));
            }
        }

        Err(Error::TranslationUnavailable(last_error))
    }
}
