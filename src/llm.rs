// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Natural-language symbol summaries from an OpenAI-compatible chat API

use crate::config::SummarizerConfig;
use crate::error::{LoreError, Result};
use crate::types::{Symbol, SymbolKind};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 300;

/// Produces a short prose description of a symbol
pub trait SymbolSummarizer {
    /// Summarize one symbol
    fn summarize(&self, symbol: &Symbol) -> Result<String>;
}

/// Summary outcome for one symbol; exactly one of `summary`/`error` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSummary {
    /// Symbol name
    pub name: String,
    /// Function or class
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    /// Generated text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Why no text was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summarize every symbol; a failure is recorded on that symbol only
pub fn summarize_all(summarizer: &dyn SymbolSummarizer, symbols: &[Symbol]) -> Vec<SymbolSummary> {
    symbols
        .iter()
        .map(|symbol| {
            let (summary, error) = match summarizer.summarize(symbol) {
                Ok(text) => (Some(text), None),
                Err(e) => {
                    warn!("No summary for {}: {}", symbol.name, e);
                    (None, Some(e.to_string()))
                }
            };
            SymbolSummary {
                name: symbol.name.clone(),
                kind: symbol.kind,
                summary,
                error,
            }
        })
        .collect()
}

/// Prompt sent for one symbol
#[must_use]
pub fn prompt_for(symbol: &Symbol) -> String {
    let kind = match symbol.kind {
        SymbolKind::Function => "function",
        SymbolKind::Class => "class",
    };
    format!(
        "You are a code documentation AI. Summarize the following {kind} named '{}'.\n\nCode:\n{}\n",
        symbol.name, symbol.code
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client
pub struct ChatSummarizer {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatSummarizer {
    /// Build a client from the summarizer settings
    pub fn new(config: &SummarizerConfig, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LoreError::RemoteUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

impl SymbolSummarizer for ChatSummarizer {
    fn summarize(&self, symbol: &Symbol) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LoreError::RemoteUnavailable("no summarizer API key configured".to_string()))?;

        let prompt = prompt_for(symbol);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!("Summarizing {} via {}", symbol.name, self.url);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| LoreError::RemoteUnavailable(format!("summarizer request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoreError::RemoteUnavailable(format!("summarizer returned {}", status.as_u16())));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LoreError::RemoteUnavailable(format!("failed to decode summarizer response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| LoreError::RemoteUnavailable("summarizer returned no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl SymbolSummarizer for Echo {
        fn summarize(&self, symbol: &Symbol) -> Result<String> {
            if symbol.name.starts_with('_') {
                Err(LoreError::RemoteUnavailable("rate limited".into()))
            } else {
                Ok(format!("does {}", symbol.name))
            }
        }
    }

    fn symbol(name: &str, kind: SymbolKind) -> Symbol {
        Symbol {
            kind,
            name: name.to_string(),
            start_line: 1,
            docstring: None,
            code: format!("def {name}():\n    pass"),
        }
    }

    #[test]
    fn test_prompt() {
        let prompt = prompt_for(&symbol("login", SymbolKind::Function));
        assert!(prompt.contains("Summarize the following function named 'login'."));
        assert!(prompt.ends_with("def login():\n    pass\n"));
    }

    #[test]
    fn test_failures_stay_per_symbol() {
        let symbols = vec![symbol("login", SymbolKind::Function), symbol("_hidden", SymbolKind::Class)];
        let summaries = summarize_all(&Echo, &symbols);
        assert_eq!(summaries[0].summary.as_deref(), Some("does login"));
        assert!(summaries[0].error.is_none());
        assert!(summaries[1].summary.is_none());
        assert!(summaries[1].error.as_deref().unwrap().contains("rate limited"));
    }

    #[test]
    fn test_missing_key_is_remote_unavailable() {
        let config = SummarizerConfig {
            api_key: None,
            ..SummarizerConfig::default()
        };
        let summarizer = ChatSummarizer::new(&config, 5).unwrap();
        let err = summarizer.summarize(&symbol("f", SymbolKind::Function)).unwrap_err();
        assert!(matches!(err, LoreError::RemoteUnavailable(_)));
    }

    #[test]
    fn test_response_decoding() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"  Logs in.  "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref().map(str::trim), Some("Logs in."));
    }
}
