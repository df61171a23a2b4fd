//! OpenAI chat-completions rule generator.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{Result, ScourError};
use crate::rules::{parse_rules, RuleSet};
use crate::table::Table;

use super::prompts;
use super::provider::{GeneratorConfig, RuleGenerator};

/// OpenAI API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Generates rules with an OpenAI GPT model.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    config: GeneratorConfig,
}

impl OpenAiGenerator {
    /// Create a generator with the default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GeneratorConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: GeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScourError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env(config: GeneratorConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ScourError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| ScourError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_prompt()
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| ScourError::Generator(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(ScourError::Generator(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| ScourError::Generator(format!("Failed to parse API response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ScourError::Generator("No response from OpenAI".to_string()))
    }
}

impl RuleGenerator for OpenAiGenerator {
    fn generate(&self, sample: &Table, description: &str) -> Result<RuleSet> {
        info!(
            "Requesting rules from {} for {} sample rows",
            self.config.model,
            sample.row_count()
        );
        let prompt = prompts::user_prompt(sample, description);
        let response = self.send_message(&prompt)?;
        debug!("Generator response: {} bytes", response.len());

        let rules = parse_response(&response)?;
        info!("Generator proposed {} rules", rules.len());
        Ok(rules.with_description(description.trim()))
    }

    fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Parse a model reply into a validated rule set.
///
/// Accepts a bare array of rules or an object with a `rules` array, optionally
/// wrapped in a markdown code block.
pub(crate) fn parse_response(response: &str) -> Result<RuleSet> {
    let json_str = strip_code_fence(response);
    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        ScourError::Generator(format!("Failed to parse generator JSON response: {}", e))
    })?;

    let rules = match value {
        Value::Array(_) => value,
        Value::Object(mut object) => object.remove("rules").ok_or_else(|| {
            ScourError::Generator("Generator response has no 'rules' key".to_string())
        })?,
        _ => {
            return Err(ScourError::Generator(
                "Generator response is neither a list nor an object".to_string(),
            ));
        }
    };

    RuleSet::new(parse_rules(rules)?)
}

fn strip_code_fence(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleType;

    const RULE: &str = r#"{"rule_id": "trim", "rule_type": "transformation", "pattern": "^\\s+", "replacement": "", "columns": ["Item"], "confidence": 0.8}"#;

    #[test]
    fn test_parse_object_response() {
        let set = parse_response(&format!(r#"{{"rules": [{RULE}]}}"#)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.rules()[0].rule_type, RuleType::Transformation);
    }

    #[test]
    fn test_parse_fenced_array_response() {
        let response = format!("Here you go:\n```json\n[{RULE}]\n```\n");
        let set = parse_response(&response).unwrap();
        assert_eq!(set.rules()[0].rule_id, "trim");
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        let response = r#"{"rules": [{"rule_id": "x", "rule_type": "transformation", "columns": ["a"]}]}"#;
        assert!(matches!(
            parse_response(response),
            Err(ScourError::MalformedRuleSet(_))
        ));
        assert!(matches!(
            parse_response("not json at all"),
            Err(ScourError::Generator(_))
        ));
    }

    #[test]
    fn test_generator_reports_config() {
        let config = GeneratorConfig::default().with_model("gpt-4o-mini");
        let generator = OpenAiGenerator::with_config("sk-test", config).unwrap();
        assert_eq!(generator.name(), "openai");
        assert_eq!(generator.config().model, "gpt-4o-mini");
    }
}
