use std::time::Duration;

use reqwest::blocking::Client;

use crate::client::{GenerateRequest, Provider, ProviderError, TurnRole};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Blocking client for Google's Generative Language API, authenticated with
/// an API key. One POST per [`GenerateRequest`]; timeouts and non-success
/// statuses surface as [`ProviderError`] and are handled by the caller.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        Self {
            api_key: api_key.trim().to_string(),
            model,
            client,
        }
    }

    fn build_body(&self, request: &GenerateRequest) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = request
            .turns
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Model => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": turn.text }]
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            }
        });

        let mut gen_config = serde_json::Map::new();
        if let Some(temperature) = request.temperature {
            gen_config.insert("temperature".to_string(), serde_json::json!(temperature));
        }
        if let Some(schema) = &request.response_schema {
            gen_config.insert(
                "responseMimeType".to_string(),
                serde_json::json!("application/json"),
            );
            gen_config.insert("responseSchema".to_string(), schema.clone());
        }
        if !gen_config.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(gen_config);
        }

        body
    }
}

impl Provider for GeminiProvider {
    fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = self.build_body(request);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let text = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new("  test-key  ".to_string(), "gemini-2.5-flash".to_string())
    }

    #[test]
    fn api_key_is_trimmed() {
        assert_eq!(provider().api_key, "test-key");
    }

    #[test]
    fn body_maps_roles_and_system_instruction() {
        let request = GenerateRequest {
            turns: vec![
                crate::client::Turn {
                    role: TurnRole::Model,
                    text: "hello".into(),
                },
                crate::client::Turn {
                    role: TurnRole::User,
                    text: "question".into(),
                },
            ],
            system_instruction: "be kind".into(),
            temperature: None,
            response_schema: None,
        };
        let body = provider().build_body(&request);
        assert_eq!(body["contents"][0]["role"], "model");
        assert_eq!(body["contents"][1]["role"], "user");
        assert_eq!(body["contents"][1]["parts"][0]["text"], "question");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be kind");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn body_includes_generation_config_when_set() {
        let mut request = GenerateRequest::prompt("p", "s");
        request.temperature = Some(0.5);
        request.response_schema = Some(serde_json::json!({"type": "ARRAY"}));
        let body = provider().build_body(&request);
        let config = &body["generationConfig"];
        assert_eq!(config["temperature"], 0.5);
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "ARRAY");
    }
}
