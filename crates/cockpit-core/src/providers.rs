//! Static registry of remote AI providers.
//!
//! Each provider is a [`ProviderSpec`]: an endpoint template, the name of the
//! environment variable holding its credential, and two plain functions that
//! build the request and pull the generated text out of the response. Nothing
//! here performs I/O.

use std::fmt;

use serde_json::{json, Value};

use crate::error::RegistryError;

/// Placeholder in endpoint templates replaced by the effective model.
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Headers and body produced by a provider's request builder.
pub type RequestParts = (Vec<(&'static str, String)>, Vec<u8>);

/// A provider request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRequest {
    /// Fully resolved endpoint URL.
    pub url: String,
    /// Request headers, in sending order.
    pub headers: Vec<(&'static str, String)>,
    /// Encoded JSON body.
    pub body: Vec<u8>,
}

/// Description of one remote provider.
#[derive(Clone, Copy)]
pub struct ProviderSpec {
    /// Identifier used in configuration and requests.
    pub id: &'static str,
    /// Endpoint URL, possibly containing [`MODEL_PLACEHOLDER`].
    pub endpoint: &'static str,
    /// Environment variable holding the credential, if one is required.
    pub credential_env: Option<&'static str>,
    /// Model used when the caller passes an empty model name.
    pub default_model: &'static str,
    /// Builds headers and body from `(credential, model, prompt)`.
    pub build: fn(&str, &str, &str) -> RequestParts,
    /// Extracts generated text from a decoded response body.
    pub extract: fn(&Value) -> String,
}

impl fmt::Debug for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSpec")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("credential_env", &self.credential_env)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

impl ProviderSpec {
    /// The model actually sent: `model`, or the default when empty.
    #[must_use]
    pub fn effective_model<'a>(&self, model: &'a str) -> &'a str {
        if model.is_empty() {
            self.default_model
        } else {
            model
        }
    }

    /// Build the full request for this provider.
    #[must_use]
    pub fn build_request(&self, credential: &str, model: &str, prompt: &str) -> BuiltRequest {
        let model = self.effective_model(model);
        let (headers, body) = (self.build)(credential, model, prompt);
        BuiltRequest {
            url: self.endpoint.replace(MODEL_PLACEHOLDER, model),
            headers,
            body,
        }
    }

    /// Extract the generated text, or an empty string if the shape is unexpected.
    #[must_use]
    pub fn parse_response(&self, data: &Value) -> String {
        (self.extract)(data)
    }
}

/// Every provider the gateway can call, sorted by identifier.
pub static PROVIDERS: [ProviderSpec; 4] = [
    ProviderSpec {
        id: "anthropic",
        endpoint: "https://api.anthropic.com/v1/messages",
        credential_env: Some("ANTHROPIC_API_KEY"),
        default_model: "claude-sonnet-4-5-20250929",
        build: build_anthropic,
        extract: extract_anthropic,
    },
    ProviderSpec {
        id: "google",
        endpoint: "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent",
        credential_env: Some("GOOGLE_API_KEY"),
        default_model: "gemini-2.0-flash",
        build: build_google,
        extract: extract_google,
    },
    ProviderSpec {
        id: "ollama",
        endpoint: "http://localhost:11434/api/generate",
        credential_env: None,
        default_model: "llama3.1:8b",
        build: build_ollama,
        extract: extract_ollama,
    },
    ProviderSpec {
        id: "openai",
        endpoint: "https://api.openai.com/v1/chat/completions",
        credential_env: Some("OPENAI_API_KEY"),
        default_model: "gpt-4o",
        build: build_openai,
        extract: extract_openai,
    },
];

/// Look up a provider by identifier.
#[must_use]
pub fn lookup(provider_id: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.id == provider_id)
}

/// Look up a provider, failing with the list of known identifiers.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownProvider`] for identifiers not in the table.
pub fn require(provider_id: &str) -> Result<&'static ProviderSpec, RegistryError> {
    lookup(provider_id).ok_or_else(|| RegistryError::UnknownProvider {
        provider: provider_id.to_string(),
        supported: supported_list(),
    })
}

/// Build the request for `provider_id`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownProvider`] for identifiers not in the table.
pub fn build_request(
    provider_id: &str,
    credential: &str,
    model: &str,
    prompt: &str,
) -> Result<BuiltRequest, RegistryError> {
    Ok(require(provider_id)?.build_request(credential, model, prompt))
}

/// Extract generated text from a response of `provider_id`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownProvider`] for identifiers not in the table.
pub fn parse_response(provider_id: &str, data: &Value) -> Result<String, RegistryError> {
    Ok(require(provider_id)?.parse_response(data))
}

/// Comma-separated provider identifiers.
#[must_use]
pub fn supported_list() -> String {
    PROVIDERS
        .iter()
        .map(|spec| spec.id)
        .collect::<Vec<_>>()
        .join(", ")
}

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

fn content_type() -> (&'static str, String) {
    (JSON_CONTENT_TYPE.0, JSON_CONTENT_TYPE.1.to_string())
}

fn text_at(data: &Value, pointer: &str) -> String {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn build_anthropic(key: &str, model: &str, prompt: &str) -> RequestParts {
    let headers = vec![
        content_type(),
        ("x-api-key", key.to_string()),
        ("anthropic-version", "2023-06-01".to_string()),
    ];
    let body = json!({
        "model": model,
        "max_tokens": 1024,
        "messages": [{"role": "user", "content": prompt}],
    });
    (headers, body.to_string().into_bytes())
}

fn extract_anthropic(data: &Value) -> String {
    text_at(data, "/content/0/text")
}

fn build_openai(key: &str, model: &str, prompt: &str) -> RequestParts {
    let headers = vec![content_type(), ("authorization", format!("Bearer {key}"))];
    let body = json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
    });
    (headers, body.to_string().into_bytes())
}

fn extract_openai(data: &Value) -> String {
    text_at(data, "/choices/0/message/content")
}

// Model travels in the URL for this provider.
fn build_google(key: &str, _model: &str, prompt: &str) -> RequestParts {
    let headers = vec![content_type(), ("x-goog-api-key", key.to_string())];
    let body = json!({
        "contents": [{"parts": [{"text": prompt}]}],
    });
    (headers, body.to_string().into_bytes())
}

fn extract_google(data: &Value) -> String {
    text_at(data, "/candidates/0/content/parts/0/text")
}

fn build_ollama(_key: &str, model: &str, prompt: &str) -> RequestParts {
    let body = json!({
        "model": model,
        "prompt": prompt,
        "stream": false,
    });
    (vec![content_type()], body.to_string().into_bytes())
}

fn extract_ollama(data: &Value) -> String {
    text_at(data, "/response")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(request: &BuiltRequest) -> Value {
        serde_json::from_slice(&request.body).unwrap()
    }

    fn header<'a>(request: &'a BuiltRequest, name: &str) -> Option<&'a str> {
        request
            .headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn registry_is_sorted_and_unique() {
        let ids: Vec<_> = PROVIDERS.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
        assert_eq!(supported_list(), "anthropic, google, ollama, openai");
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let err = build_request("mistral", "k", "", "hi").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown provider 'mistral'. Supported: anthropic, google, ollama, openai"
        );
        assert!(parse_response("mistral", &json!({})).is_err());
    }

    #[test]
    fn anthropic_request_shape() {
        let request = build_request("anthropic", "sk-ant", "", "hello").unwrap();
        assert_eq!(request.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(header(&request, "x-api-key"), Some("sk-ant"));
        assert_eq!(header(&request, "anthropic-version"), Some("2023-06-01"));

        let body = body_json(&request);
        assert_eq!(body["model"], "claude-sonnet-4-5-20250929");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn openai_request_uses_bearer_token_and_explicit_model() {
        let request = build_request("openai", "sk-oa", "gpt-4o-mini", "hello").unwrap();
        assert_eq!(header(&request, "authorization"), Some("Bearer sk-oa"));
        assert_eq!(body_json(&request)["model"], "gpt-4o-mini");
    }

    #[test]
    fn google_model_goes_into_url() {
        let request = build_request("google", "g-key", "", "hello").unwrap();
        assert_eq!(
            request.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(header(&request, "x-goog-api-key"), Some("g-key"));
        assert_eq!(body_json(&request)["contents"][0]["parts"][0]["text"], "hello");

        let request = build_request("google", "g-key", "gemini-2.5-pro", "hello").unwrap();
        assert!(request.url.contains("/models/gemini-2.5-pro:generateContent"));
    }

    #[test]
    fn ollama_needs_no_credential() {
        let spec = lookup("ollama").unwrap();
        assert!(spec.credential_env.is_none());

        let request = spec.build_request("", "", "hello");
        assert_eq!(request.headers, vec![content_type()]);
        let body = body_json(&request);
        assert_eq!(body["model"], "llama3.1:8b");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn extraction_follows_provider_shapes() {
        let cases = [
            ("anthropic", json!({"content": [{"type": "text", "text": "a"}]})),
            ("openai", json!({"choices": [{"message": {"content": "b"}}]})),
            (
                "google",
                json!({"candidates": [{"content": {"parts": [{"text": "c"}]}}]}),
            ),
            ("ollama", json!({"response": "d"})),
        ];
        let texts: Vec<_> = cases
            .iter()
            .map(|(id, data)| parse_response(id, data).unwrap())
            .collect();
        assert_eq!(texts, ["a", "b", "c", "d"]);
    }

    #[test]
    fn extraction_tolerates_partial_payloads() {
        let payloads = [
            json!({}),
            json!({"content": []}),
            json!({"choices": [{}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"error": {"message": "overloaded"}}),
            json!({"response": 42}),
            json!([]),
            Value::Null,
        ];
        for spec in &PROVIDERS {
            for payload in &payloads {
                assert_eq!(spec.parse_response(payload), "", "{} / {payload}", spec.id);
            }
        }
    }
}
