//! Wire types for the OpenAI-compatible chat completions API.
//!
//! Only the fields dealflow reads or writes are modelled; unknown response
//! fields are ignored.

use dealflow_core::CompletionRequest;
use serde::{Deserialize, Serialize};

/// Body of a `POST /v1/chat/completions` request.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl<'a> ChatRequest<'a> {
    /// Build a chat request carrying an optional system prompt and the user
    /// prompt.
    pub fn from_completion(model: &'a str, request: &'a CompletionRequest) -> Self {
        let system = request.system.as_deref().map(|content| ChatMessage {
            role: "system",
            content,
        });
        let user = ChatMessage {
            role: "user",
            content: &request.prompt,
        };
        Self {
            model,
            messages: system.into_iter().chain([user]).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Chat completions response.
///
/// Providers report failures either through the HTTP status or through an
/// `error` object in a 200 body.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub error: Option<ChatError>,
}

impl ChatResponse {
    /// Text of the first choice, if the provider returned one.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn request_places_system_prompt_first() {
        let completion = CompletionRequest::new("expand this").with_system("be terse");
        let request = ChatRequest::from_completion("gpt-4o-mini", &completion);

        let body = serde_json::to_value(&request).expect("serialise request");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be terse");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "expand this");
        assert_eq!(body["max_tokens"], 512);
    }

    #[rstest]
    fn request_without_system_prompt_sends_one_message() {
        let completion = CompletionRequest::new("hello");
        let request = ChatRequest::from_completion("m", &completion);
        assert_eq!(request.messages.len(), 1);
    }

    #[rstest]
    fn deserialises_first_choice() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi"}},
                {"index": 1, "message": {"role": "assistant", "content": "Ignored"}}
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.error.is_none());
        assert_eq!(response.first_content().as_deref(), Some("Hi"));
    }

    #[rstest]
    fn deserialises_error_body() {
        let json = r#"{"error": {"message": "model not found", "type": "invalid_request"}}"#;

        let response: ChatResponse = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(
            response.error.map(|err| err.message).as_deref(),
            Some("model not found")
        );
        assert!(response.choices.is_empty());
    }

    #[rstest]
    fn null_content_yields_none() {
        let json = r#"{"choices": [{"message": {"content": null}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).expect("should deserialise");
        assert!(response.first_content().is_none());
    }
}
