use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Request/response schema family spoken by the upstream service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI-style text completions (`choices[].text`)
    #[default]
    Completions,
    /// OpenAI-style chat completions (`choices[].message.content`)
    Chat,
    /// Google Generative Language `generateContent`
    Gemini,
}

impl Provider {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Completions => "https://api.openai.com/v1/completions",
            Self::Chat => "https://api.openai.com/v1/chat/completions",
            Self::Gemini => {
                "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
            }
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Completions => "gpt-3.5-turbo-instruct",
            Self::Chat => "gpt-4o-mini",
            Self::Gemini => "gemini-2.0-flash",
        }
    }

    /// JSON pointer of the generated text in a successful response
    pub fn answer_pointer(&self) -> &'static str {
        match self {
            Self::Completions => "/choices/0/text",
            Self::Chat => "/choices/0/message/content",
            Self::Gemini => "/candidates/0/content/parts/0/text",
        }
    }

    /// Conventional environment variable holding the key for this provider
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Completions | Self::Chat => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Completions => "completions",
            Self::Chat => "chat",
            Self::Gemini => "gemini",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completions" | "openai" => Ok(Self::Completions),
            "chat" | "openai-chat" => Ok(Self::Chat),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!(
                "unknown provider '{}' (expected completions, chat or gemini)",
                other
            )),
        }
    }
}

/// Fixed generation parameters sent with every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

#[derive(Serialize, Debug)]
struct CompletionsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize, Debug)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
}

#[derive(Serialize, Debug)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Builds the JSON request body for `provider`.
pub fn build_payload(
    provider: Provider,
    model: &str,
    query: &str,
    params: &GenerationParams,
) -> serde_json::Result<Value> {
    match provider {
        Provider::Completions => {
            // Text completions have no system role; prepend it to the prompt
            let prompt = match &params.system_prompt {
                Some(system) => format!("{}\n\n{}", system, query),
                None => query.to_string(),
            };
            serde_json::to_value(CompletionsRequest {
                model,
                prompt: &prompt,
                temperature: params.temperature,
                max_tokens: params.max_tokens,
            })
        }
        Provider::Chat => {
            let mut messages = Vec::with_capacity(2);
            if let Some(system) = &params.system_prompt {
                messages.push(ChatMessage {
                    role: "system",
                    content: system,
                });
            }
            messages.push(ChatMessage {
                role: "user",
                content: query,
            });
            serde_json::to_value(ChatRequest {
                model,
                messages,
                temperature: params.temperature,
                max_tokens: params.max_tokens,
            })
        }
        Provider::Gemini => {
            let generation_config =
                if params.temperature.is_some() || params.max_tokens.is_some() {
                    Some(GeminiGenerationConfig {
                        temperature: params.temperature,
                        max_output_tokens: params.max_tokens,
                    })
                } else {
                    None
                };
            serde_json::to_value(GeminiRequest {
                contents: vec![GeminiContent {
                    parts: vec![GeminiPart { text: query }],
                    role: Some("user"),
                }],
                system_instruction: params.system_prompt.as_deref().map(|text| GeminiContent {
                    parts: vec![GeminiPart { text }],
                    role: None,
                }),
                generation_config,
            })
        }
    }
}

/// Error payload reported by the upstream, `{"error": ...}`.
///
/// OpenAI and Gemini both nest an object with a `message`; some proxies send a bare string.
#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ApiErrorDetail {
    Object {
        message: String,
        #[serde(default)]
        code: Option<Value>,
        #[serde(default)]
        status: Option<String>,
    },
    Text(String),
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object {
                message,
                code,
                status,
            } => {
                write!(f, "{}", message)?;
                if let Some(code) = code {
                    write!(f, " (code: {})", code)?;
                }
                if let Some(status) = status {
                    write!(f, " (status: {})", status)?;
                }
                Ok(())
            }
            Self::Text(text) => f.write_str(text),
        }
    }
}
