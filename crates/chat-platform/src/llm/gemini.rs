//! Gemini generateContent adapter.
//!
//! Streaming uses the `:streamGenerateContent?alt=sse` endpoint read
//! through the browser `fetch()` body stream; title derivation is a
//! one-shot `:generateContent` call via gloo-net. The API returns text
//! deltas; this adapter accumulates them and emits cumulative snapshots,
//! which is what the stream contract promises.

use std::pin::Pin;

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::Stream;
use gloo_net::http::Request as GlooRequest;
use js_sys::Uint8Array;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{ReadableStreamDefaultReader, RequestInit, Response};

use chat_core::ports::{GenerationPort, StreamEvent};
use chat_types::{
    config::GenerationConfig,
    message::{Message, Role},
    session::PLACEHOLDER_TITLE,
    ChatError, Result,
};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiClient {
    config: GenerationConfig,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: GenerationConfig) -> Self {
        let base_url = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self { config, base_url }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}?key={}",
            self.base_url, self.config.model, method, self.config.api_key
        )
    }

    async fn request_title(&self, seed_text: &str) -> Result<String> {
        let prompt = format!(
            "Create a very short, catchy title (max 5 words) for a chat that starts with: \
\"{}\". Return only the title text.",
            seed_text
        );
        let body = GenerateRequest {
            contents: vec![Content::user(&prompt)],
            system_instruction: None,
            generation_config: None,
        };

        let response = GlooRequest::post(&self.endpoint("generateContent"))
            .header("Content-Type", "application/json")
            .json(&body)
            .map_err(|e| ChatError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Generation(format!("HTTP {}", response.status())));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Generation(e.to_string()))?;

        // Models like to quote short answers; strip the quotes.
        Ok(data
            .first_text()
            .chars()
            .filter(|c| *c != '"' && *c != '\'')
            .collect::<String>()
            .trim()
            .to_string())
    }

    fn build_request_body(&self, history: &[Message], new_user_text: &str) -> GenerateRequest {
        let mut contents: Vec<Content> = history.iter().map(Content::from_message).collect();
        contents.push(Content::user(new_user_text));

        GenerateRequest {
            contents,
            system_instruction: Some(Content::bare(&self.config.system_instruction)),
            generation_config: Some(GenConfig {
                temperature: self.config.temperature,
            }),
        }
    }
}

#[async_trait(?Send)]
impl GenerationPort for GeminiClient {
    fn stream_completion(
        &self,
        history: Vec<Message>,
        new_user_text: &str,
    ) -> Pin<Box<dyn Stream<Item = StreamEvent>>> {
        let url = format!("{}&alt=sse", self.endpoint("streamGenerateContent"));
        let body = self.build_request_body(&history, new_user_text);
        let (tx, rx) = mpsc::unbounded();

        spawn_local(async move {
            if let Err(e) = drive_sse(&url, &body, &tx).await {
                let _ = tx.unbounded_send(StreamEvent::Error(e.to_string()));
            }
        });

        Box::pin(rx)
    }

    async fn generate_title(&self, seed_text: &str) -> Result<String> {
        // Any failure degrades to the placeholder title; a chat without a
        // catchy name is still a working chat.
        match self.request_title(seed_text).await {
            Ok(title) if !title.is_empty() => Ok(title),
            Ok(_) => Ok(PLACEHOLDER_TITLE.to_string()),
            Err(e) => {
                log::warn!("title request failed: {}", e);
                Ok(PLACEHOLDER_TITLE.to_string())
            }
        }
    }
}

/// Run one SSE request to completion, pushing cumulative snapshots
/// into `tx` and finishing with `Done`.
async fn drive_sse(
    url: &str,
    body: &GenerateRequest,
    tx: &mpsc::UnboundedSender<StreamEvent>,
) -> Result<()> {
    let body_json = serde_json::to_string(body)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body_json));
    let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(js_err)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_err)?;

    let window = web_sys::window()
        .ok_or_else(|| ChatError::JsInterop("no window object".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    if !response.ok() {
        return Err(ChatError::Generation(format!("HTTP {}", response.status())));
    }

    let reader: ReadableStreamDefaultReader = response
        .body()
        .ok_or_else(|| ChatError::Network("response has no body".to_string()))?
        .get_reader()
        .unchecked_into();

    let mut buf: Vec<u8> = Vec::new();
    let mut full = String::new();

    loop {
        let result = JsFuture::from(reader.read()).await.map_err(js_err)?;
        let done = js_sys::Reflect::get(&result, &JsValue::from_str("done"))
            .map_err(js_err)?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = js_sys::Reflect::get(&result, &JsValue::from_str("value")).map_err(js_err)?;
        buf.extend_from_slice(&Uint8Array::new(&value).to_vec());

        // SSE frames are newline-delimited; process every complete line
        // and keep the partial tail buffered (also avoids splitting a
        // multi-byte UTF-8 sequence).
        while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = buf.drain(..=pos).collect();
            if let Some(delta) = parse_sse_line(&line) {
                full.push_str(&delta);
                let _ = tx.unbounded_send(StreamEvent::Chunk(full.clone()));
            }
        }
    }

    let _ = tx.unbounded_send(StreamEvent::Done { text: full });
    Ok(())
}

/// Extract the text delta from one `data: {...}` line, if any.
fn parse_sse_line(line: &[u8]) -> Option<String> {
    let line = std::str::from_utf8(line).ok()?.trim();
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }
    let frame: GenerateResponse = serde_json::from_str(payload).ok()?;
    let delta = frame.first_text();
    if delta.is_empty() {
        None
    } else {
        Some(delta)
    }
}

fn js_err(e: JsValue) -> ChatError {
    ChatError::JsInterop(format!("{:?}", e))
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenConfig>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    /// Role-less content, used for the system instruction.
    fn bare(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    fn from_message(message: &Message) -> Self {
        let role = match message.role {
            Role::User => "user",
            Role::Model => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: message.content.clone(),
            }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts.
    fn first_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentOut>,
}

#[derive(Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}
