//! Shared fixtures: a provider that replays scripted chunk sequences and
//! helpers for building raw structured calls.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use mx_domain::error::{Error, Result};
use mx_domain::stream::{BoxStream, Chunk};
use mx_domain::tool::ToolCall;
use mx_explorer::{Explorer, GeoJsonMap};
use mx_providers::{ChatRequest, LlmProvider};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::oneshot;

/// What one `chat_stream` call produces.
pub enum Script {
    /// Replay `items`. With a gate, the stream pauses after `after` items
    /// until the gate fires.
    Stream {
        items: Vec<Result<Chunk>>,
        gate: Option<(usize, oneshot::Receiver<()>)>,
    },
    /// Fail before any stream is returned.
    Refuse(Error),
}

impl Script {
    pub fn chunks(chunks: Vec<Chunk>) -> Self {
        Script::Stream {
            items: chunks.into_iter().map(Ok).collect(),
            gate: None,
        }
    }

    pub fn items(items: Vec<Result<Chunk>>) -> Self {
        Script::Stream { items, gate: None }
    }

    pub fn gated(chunks: Vec<Chunk>, after: usize, gate: oneshot::Receiver<()>) -> Self {
        Script::Stream {
            items: chunks.into_iter().map(Ok).collect(),
            gate: Some((after, gate)),
        }
    }
}

/// Hands out scripts in call order and records every request it receives.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat_stream(&self, req: &ChatRequest) -> Result<BoxStream<'static, Result<Chunk>>> {
        self.requests.lock().push(req.clone());
        let script = self
            .scripts
            .lock()
            .pop_front()
            .ok_or_else(|| Error::Provider {
                provider: "scripted".into(),
                message: "no script left".into(),
            })?;

        match script {
            Script::Refuse(e) => Err(e),
            Script::Stream { items, gate } => {
                let stream = async_stream::stream! {
                    let pause_at = gate.as_ref().map(|(after, _)| *after);
                    let mut gate = gate.map(|(_, rx)| rx);
                    for (i, item) in items.into_iter().enumerate() {
                        if Some(i) == pause_at {
                            if let Some(rx) = gate.take() {
                                let _ = rx.await;
                            }
                        }
                        yield item;
                    }
                };
                Ok(Box::pin(stream))
            }
        }
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }
}

pub fn explorer(provider: &Arc<ScriptedProvider>) -> Explorer<GeoJsonMap> {
    Explorer::new(provider.clone(), GeoJsonMap::new(), Default::default())
}

/// A `location` call with string-encoded coordinates, as the model sends them.
pub fn location(name: &str, lat: &str, lng: &str) -> ToolCall {
    ToolCall::new(
        "location",
        json!({
            "name": name,
            "description": format!("About {name}"),
            "lat": lat,
            "lng": lng,
        }),
    )
}

/// A planner stop carrying `time` and `sequence`.
pub fn stop(name: &str, lat: &str, lng: &str, time: &str, sequence: u32) -> ToolCall {
    ToolCall::new(
        "location",
        json!({
            "name": name,
            "description": format!("About {name}"),
            "lat": lat,
            "lng": lng,
            "time": time,
            "duration": "1 hour",
            "sequence": sequence,
        }),
    )
}

pub fn line(name: &str, start: (&str, &str), end: (&str, &str)) -> ToolCall {
    ToolCall::new(
        "line",
        json!({
            "name": name,
            "start": { "lat": start.0, "lng": start.1 },
            "end": { "lat": end.0, "lng": end.1 },
            "transport": "walking",
            "travelTime": "10 minutes",
        }),
    )
}

pub fn calls(calls: Vec<ToolCall>) -> Chunk {
    Chunk::calls(calls)
}
