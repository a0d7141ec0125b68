//! Query execution: reset the overlay, stream one generation, apply each
//! structured call as it arrives, and assemble the result.
//!
//! Phases run `Idle → Resetting → Streaming → Finalizing → {Succeeded, Failed}`.
//! Every query takes a fresh epoch under the same lock that guards the
//! overlay store. A chunk is only applied while its query's epoch is still
//! current, so a stream that outlives a newer query's reset can never write
//! into the newer query's overlay. A superseded query stops polling and
//! drops its stream, which abandons the underlying request.

use std::sync::Arc;

use futures_util::StreamExt;
use parking_lot::Mutex;
use tracing::Instrument;

use mx_domain::config::ExplorerConfig;
use mx_domain::error::{Error, Result};
use mx_domain::stream::{Chunk, Usage};
use mx_domain::tool::Message;
use mx_providers::{ChatRequest, LlmProvider};

use crate::map::MapSurface;
use crate::mode::Mode;
use crate::model::{Location, QueryResult};
use crate::overlay::OverlayStore;
use crate::schema::{self, DecodeError, GeoCall};

/// Sampling temperature for every query: favours breadth of discovered
/// places over determinism.
pub const EXPLORER_TEMPERATURE: f32 = 1.0;

/// Where the most recent query is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Resetting,
    Streaming,
    Finalizing,
    Succeeded,
    Failed,
}

struct ExplorerState<M: MapSurface> {
    epoch: u64,
    phase: QueryPhase,
    store: OverlayStore<M>,
}

/// Per-query accumulation that lives outside the overlay lock.
struct Aggregation {
    mode: Mode,
    transcript: String,
    accepted: usize,
    dropped: usize,
    day_plan: Vec<Location>,
    usage: Option<Usage>,
    finish_reason: Option<String>,
}

impl Aggregation {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            transcript: String::new(),
            accepted: 0,
            dropped: 0,
            day_plan: Vec::new(),
            usage: None,
            finish_reason: None,
        }
    }

    /// Apply one chunk to the store. Malformed calls are skipped; map
    /// failures abort.
    fn apply<M: MapSurface>(&mut self, chunk: Chunk, store: &mut OverlayStore<M>) -> Result<()> {
        for call in &chunk.calls {
            match GeoCall::decode(call) {
                Ok(GeoCall::Location(location)) => {
                    let joins_plan = self.mode.is_itinerary_stop(&location);
                    tracing::debug!(
                        name = %location.name,
                        lat = location.position.lat,
                        lng = location.position.lng,
                        itinerary = joins_plan,
                        "location accepted"
                    );
                    let stop = joins_plan.then(|| location.clone());
                    store.add_location(location, self.mode)?;
                    self.day_plan.extend(stop);
                    self.accepted += 1;
                }
                Ok(GeoCall::Line(route)) => {
                    tracing::debug!(name = %route.name, "line accepted");
                    store.add_route(route, self.mode)?;
                    self.accepted += 1;
                }
                Err(DecodeError::UnknownCall(name)) => {
                    tracing::debug!(call = %name, "ignoring unknown structured call");
                }
                Err(e) => {
                    self.dropped += 1;
                    tracing::warn!(
                        call = %call.tool_name,
                        call_id = %call.call_id,
                        error = %e,
                        "dropping malformed structured call"
                    );
                }
            }
        }

        if let Some(text) = chunk.text {
            self.transcript.push_str(&text);
        }
        if chunk.usage.is_some() {
            self.usage = chunk.usage;
        }
        if chunk.finish_reason.is_some() {
            self.finish_reason = chunk.finish_reason;
        }
        Ok(())
    }
}

/// Drives map queries against one model provider and one overlay store.
///
/// One query is meant to be active at a time; starting another implicitly
/// supersedes the one in flight.
pub struct Explorer<M: MapSurface> {
    provider: Arc<dyn LlmProvider>,
    settings: ExplorerConfig,
    state: Mutex<ExplorerState<M>>,
}

impl<M: MapSurface> Explorer<M> {
    pub fn new(provider: Arc<dyn LlmProvider>, map: M, settings: ExplorerConfig) -> Self {
        Self {
            provider,
            settings,
            state: Mutex::new(ExplorerState {
                epoch: 0,
                phase: QueryPhase::Idle,
                store: OverlayStore::new(map),
            }),
        }
    }

    /// Run one query. `is_planner` selects day-planner mode.
    pub async fn run_query(&self, prompt: &str, is_planner: bool) -> Result<QueryResult> {
        self.run_query_in(prompt, Mode::from_planner_flag(is_planner))
            .await
    }

    pub async fn run_query_in(&self, prompt: &str, mode: Mode) -> Result<QueryResult> {
        let epoch = self.begin();
        let span = tracing::info_span!("query", epoch, %mode);
        self.execute(epoch, prompt, mode).instrument(span).await
    }

    /// Clear the map and supersede any query in flight.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.store.reset();
        state.phase = QueryPhase::Idle;
    }

    pub fn phase(&self) -> QueryPhase {
        self.state.lock().phase
    }

    pub fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    /// Inspect the overlay store under its lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&OverlayStore<M>) -> R) -> R {
        f(&self.state.lock().store)
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Take a new epoch and reset the overlay before anything new is drawn.
    fn begin(&self) -> u64 {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.phase = QueryPhase::Resetting;
        state.store.reset();
        state.epoch
    }

    async fn execute(&self, epoch: u64, prompt: &str, mode: Mode) -> Result<QueryResult> {
        let req = ChatRequest {
            messages: vec![
                Message::system(mode.instructions()),
                Message::user(mode.prompt_for(prompt)),
            ],
            tools: schema::tool_definitions(),
            temperature: Some(EXPLORER_TEMPERATURE),
            max_tokens: self.settings.max_output_tokens,
            model: self.settings.model.clone(),
        };

        self.set_phase(epoch, QueryPhase::Streaming)?;
        tracing::debug!(provider = %self.provider.provider_id(), "opening generation stream");

        let mut stream = match self.provider.chat_stream(&req).await {
            Ok(stream) => stream,
            Err(e) => return Err(self.fail(epoch, e)),
        };

        let mut agg = Aggregation::new(mode);
        let mut chunks = 0usize;

        while let Some(item) = stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::warn!(error = %e, chunks, "generation stream failed");
                    return Err(self.fail(epoch, e));
                }
            };
            chunks += 1;
            self.apply_chunk(epoch, chunk, &mut agg)?;
        }

        self.finalize(epoch, agg, chunks)
    }

    fn apply_chunk(&self, epoch: u64, chunk: Chunk, agg: &mut Aggregation) -> Result<()> {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            tracing::debug!(current = state.epoch, "query superseded, dropping stream");
            return Err(Error::Superseded { epoch });
        }
        if let Err(e) = agg.apply(chunk, &mut state.store) {
            state.phase = QueryPhase::Failed;
            return Err(e);
        }
        Ok(())
    }

    fn finalize(&self, epoch: u64, agg: Aggregation, chunks: usize) -> Result<QueryResult> {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return Err(Error::Superseded { epoch });
        }
        state.phase = QueryPhase::Finalizing;

        tracing::info!(
            chunks,
            accepted = agg.accepted,
            dropped = agg.dropped,
            transcript_chars = agg.transcript.len(),
            finish_reason = agg.finish_reason.as_deref().unwrap_or("none"),
            prompt_tokens = agg.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = agg.usage.as_ref().map(|u| u.completion_tokens),
            "generation stream finished"
        );

        if agg.accepted == 0 {
            state.phase = QueryPhase::Failed;
            tracing::warn!(transcript = %agg.transcript, "model produced no usable geographic data");
            return Err(Error::NoResults {
                transcript: agg.transcript,
            });
        }

        state.phase = QueryPhase::Succeeded;
        Ok(QueryResult {
            locations: state.store.locations(),
            day_plan: agg.day_plan,
            lines: state.store.routes(),
        })
    }

    fn set_phase(&self, epoch: u64, phase: QueryPhase) -> Result<()> {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return Err(Error::Superseded { epoch });
        }
        state.phase = phase;
        Ok(())
    }

    /// Mark the query failed if it is still current and hand the error back.
    fn fail(&self, epoch: u64, err: Error) -> Error {
        let mut state = self.state.lock();
        if state.epoch == epoch {
            state.phase = QueryPhase::Failed;
        }
        err
    }
}
