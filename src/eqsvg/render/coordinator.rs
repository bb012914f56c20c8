//! Render coordination
//!
//!     The coordinator feeds parsed equations to a single shared engine and reports one
//!     [RenderEvent] per equation as each completes. Completions arrive in any order.
//!
//! Batches
//!
//!     Every submission becomes a batch tagged with a [BatchToken]. The batch carries its
//!     own frontmatter and equations, so color post-processing always uses the context of
//!     the submission that produced the request. On completion the token is compared with
//!     the latest submitted one: results of superseded batches are discarded instead of
//!     being reported against the newer document.
//!
//! Readiness
//!
//!     Submissions made before the engine is ready are queued. [RenderCoordinator::mark_ready]
//!     flushes the queue once, in submission order. Dispatch happens under the state lock,
//!     so a submission racing with the flush cannot overtake queued batches.
//!
//!     Failures are per equation and never abort sibling equations; there is no retry.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

use super::engine::{RenderRequest, RenderResponse, TypesetEngine};
use super::prepare_for_engine;
use crate::eqsvg::color::apply_svg_color;
use crate::eqsvg::document::{effective_color, DisplayMode, Equation, EquationId, Frontmatter, ParsedDocument};

/// Identifies one submission. Later submissions have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchToken(u64);

impl BatchToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// Engine output with colors applied.
    Rendered {
        batch: BatchToken,
        id: EquationId,
        svg: String,
    },
    Failed {
        batch: BatchToken,
        id: EquationId,
        error: String,
    },
}

impl RenderEvent {
    pub fn batch(&self) -> BatchToken {
        match self {
            RenderEvent::Rendered { batch, .. } | RenderEvent::Failed { batch, .. } => *batch,
        }
    }

    pub fn id(&self) -> &EquationId {
        match self {
            RenderEvent::Rendered { id, .. } | RenderEvent::Failed { id, .. } => id,
        }
    }
}

#[derive(Debug)]
struct Batch {
    token: BatchToken,
    frontmatter: Frontmatter,
    equations: Vec<Equation>,
    display_mode: DisplayMode,
}

#[derive(Debug, Default)]
struct CoordinatorState {
    ready: bool,
    next_token: u64,
    latest: Option<BatchToken>,
    pending: VecDeque<Arc<Batch>>,
}

pub struct RenderCoordinator<E: TypesetEngine> {
    engine: Arc<E>,
    state: Arc<Mutex<CoordinatorState>>,
    events: mpsc::UnboundedSender<RenderEvent>,
    display_mode: DisplayMode,
}

impl<E: TypesetEngine> Clone for RenderCoordinator<E> {
    fn clone(&self) -> Self {
        RenderCoordinator {
            engine: Arc::clone(&self.engine),
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            display_mode: self.display_mode,
        }
    }
}

impl<E: TypesetEngine> RenderCoordinator<E> {
    /// A coordinator whose engine is not ready yet. Call [Self::mark_ready] to start.
    pub fn new(engine: E, display_mode: DisplayMode) -> (Self, mpsc::UnboundedReceiver<RenderEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let coordinator = RenderCoordinator {
            engine: Arc::new(engine),
            state: Arc::new(Mutex::new(CoordinatorState::default())),
            events,
            display_mode,
        };
        (coordinator, receiver)
    }

    /// Like [Self::new], but marks itself ready once the engine's `ready` future resolves.
    /// Must be called inside a tokio runtime.
    pub fn launch(engine: E, display_mode: DisplayMode) -> (Self, mpsc::UnboundedReceiver<RenderEvent>) {
        let (coordinator, receiver) = Self::new(engine, display_mode);
        let watcher = coordinator.clone();
        tokio::spawn(async move {
            watcher.engine.ready().await;
            watcher.mark_ready();
        });
        (coordinator, receiver)
    }

    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    pub fn latest(&self) -> Option<BatchToken> {
        self.lock().latest
    }

    /// Number of batches waiting for the engine.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Submit a document. Replaces whatever batch was current.
    pub fn submit(&self, document: &ParsedDocument) -> BatchToken {
        let mut state = self.lock();
        let token = BatchToken(state.next_token);
        state.next_token += 1;
        state.latest = Some(token);

        let batch = Arc::new(Batch {
            token,
            frontmatter: document.frontmatter.clone(),
            equations: document.equations.clone(),
            display_mode: self.display_mode,
        });

        if state.ready {
            self.dispatch(batch);
        } else {
            tracing::debug!(batch = token.0, "engine not ready, queueing batch");
            state.pending.push_back(batch);
        }
        token
    }

    /// Signal engine readiness and flush queued batches in submission order.
    pub fn mark_ready(&self) {
        let mut state = self.lock();
        if state.ready {
            return;
        }
        state.ready = true;
        while let Some(batch) = state.pending.pop_front() {
            self.dispatch(batch);
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, batch: Arc<Batch>) {
        tracing::debug!(
            batch = batch.token.0,
            equations = batch.equations.len(),
            "dispatching batch"
        );
        for index in 0..batch.equations.len() {
            let engine = Arc::clone(&self.engine);
            let state = Arc::clone(&self.state);
            let events = self.events.clone();
            let batch = Arc::clone(&batch);
            tokio::spawn(async move {
                let event = render_equation(engine.as_ref(), &batch, index).await;
                let latest = state.lock().unwrap_or_else(PoisonError::into_inner).latest;
                if latest != Some(batch.token) {
                    tracing::debug!(
                        batch = batch.token.0,
                        id = %event.id(),
                        "discarding result of superseded batch"
                    );
                    return;
                }
                if events.send(event).is_err() {
                    tracing::debug!("render event receiver dropped");
                }
            });
        }
    }
}

async fn render_equation<E: TypesetEngine>(engine: &E, batch: &Batch, index: usize) -> RenderEvent {
    let equation = &batch.equations[index];
    let request = RenderRequest {
        id: equation.id.to_string(),
        latex: prepare_for_engine(&equation.latex),
        display_mode: batch.display_mode,
    };

    match engine.render(request).await {
        RenderResponse::Success { svg, .. } => {
            let svg = match effective_color(&batch.frontmatter, equation) {
                Some(color) => apply_svg_color(&svg, color),
                None => svg,
            };
            RenderEvent::Rendered {
                batch: batch.token,
                id: equation.id.clone(),
                svg,
            }
        }
        RenderResponse::Failure { error, .. } => {
            tracing::warn!(id = %equation.id, label = %equation.label, %error, "equation failed to render");
            RenderEvent::Failed {
                batch: batch.token,
                id: equation.id.clone(),
                error,
            }
        }
    }
}

/// Render every equation of a document and wait for all results.
///
/// Events come back in completion order.
pub async fn render_document<E: TypesetEngine>(
    engine: E,
    document: &ParsedDocument,
    display_mode: DisplayMode,
) -> Vec<RenderEvent> {
    let (coordinator, mut receiver) = RenderCoordinator::new(engine, display_mode);
    coordinator.mark_ready();
    let token = coordinator.submit(document);
    drop(coordinator);

    let mut events = Vec::with_capacity(document.equations.len());
    while events.len() < document.equations.len() {
        match receiver.recv().await {
            Some(event) if event.batch() == token => events.push(event),
            Some(_) => continue,
            None => break,
        }
    }
    events
}
