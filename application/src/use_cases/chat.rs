//! Single-flight chat streaming against the generation gateway
//!
//! [`SessionManager`] owns the one allowed in-flight stream. `try_send`
//! resolves the prompt templates, spawns a worker that drains the gateway's
//! stream handle, and rejects overlapping sends; `cancel_active` aborts the
//! worker through its cancellation token without blocking. Every observable
//! effect of the worker crosses the [`UiEvent`] channel, so the coordinator
//! applies deltas in arrival order, exactly once.

use crate::ports::generation_gateway::{GenerationGateway, GenerationRequest};
use crate::ports::ui_event::UiEvent;
use glyphcast_domain::prompt::template::{self, CURRENT_YEAR, Substitutions, USER_QUERY};
use glyphcast_domain::{Model, SessionState, StreamEvent};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Synchronous rejections from [`SessionManager::try_send`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// A stream is already in flight; the existing session is left running.
    #[error("A response is already streaming")]
    SessionBusy,

    /// The user message was empty or whitespace. Rejected before any I/O.
    #[error("No text provided")]
    EmptyInput,
}

/// The system and user prompt templates a session resolves at send time.
#[derive(Debug, Clone)]
pub struct ChatTemplates {
    pub system: String,
    pub user: String,
}

impl Default for ChatTemplates {
    fn default() -> Self {
        Self {
            system: template::default_system_template().to_string(),
            user: template::default_user_template().to_string(),
        }
    }
}

struct ActiveSession {
    state: watch::Receiver<SessionState>,
    cancel: CancellationToken,
    #[allow(dead_code)]
    worker: JoinHandle<()>,
}

impl ActiveSession {
    fn state(&self) -> SessionState {
        *self.state.borrow()
    }
}

/// Holds at most one active streaming session.
///
/// The slot is released by the worker's terminal transition: `try_send`
/// re-checks the stored session's state, so a terminal session never blocks
/// the next send.
pub struct SessionManager<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
    events: mpsc::UnboundedSender<UiEvent>,
    templates: ChatTemplates,
    active: Option<ActiveSession>,
}

impl<G: GenerationGateway + 'static> SessionManager<G> {
    pub fn new(gateway: Arc<G>, events: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self::with_templates(gateway, events, ChatTemplates::default())
    }

    pub fn with_templates(
        gateway: Arc<G>,
        events: mpsc::UnboundedSender<UiEvent>,
        templates: ChatTemplates,
    ) -> Self {
        Self {
            gateway,
            events,
            templates,
            active: None,
        }
    }

    /// Start a streaming exchange, unless one is already in flight.
    ///
    /// Rejects empty input and overlapping sends synchronously, with no
    /// side effects. On success the worker runs until its session reaches a
    /// terminal state.
    pub fn try_send(&mut self, model: Model, user_message: &str) -> Result<(), SendError> {
        if user_message.trim().is_empty() {
            return Err(SendError::EmptyInput);
        }
        if let Some(active) = &self.active {
            if !active.state().is_terminal() {
                return Err(SendError::SessionBusy);
            }
        }

        let year = chrono::Local::now().format("%Y").to_string();
        let subs = Substitutions::new()
            .set(USER_QUERY, user_message)
            .set(CURRENT_YEAR, year);
        let request = GenerationRequest {
            model,
            prompt: template::resolve(&self.templates.user, &subs),
            system: template::resolve(&self.templates.system, &subs),
        };

        debug!(model = %request.model, "opening generation stream");

        let (state_tx, state_rx) = watch::channel(SessionState::Sending);
        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_session(
            Arc::clone(&self.gateway),
            request,
            state_tx,
            cancel.clone(),
            self.events.clone(),
        ));

        self.active = Some(ActiveSession {
            state: state_rx,
            cancel,
            worker,
        });
        Ok(())
    }

    /// Cancel the in-flight stream. A no-op when nothing is active.
    pub fn cancel_active(&self) {
        if let Some(active) = &self.active {
            if !active.state().is_terminal() {
                debug!("cancelling active stream");
                active.cancel.cancel();
            }
        }
    }

    /// Current lifecycle state; `Idle` when no session has been started or
    /// the last one's slot has been reused.
    pub fn state(&self) -> SessionState {
        self.active
            .as_ref()
            .map(ActiveSession::state)
            .unwrap_or(SessionState::Idle)
    }

    /// Whether a stream is currently in flight.
    pub fn is_streaming(&self) -> bool {
        !self.state().is_terminal() && self.state() != SessionState::Idle
    }
}

impl<G: GenerationGateway + 'static> Drop for SessionManager<G> {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

/// Drive one session from request open to terminal state.
///
/// State is published before the matching event is sent, so a coordinator
/// that has seen the terminal event always observes a terminal state.
async fn run_session<G: GenerationGateway>(
    gateway: Arc<G>,
    request: GenerationRequest,
    state: watch::Sender<SessionState>,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<UiEvent>,
) {
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            state.send_replace(SessionState::Cancelled);
            let _ = events.send(UiEvent::ChatCancelled);
            return;
        }
        opened = gateway.stream_generate(request, cancel.child_token()) => opened,
    };

    let mut handle = match opened {
        Ok(handle) => handle,
        Err(e) => {
            state.send_replace(SessionState::Failed);
            let _ = events.send(UiEvent::ChatError {
                message: e.to_string(),
            });
            return;
        }
    };

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                state.send_replace(SessionState::Cancelled);
                let _ = events.send(UiEvent::ChatCancelled);
                return;
            }
            event = handle.receiver.recv() => match event {
                Some(StreamEvent::Delta(text)) => {
                    if *state.borrow() == SessionState::Sending {
                        state.send_replace(SessionState::Streaming);
                    }
                    let _ = events.send(UiEvent::ChatDelta(text));
                }
                Some(StreamEvent::Malformed(reason)) => {
                    let _ = events.send(UiEvent::ChunkSkipped { reason });
                }
                Some(StreamEvent::Done) | None => {
                    state.send_replace(SessionState::Completed);
                    let _ = events.send(UiEvent::ChatDone);
                    return;
                }
                Some(StreamEvent::Error(message)) => {
                    state.send_replace(SessionState::Failed);
                    let _ = events.send(UiEvent::ChatError { message });
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation_gateway::{GatewayError, StreamHandle};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Gateway that replays a scripted event sequence, optionally pacing
    /// the events so a test can act mid-stream.
    struct ScriptedGateway {
        script: Vec<StreamEvent>,
        pace: Option<Duration>,
        fail_connect: bool,
        opened: AtomicUsize,
        last_request: Mutex<Option<GenerationRequest>>,
    }

    impl ScriptedGateway {
        fn new(script: Vec<StreamEvent>) -> Self {
            Self {
                script,
                pace: None,
                fail_connect: false,
                opened: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn paced(mut self, pace: Duration) -> Self {
            self.pace = Some(pace);
            self
        }

        fn unreachable() -> Self {
            let mut gateway = Self::new(vec![]);
            gateway.fail_connect = true;
            gateway
        }
    }

    #[async_trait]
    impl GenerationGateway for ScriptedGateway {
        async fn list_models(&self) -> Result<Vec<Model>, GatewayError> {
            Ok(vec![Model::new("stub")])
        }

        async fn stream_generate(
            &self,
            request: GenerationRequest,
            cancel: CancellationToken,
        ) -> Result<StreamHandle, GatewayError> {
            if self.fail_connect {
                return Err(GatewayError::TransportUnavailable(
                    "connection refused".to_string(),
                ));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);

            let (tx, rx) = mpsc::channel(8);
            let script = self.script.clone();
            let pace = self.pace;
            tokio::spawn(async move {
                for event in script {
                    if let Some(pace) = pace {
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            _ = tokio::time::sleep(pace) => {}
                        }
                    }
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            });
            Ok(StreamHandle::new(rx))
        }
    }

    fn manager_with(
        gateway: ScriptedGateway,
    ) -> (
        SessionManager<ScriptedGateway>,
        mpsc::UnboundedReceiver<UiEvent>,
        Arc<ScriptedGateway>,
    ) {
        let gateway = Arc::new(gateway);
        let (tx, rx) = mpsc::unbounded_channel();
        (
            SessionManager::new(Arc::clone(&gateway), tx),
            rx,
            gateway,
        )
    }

    async fn drain_until_terminal(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            let terminal = matches!(
                event,
                UiEvent::ChatDone | UiEvent::ChatCancelled | UiEvent::ChatError { .. }
            );
            seen.push(event);
            if terminal {
                break;
            }
        }
        seen
    }

    #[tokio::test]
    async fn deltas_forwarded_in_order_then_done_once() {
        let (mut manager, mut rx, _) = manager_with(ScriptedGateway::new(vec![
            StreamEvent::Delta("Hel".to_string()),
            StreamEvent::Delta("lo".to_string()),
            StreamEvent::Done,
        ]));

        manager.try_send(Model::new("stub"), "hi").unwrap();
        let events = drain_until_terminal(&mut rx).await;

        assert_eq!(
            events,
            vec![
                UiEvent::ChatDelta("Hel".to_string()),
                UiEvent::ChatDelta("lo".to_string()),
                UiEvent::ChatDone,
            ]
        );
        assert_eq!(manager.state(), SessionState::Completed);
    }

    #[tokio::test]
    async fn overlapping_send_is_rejected_without_side_effects() {
        let (mut manager, mut rx, gateway) = manager_with(ScriptedGateway::new(vec![
            StreamEvent::Delta("a".to_string()),
            StreamEvent::Done,
        ]));

        manager.try_send(Model::new("stub"), "first").unwrap();
        assert_eq!(
            manager.try_send(Model::new("stub"), "second"),
            Err(SendError::SessionBusy)
        );

        let events = drain_until_terminal(&mut rx).await;
        assert_eq!(events.last(), Some(&UiEvent::ChatDone));
        // Exactly one stream was opened; the slot frees up afterwards.
        assert_eq!(gateway.opened.load(Ordering::SeqCst), 1);
        manager.try_send(Model::new("stub"), "third").unwrap();
        assert_eq!(gateway.opened.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_input_rejected_before_any_io() {
        let (mut manager, _rx, gateway) = manager_with(ScriptedGateway::new(vec![]));

        assert_eq!(
            manager.try_send(Model::new("stub"), "   "),
            Err(SendError::EmptyInput)
        );
        assert_eq!(gateway.opened.load(Ordering::SeqCst), 0);
        assert_eq!(manager.state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_stream_stops_deltas_with_single_terminal() {
        let (mut manager, mut rx, _) = manager_with(
            ScriptedGateway::new(vec![
                StreamEvent::Delta("one".to_string()),
                StreamEvent::Delta("two".to_string()),
                StreamEvent::Delta("three".to_string()),
                StreamEvent::Done,
            ])
            .paced(Duration::from_millis(100)),
        );

        manager.try_send(Model::new("stub"), "hi").unwrap();
        // Let the first delta through, then cancel.
        assert_eq!(
            rx.recv().await,
            Some(UiEvent::ChatDelta("one".to_string()))
        );
        manager.cancel_active();

        let events = drain_until_terminal(&mut rx).await;
        let cancelled_at = events
            .iter()
            .position(|e| *e == UiEvent::ChatCancelled)
            .expect("stream should end as cancelled");
        assert!(
            events[cancelled_at + 1..]
                .iter()
                .all(|e| !matches!(e, UiEvent::ChatDelta(_))),
            "no deltas may follow the cancel"
        );
        assert_eq!(manager.state(), SessionState::Cancelled);

        // Nothing further arrives once the worker has exited.
        let worker = manager.active.take().unwrap().worker;
        worker.await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_session_and_frees_slot() {
        let (mut manager, mut rx, _) = manager_with(ScriptedGateway::unreachable());

        manager.try_send(Model::new("stub"), "hi").unwrap();
        let events = drain_until_terminal(&mut rx).await;
        assert!(matches!(
            events.last(),
            Some(UiEvent::ChatError { message }) if message.contains("Cannot reach")
        ));
        assert_eq!(manager.state(), SessionState::Failed);

        // Failed is terminal; the next send may proceed.
        manager.try_send(Model::new("stub"), "again").unwrap();
    }

    #[tokio::test]
    async fn malformed_chunks_surface_softly_and_never_fail_the_session() {
        let (mut manager, mut rx, _) = manager_with(ScriptedGateway::new(vec![
            StreamEvent::Delta("ok".to_string()),
            StreamEvent::Malformed("bad line".to_string()),
            StreamEvent::Delta("still ok".to_string()),
            StreamEvent::Done,
        ]));

        manager.try_send(Model::new("stub"), "hi").unwrap();
        let events = drain_until_terminal(&mut rx).await;

        assert_eq!(
            events,
            vec![
                UiEvent::ChatDelta("ok".to_string()),
                UiEvent::ChunkSkipped {
                    reason: "bad line".to_string()
                },
                UiEvent::ChatDelta("still ok".to_string()),
                UiEvent::ChatDone,
            ]
        );
        assert_eq!(manager.state(), SessionState::Completed);
    }

    #[tokio::test]
    async fn stream_of_no_valid_lines_completes_with_empty_output() {
        let (mut manager, mut rx, _) = manager_with(ScriptedGateway::new(vec![
            StreamEvent::Malformed("junk".to_string()),
            StreamEvent::Malformed("more junk".to_string()),
            StreamEvent::Done,
        ]));

        manager.try_send(Model::new("stub"), "hi").unwrap();
        let events = drain_until_terminal(&mut rx).await;
        assert!(events.iter().all(|e| !matches!(e, UiEvent::ChatDelta(_))));
        assert_eq!(manager.state(), SessionState::Completed);
    }

    #[tokio::test]
    async fn templates_resolve_at_send_time() {
        let gateway = Arc::new(ScriptedGateway::new(vec![StreamEvent::Done]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let templates = ChatTemplates {
            system: "Year is {CURRENT_YEAR}.".to_string(),
            user: "Q: {USER_QUERY}".to_string(),
        };
        let mut manager =
            SessionManager::with_templates(Arc::clone(&gateway), tx, templates);

        manager.try_send(Model::new("stub"), "what's new?").unwrap();
        drain_until_terminal(&mut rx).await;

        let request = gateway.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.prompt, "Q: what's new?");
        let year = chrono::Local::now().format("%Y").to_string();
        assert_eq!(request.system, format!("Year is {year}."));
    }

    #[tokio::test]
    async fn cancel_without_active_session_is_a_noop() {
        let (manager, _rx, _) = manager_with(ScriptedGateway::new(vec![]));
        manager.cancel_active();
        assert_eq!(manager.state(), SessionState::Idle);
    }
}
