use portal_core::PortalAction;
use portal_core::PortalEffect;
use portal_core::RuntimeAction;
use portal_core::SessionOptions;
use portal_core::SessionState;
use portal_core::TranscriptStore;
use portal_core::UserAction;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::contracts::RuntimeEvent;
use crate::contracts::RuntimeSink;
use crate::contracts::Timings;
use crate::reply_queue::ReplyQueue;
use crate::timers::spawn_canvas_timeline;
use crate::timers::AnalysisTimers;

/// Sole owner of one chat session.
///
/// Timers never see the state: they report through a channel and the driver
/// reduces what they send. Every timer hangs off `root`, so shutting the
/// driver down (or dropping it) silences all of them. Results carry the
/// generation of the sink that scheduled them; anything stamped before the
/// last reset is dropped unread.
pub struct SessionDriver {
    state: SessionState,
    timings: Timings,
    root: CancellationToken,
    /// Child of `root` covering the current session incarnation; replaced on reset.
    generation: CancellationToken,
    replies: ReplyQueue,
    analyses: AnalysisTimers,
    sink: RuntimeSink,
    inbox: mpsc::UnboundedReceiver<RuntimeEvent>,
    journal: Option<TranscriptStore>,
    frame_requested: bool,
}

impl SessionDriver {
    /// Must be called inside a tokio runtime.
    pub fn new(options: SessionOptions, timings: Timings) -> Self {
        let root = CancellationToken::new();
        let generation = root.child_token();
        let (tx, inbox) = mpsc::unbounded_channel();
        let sink = RuntimeSink::new(tx, 0);
        let replies = ReplyQueue::spawn(timings, sink.clone(), generation.child_token());
        Self {
            state: SessionState::new(options),
            timings,
            root,
            generation,
            replies,
            analyses: AnalysisTimers::default(),
            sink,
            inbox,
            journal: None,
            frame_requested: true,
        }
    }

    /// Starts journaling, beginning with the session as it stands.
    pub fn with_journal(mut self, store: TranscriptStore) -> Self {
        tracing::info!(path = %store.path().display(), "transcript journal enabled");
        self.journal = Some(store);
        for event in self.state.opening_events() {
            self.write_journal(event);
        }
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    pub fn dispatch(&mut self, action: UserAction) {
        if self.is_shut_down() {
            return;
        }
        self.apply(PortalAction::User(action));
    }

    /// Waits for the next current-generation timer completion and applies
    /// it. Returns `false` once the driver has been shut down.
    pub async fn next_event(&mut self) -> bool {
        loop {
            let event = tokio::select! {
                _ = self.root.cancelled() => return false,
                event = self.inbox.recv() => event,
            };
            let Some(event) = event else {
                return false;
            };
            if let Some(action) = self.current(event) {
                self.apply(PortalAction::Runtime(action));
                return true;
            }
        }
    }

    /// Applies every timer completion already waiting. Never blocks.
    /// Stale results are discarded and not counted.
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while !self.is_shut_down() {
            let Ok(event) = self.inbox.try_recv() else {
                break;
            };
            if let Some(action) = self.current(event) {
                self.apply(PortalAction::Runtime(action));
                applied += 1;
            }
        }
        applied
    }

    pub fn generation(&self) -> u64 {
        self.sink.generation()
    }

    /// True once per requested redraw.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn shutdown(&mut self) {
        if !self.root.is_cancelled() {
            tracing::info!("session shut down, cancelling pending timers");
        }
        self.root.cancel();
        self.analyses.cancel_all();
    }

    fn current(&self, event: RuntimeEvent) -> Option<RuntimeAction> {
        if event.generation == self.sink.generation() {
            return Some(event.action);
        }
        tracing::debug!(
            stale = event.generation,
            current = self.sink.generation(),
            action = ?event.action,
            "dropping result from before reset"
        );
        None
    }

    fn apply(&mut self, action: PortalAction) {
        if let PortalAction::Runtime(RuntimeAction::ApplyDocumentVerdicts { batch_id }) = &action {
            self.analyses.complete(*batch_id);
        }
        let effects = portal_core::reduce(&mut self.state, action);
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<PortalEffect>) {
        for effect in effects {
            match effect {
                PortalEffect::ScheduleReply { submission, steps } => {
                    self.replies.enqueue(submission, steps);
                }
                PortalEffect::ScheduleCanvas { message_seq } => {
                    spawn_canvas_timeline(
                        message_seq,
                        self.timings.canvas_stages,
                        self.sink.clone(),
                        self.generation.child_token(),
                    );
                }
                PortalEffect::ScheduleAnalysis { batch_id } => {
                    self.analyses.schedule(
                        batch_id,
                        self.timings.analysis,
                        self.sink.clone(),
                        &self.generation,
                    );
                }
                PortalEffect::CancelAnalysis { batch_id } => {
                    self.analyses.cancel(batch_id);
                }
                PortalEffect::CancelPending => self.restart_generation(),
                PortalEffect::Journal(event) => self.write_journal(event),
                PortalEffect::RequestFrame => self.frame_requested = true,
            }
        }
    }

    fn restart_generation(&mut self) {
        self.generation.cancel();
        self.analyses.cancel_all();
        self.generation = self.root.child_token();
        self.sink = self.sink.next_generation();
        self.replies = ReplyQueue::spawn(
            self.timings,
            self.sink.clone(),
            self.generation.child_token(),
        );
        tracing::info!(
            generation = self.sink.generation(),
            "session reset, pending replies cancelled"
        );
    }

    fn write_journal(&mut self, event: portal_core::TranscriptEvent) {
        let Some(store) = self.journal.as_mut() else {
            return;
        };
        if let Err(err) = store.append(event) {
            tracing::warn!(%err, "transcript write failed, journal disabled");
            self.journal = None;
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
