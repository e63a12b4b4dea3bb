use std::collections::HashMap;
use std::time::Duration;

use portal_core::panels::CanvasStage;
use portal_core::RuntimeAction;
use tokio_util::sync::CancellationToken;

use crate::contracts::RuntimeSink;

/// Sleeps for `delay` then sends `action`, unless `token` fires first.
pub fn spawn_after(delay: Duration, action: RuntimeAction, sink: RuntimeSink, token: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(?action, "timer cancelled");
            }
            _ = tokio::time::sleep(delay) => {
                if sink.send(action).is_err() {
                    tracing::debug!("session closed before timer fired");
                }
            }
        }
    });
}

/// Walks one canvas through its loading stages, each gap measured from the
/// previous stage.
pub fn spawn_canvas_timeline(
    message_seq: u64,
    gaps: [Duration; 3],
    sink: RuntimeSink,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        for (stage, gap) in CanvasStage::SEQUENCE.into_iter().zip(gaps) {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(gap) => {}
            }
            if sink
                .send(RuntimeAction::AdvanceCanvas { message_seq, stage })
                .is_err()
            {
                return;
            }
        }
    });
}

/// One cancellable timer per in-flight document batch.
#[derive(Debug, Default)]
pub struct AnalysisTimers {
    timers: HashMap<u64, CancellationToken>,
}

impl AnalysisTimers {
    pub fn schedule(
        &mut self,
        batch_id: u64,
        delay: Duration,
        sink: RuntimeSink,
        parent: &CancellationToken,
    ) {
        let token = parent.child_token();
        spawn_after(
            delay,
            RuntimeAction::ApplyDocumentVerdicts { batch_id },
            sink,
            token.clone(),
        );
        if let Some(previous) = self.timers.insert(batch_id, token) {
            previous.cancel();
        }
        tracing::debug!(batch_id, ?delay, "analysis scheduled");
    }

    pub fn cancel(&mut self, batch_id: u64) -> bool {
        match self.timers.remove(&batch_id) {
            Some(token) => {
                token.cancel();
                tracing::debug!(batch_id, "analysis cancelled");
                true
            }
            None => false,
        }
    }

    /// Forgets a batch whose timer already fired.
    pub fn complete(&mut self, batch_id: u64) {
        self.timers.remove(&batch_id);
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.timers.drain() {
            token.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Drop for AnalysisTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn canvas_stages_arrive_in_order_with_cumulative_gaps() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        spawn_canvas_timeline(
            7,
            [
                Duration::from_millis(500),
                Duration::from_millis(1500),
                Duration::from_millis(1000),
            ],
            RuntimeSink::new(tx, 0),
            CancellationToken::new(),
        );

        let mut stages = Vec::new();
        while let Some(event) = rx.recv().await {
            if let RuntimeAction::AdvanceCanvas { message_seq, stage } = event.action {
                assert_eq!(message_seq, 7);
                stages.push((stage, start.elapsed().as_millis()));
            }
        }
        assert_eq!(
            stages,
            vec![
                (CanvasStage::ApplicantComplete, 500),
                (CanvasStage::EsgComplete, 2000),
                (CanvasStage::DocumentsReady, 3000),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_one_batch_leaves_the_other() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = RuntimeSink::new(tx, 3);
        let root = CancellationToken::new();
        let mut timers = AnalysisTimers::default();
        timers.schedule(1, Duration::from_millis(2000), sink.clone(), &root);
        timers.schedule(2, Duration::from_millis(2000), sink, &root);
        assert!(timers.cancel(1));
        assert!(!timers.cancel(1));

        let event = rx.recv().await.expect("second batch fires");
        assert_eq!(event.generation, 3);
        assert!(matches!(event.action, RuntimeAction::ApplyDocumentVerdicts { batch_id: 2 }));
        timers.complete(2);
        assert!(timers.is_empty());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancellation_stops_every_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let mut timers = AnalysisTimers::default();
        timers.schedule(1, Duration::from_millis(2000), RuntimeSink::new(tx, 0), &root);
        root.cancel();
        assert!(rx.recv().await.is_none());
        assert_eq!(timers.len(), 1);
    }
}
