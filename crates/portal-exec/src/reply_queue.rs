use portal_core::router::ReplyPause;
use portal_core::router::ReplyStep;
use portal_core::RuntimeAction;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::contracts::RuntimeSink;
use crate::contracts::Timings;

#[derive(Debug)]
struct ReplyJob {
    submission: u64,
    submitted_at: Instant,
    steps: Vec<ReplyStep>,
}

/// Single FIFO worker delivering queued replies.
///
/// Each job waits until `submitted_at + thinking pause`; later steps of the
/// same job wait relative to the previous delivery. A job never starts
/// before the one ahead of it has fully delivered, so replies come out in
/// submission order whatever the individual delays are.
#[derive(Debug)]
pub struct ReplyQueue {
    jobs: mpsc::UnboundedSender<ReplyJob>,
    token: CancellationToken,
}

impl ReplyQueue {
    /// Spawns the worker onto the current tokio runtime.
    pub fn spawn(timings: Timings, sink: RuntimeSink, token: CancellationToken) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx, timings, sink, token.clone()));
        Self { jobs, token }
    }

    pub fn enqueue(&self, submission: u64, steps: Vec<ReplyStep>) {
        let job = ReplyJob {
            submission,
            submitted_at: Instant::now(),
            steps,
        };
        if self.jobs.send(job).is_err() {
            tracing::debug!(submission, "reply worker gone, dropping reply");
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for ReplyQueue {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<ReplyJob>,
    timings: Timings,
    sink: RuntimeSink,
    token: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            _ = token.cancelled() => break,
            job = rx.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        let count = job.steps.len();
        for (idx, step) in job.steps.into_iter().enumerate() {
            let deadline = match step.pause {
                ReplyPause::Thinking => job.submitted_at + timings.pause(step.pause),
                ReplyPause::Canvas => Instant::now() + timings.pause(step.pause),
            };
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(submission = job.submission, "reply cancelled");
                    return;
                }
                _ = tokio::time::sleep_until(deadline) => {}
            }
            let action = RuntimeAction::DeliverReply {
                submission: job.submission,
                step,
                last: idx + 1 == count,
            };
            if sink.send(action).is_err() {
                tracing::debug!(submission = job.submission, "session closed before reply");
                return;
            }
        }
    }
    tracing::debug!("reply worker stopped");
}
