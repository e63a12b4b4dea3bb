use std::time::Duration;

use portal_core::config::TimingConfig;
use portal_core::router::ReplyPause;
use portal_core::RuntimeAction;
use tokio::sync::mpsc::UnboundedSender;

/// A timer result tagged with the session generation that scheduled it.
#[derive(Debug)]
pub struct RuntimeEvent {
    pub generation: u64,
    pub action: RuntimeAction,
}

/// Where timers report back. Only the session driver reads the other end.
///
/// Each sink stamps what it sends with its generation, so results queued
/// before a reset can be told apart from the new session's.
#[derive(Debug, Clone)]
pub struct RuntimeSink {
    tx: UnboundedSender<RuntimeEvent>,
    generation: u64,
}

impl RuntimeSink {
    pub fn new(tx: UnboundedSender<RuntimeEvent>, generation: u64) -> Self {
        Self { tx, generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Same channel, next generation.
    pub fn next_generation(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            generation: self.generation + 1,
        }
    }

    /// Hands the action back if the receiving side is gone.
    pub fn send(&self, action: RuntimeAction) -> Result<(), RuntimeAction> {
        self.tx
            .send(RuntimeEvent {
                generation: self.generation,
                action,
            })
            .map_err(|err| err.0.action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub reply: Duration,
    pub canvas: Duration,
    pub analysis: Duration,
    pub typewriter_tick: Duration,
    pub canvas_stages: [Duration; 3],
}

impl Timings {
    pub fn pause(&self, pause: ReplyPause) -> Duration {
        match pause {
            ReplyPause::Thinking => self.reply,
            ReplyPause::Canvas => self.canvas,
        }
    }
}

impl From<&TimingConfig> for Timings {
    fn from(config: &TimingConfig) -> Self {
        Self {
            reply: config.reply_delay(),
            canvas: config.canvas_delay(),
            analysis: config.analysis_delay(),
            typewriter_tick: config.typewriter_tick(),
            canvas_stages: config.canvas_stage_gaps(),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}
