use serde::Deserialize;
use serde::Serialize;

use super::workflow::ApplicationTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

impl StepStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Current => "current",
            Self::Upcoming => "upcoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStep {
    pub title: String,
    pub status: StepStatus,
}

/// Reported while the first step is still open and nothing is completed.
pub const PROGRESS_FLOOR_PERCENT: u8 = 10;

/// Step tracker for a multi-step application.
///
/// At most one step is `Current`; everything before it is `Completed` and
/// everything after it `Upcoming`. Zero current steps only happens after
/// [`ApplicationProgress::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationProgress {
    steps: Vec<ApplicationStep>,
    current: Option<usize>,
}

impl ApplicationProgress {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<ApplicationStep> = titles
            .into_iter()
            .map(|title| ApplicationStep {
                title: title.into(),
                status: StepStatus::Upcoming,
            })
            .collect();
        let mut progress = Self {
            steps,
            current: None,
        };
        progress.advance(0);
        progress
    }

    pub fn from_template(template: &ApplicationTemplate) -> Self {
        Self::new(template.steps.iter().copied())
    }

    pub fn steps(&self) -> &[ApplicationStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_step(&self) -> Option<&ApplicationStep> {
        self.current.and_then(|idx| self.steps.get(idx))
    }

    pub fn is_finished(&self) -> bool {
        !self.steps.is_empty() && self.current.is_none()
    }

    /// Jump to `target`. Any step may be targeted from any other; skipped
    /// steps are marked completed. Out-of-range targets clamp to the last step.
    /// Returns the index that became current.
    pub fn advance(&mut self, target: usize) -> Option<usize> {
        if self.steps.is_empty() {
            return None;
        }
        let target = target.min(self.steps.len() - 1);
        for (idx, step) in self.steps.iter_mut().enumerate() {
            step.status = match idx.cmp(&target) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Current,
                std::cmp::Ordering::Greater => StepStatus::Upcoming,
            };
        }
        let previous = self.current.replace(target);
        if previous != Some(target) {
            tracing::info!(
                from = ?previous,
                to = target,
                step = %self.steps[target].title,
                "application step advanced"
            );
        }
        Some(target)
    }

    pub fn finish(&mut self) {
        for step in &mut self.steps {
            step.status = StepStatus::Completed;
        }
        self.current = None;
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count()
    }

    pub fn percent_complete(&self) -> u8 {
        if self.steps.is_empty() {
            return 0;
        }
        if self.is_finished() {
            return 100;
        }
        let completed = self.completed_count();
        if completed == 0 {
            return PROGRESS_FLOOR_PERCENT;
        }
        ((completed * 100) / self.steps.len()) as u8
    }
}
