use serde::Deserialize;
use serde::Serialize;

/// Text sent by the "continue" chip, whatever its label says.
pub const RESUME_PROMPT: &str = "Continue where we left off";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipKind {
    /// Sends its own title.
    Prefill,
    /// Sends [`RESUME_PROMPT`].
    Resume,
    /// Shown greyed out; not wired to anything.
    Inert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionChip {
    pub title: String,
    pub description: String,
    pub kind: ChipKind,
}

impl SuggestionChip {
    /// Only prefill chips are live; everything else is greyed.
    pub fn new(title: &str, description: &str) -> Self {
        let kind = if title.contains("Prefill") {
            ChipKind::Prefill
        } else {
            ChipKind::Inert
        };
        Self {
            title: title.to_string(),
            description: description.to_string(),
            kind,
        }
    }

    pub fn resume() -> Self {
        Self {
            title: format!("→ {RESUME_PROMPT}"),
            description: String::new(),
            kind: ChipKind::Resume,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.kind != ChipKind::Inert
    }

    pub fn send_text(&self) -> Option<&str> {
        match self.kind {
            ChipKind::Prefill => Some(self.title.as_str()),
            ChipKind::Resume => Some(RESUME_PROMPT),
            ChipKind::Inert => None,
        }
    }
}

pub fn default_chips(renewal: bool) -> Vec<SuggestionChip> {
    if renewal {
        vec![
            SuggestionChip::new("Prefill from Last Year", "Use previous data"),
            SuggestionChip::new("What's Changed", "View new requirements"),
            SuggestionChip::new("Review Score", "Previous ESG rating"),
            SuggestionChip::resume(),
        ]
    } else {
        vec![
            SuggestionChip::new("Prefill Application", "Auto-complete with AI"),
            SuggestionChip::new("View ESG Score", "Calculate current rating"),
            SuggestionChip::new("Generate Report", "Create sustainability docs"),
            SuggestionChip::resume(),
        ]
    }
}

pub fn post_prefill_chips() -> Vec<SuggestionChip> {
    vec![
        SuggestionChip::new("Upload Required Documents", "Add ESG policies & reports"),
        SuggestionChip::new("Calculate ESG Score", "View your rating"),
        SuggestionChip::new("Get AI Recommendations", "Improve your score"),
        SuggestionChip::new("Submit Application", "Final submission"),
    ]
}

pub fn chip_titles(chips: &[SuggestionChip]) -> Vec<&str> {
    chips.iter().map(|chip| chip.title.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn renewal_swaps_the_default_set() {
        assert_eq!(
            chip_titles(&default_chips(true)),
            vec![
                "Prefill from Last Year",
                "What's Changed",
                "Review Score",
                "→ Continue where we left off",
            ]
        );
        assert_eq!(chip_titles(&default_chips(false))[0], "Prefill Application");
    }

    #[test]
    fn only_prefill_and_resume_chips_send_text() {
        let chips = default_chips(false);
        assert_eq!(chips[0].send_text(), Some("Prefill Application"));
        assert_eq!(chips[1].send_text(), None);
        assert_eq!(chips[2].send_text(), None);
        assert_eq!(chips[3].send_text(), Some(RESUME_PROMPT));
    }

    #[test]
    fn post_prefill_chips_are_all_inert() {
        assert!(post_prefill_chips().iter().all(|chip| !chip.is_enabled()));
    }
}
