//! Rule-based intent router shared by the chat page and the dashboard box.
//!
//! Input is lower-cased once and checked against [`INTENT_RULES`] top to
//! bottom; the first rule whose predicate matches wins and anything else
//! falls through to [`Intent::Fallback`]. Routing never fails.

use super::chat::MessageContent;
use super::panels::ApplicationCanvas;
use super::panels::ContinueForm;
use super::panels::EsgScoreCard;
use super::panels::Panel;
use super::panels::ReportSummary;
use super::state::SessionState;
use super::suggestions::post_prefill_chips;
use super::suggestions::SuggestionChip;
use super::workflow::STEP_DOCUMENTS;

pub const PREFILL_ACK: &str =
    "Based on your business profile and our previous chats, I've prefilled your application below.";
pub const DIVERSITY_DRAFT: &str = "Our diversity metrics show 45% female leadership, 12 nationalities represented, and 3 accessibility programs";
pub const DIVERSITY_ACK: &str = "I've analyzed your workforce data and generated diversity metrics. Press enter to submit or edit as needed.";
pub const FALLBACK_REPLY: &str =
    "I can help you with that. Try asking me to 'Prefill this application' or check your ESG score.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Prefill,
    ContinueSession,
    EsgScore,
    DiversityDraft,
    SustainabilityReport,
    Fallback,
}

impl Intent {
    pub fn label(self) -> &'static str {
        match self {
            Self::Prefill => "prefill",
            Self::ContinueSession => "continue_session",
            Self::EsgScore => "esg_score",
            Self::DiversityDraft => "diversity_draft",
            Self::SustainabilityReport => "sustainability_report",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    /// Receives the already lower-cased input.
    pub matches: fn(&str) -> bool,
}

fn mentions_prefill(text: &str) -> bool {
    text.contains("prefill")
}

fn mentions_resume(text: &str) -> bool {
    text.contains("continue where we left off")
}

fn mentions_score(text: &str) -> bool {
    text.contains("score")
}

fn mentions_diversity(text: &str) -> bool {
    text.contains("diversity")
}

fn mentions_report(text: &str) -> bool {
    text.contains("sustainability report")
}

pub const INTENT_RULES: [IntentRule; 5] = [
    IntentRule {
        intent: Intent::Prefill,
        matches: mentions_prefill,
    },
    IntentRule {
        intent: Intent::ContinueSession,
        matches: mentions_resume,
    },
    IntentRule {
        intent: Intent::EsgScore,
        matches: mentions_score,
    },
    IntentRule {
        intent: Intent::DiversityDraft,
        matches: mentions_diversity,
    },
    IntentRule {
        intent: Intent::SustainabilityReport,
        matches: mentions_report,
    },
];

pub fn classify(input: &str) -> Intent {
    let lowered = input.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|rule| (rule.matches)(lowered.as_str()))
        .map_or(Intent::Fallback, |rule| rule.intent)
}

/// Which configured pause precedes a reply step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPause {
    /// Measured from submission.
    Thinking,
    /// Measured from the previous step of the same reply.
    Canvas,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    AdvanceTo(usize),
    /// Replaces the input box contents without sending.
    SetDraft(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyStep {
    pub pause: ReplyPause,
    pub content: MessageContent,
    pub suggestions: Option<Vec<SuggestionChip>>,
    pub effects: Vec<SessionEffect>,
}

impl ReplyStep {
    fn after_thinking(content: MessageContent) -> Self {
        Self {
            pause: ReplyPause::Thinking,
            content,
            suggestions: None,
            effects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    pub intent: Intent,
    pub steps: Vec<ReplyStep>,
}

impl RouteOutcome {
    /// Chip set the session ends up with once every step is delivered.
    pub fn suggestions(&self) -> Option<&[SuggestionChip]> {
        self.steps
            .iter()
            .rev()
            .find_map(|step| step.suggestions.as_deref())
    }

    pub fn effects(&self) -> impl Iterator<Item = &SessionEffect> {
        self.steps.iter().flat_map(|step| step.effects.iter())
    }
}

pub fn route(input: &str, session: &SessionState) -> RouteOutcome {
    let intent = classify(input);
    tracing::debug!(intent = intent.label(), "routed chat input");

    let steps = match intent {
        Intent::Prefill => vec![
            ReplyStep {
                pause: ReplyPause::Thinking,
                content: MessageContent::text(PREFILL_ACK),
                suggestions: None,
                effects: vec![SessionEffect::AdvanceTo(STEP_DOCUMENTS)],
            },
            ReplyStep {
                pause: ReplyPause::Canvas,
                content: MessageContent::Panel(Panel::ApplicationCanvas(
                    ApplicationCanvas::prefilled(session.profile.clone()),
                )),
                suggestions: Some(post_prefill_chips()),
                effects: Vec::new(),
            },
        ],
        Intent::ContinueSession => vec![ReplyStep::after_thinking(MessageContent::Panel(
            Panel::ContinueForm(ContinueForm::applicant_details()),
        ))],
        Intent::EsgScore => vec![ReplyStep::after_thinking(MessageContent::Panel(
            Panel::EsgScore(EsgScoreCard::projected()),
        ))],
        Intent::DiversityDraft => vec![ReplyStep {
            pause: ReplyPause::Thinking,
            content: MessageContent::text(DIVERSITY_ACK),
            suggestions: None,
            effects: vec![SessionEffect::SetDraft(DIVERSITY_DRAFT.to_string())],
        }],
        Intent::SustainabilityReport => vec![ReplyStep::after_thinking(MessageContent::Panel(
            Panel::SustainabilityReport(ReportSummary::sustainability_2024()),
        ))],
        Intent::Fallback => vec![ReplyStep::after_thinking(MessageContent::text(
            FALLBACK_REPLY,
        ))],
    };

    RouteOutcome { intent, steps }
}
