use std::collections::VecDeque;

use super::chat::MessageContent;
use super::chat::MessageLog;
use super::documents::DocumentTray;
use super::membership::MembershipTier;
use super::panels::ApplicantProfile;
use super::persistence::TranscriptEvent;
use super::progress::ApplicationProgress;
use super::suggestions::default_chips;
use super::suggestions::SuggestionChip;
use super::workflow::application_template;
use super::workflow::ApplicationTemplate;
use super::workflow::ApplicationTemplateId;

pub const GREETING: &str = "Hi! I'm here to help you complete your ESG application. I can prefill forms, calculate scores, and provide AI suggestions.";
pub const RENEWAL_GREETING: &str = "Welcome back! I'll help you renew your ESG certificate.";

/// Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub renewal: bool,
    pub tier: MembershipTier,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            renewal: false,
            tier: MembershipTier::ElitePlus,
        }
    }
}

impl SessionOptions {
    /// Reads `renewal=true` (and optionally `tier=`) from a URL-style query.
    /// Anything else keeps the default.
    pub fn from_query(query: &str) -> Self {
        let mut options = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "renewal" => options.renewal = value == "true",
                "tier" => {
                    if let Some(tier) = MembershipTier::parse(value) {
                        options.tier = tier;
                    }
                }
                _ => {}
            }
        }
        options
    }

    pub fn greeting(&self) -> &'static str {
        if self.renewal {
            RENEWAL_GREETING
        } else {
            GREETING
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub options: SessionOptions,
    pub template: &'static ApplicationTemplate,
    pub progress: ApplicationProgress,
    pub messages: MessageLog,
    pub suggestions: Vec<SuggestionChip>,
    /// Contents of the input box.
    pub draft: String,
    pub documents: DocumentTray,
    pub profile: ApplicantProfile,
    /// Submissions whose replies have not finished, oldest first.
    pub pending_submissions: VecDeque<u64>,
    next_submission: u64,
}

impl SessionState {
    pub fn new(options: SessionOptions) -> Self {
        let template = application_template(ApplicationTemplateId::for_renewal(options.renewal));
        let mut messages = MessageLog::new();
        messages.push_assistant(MessageContent::text(options.greeting()));
        Self {
            options,
            template,
            progress: ApplicationProgress::from_template(template),
            messages,
            suggestions: default_chips(options.renewal),
            draft: String::new(),
            documents: DocumentTray::new(),
            profile: ApplicantProfile::default(),
            pending_submissions: VecDeque::new(),
            next_submission: 1,
        }
    }

    /// Fresh session with the same options. Submission ids keep counting so
    /// late replies addressed to the old session are recognised as stale.
    pub fn reset(&mut self) {
        let next_submission = self.next_submission;
        *self = Self::new(self.options);
        self.next_submission = next_submission;
    }

    pub(crate) fn allocate_submission(&mut self) -> u64 {
        let id = self.next_submission;
        self.next_submission = self.next_submission.saturating_add(1);
        self.pending_submissions.push_back(id);
        id
    }

    pub fn is_awaiting_reply(&self) -> bool {
        !self.pending_submissions.is_empty()
    }

    /// Journal entries describing the session as constructed.
    pub fn opening_events(&self) -> Vec<TranscriptEvent> {
        let mut events = vec![TranscriptEvent::SessionStarted {
            renewal: self.options.renewal,
            tier: self.options.tier.label().to_string(),
            template_id: self.template.id.as_str().to_string(),
        }];
        events.extend(self.messages.iter().map(|message| {
            TranscriptEvent::MessageAppended {
                message_seq: message.seq,
                role: message.role,
                content: message.content.clone(),
            }
        }));
        events
    }
}
