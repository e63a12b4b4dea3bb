//! Structured assistant payloads.
//!
//! Every panel holds fixed sample data; nothing here is computed from user
//! input. `to_lines` gives a plain-text rendering shared by every frontend.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    ApplicationCanvas(ApplicationCanvas),
    ContinueForm(ContinueForm),
    EsgScore(EsgScoreCard),
    SustainabilityReport(ReportSummary),
}

impl Panel {
    pub fn title(&self) -> &str {
        match self {
            Self::ApplicationCanvas(_) => "Application canvas",
            Self::ContinueForm(_) => "Applicant information",
            Self::EsgScore(_) => "ESG score",
            Self::SustainabilityReport(report) => report.title.as_str(),
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Self::ApplicationCanvas(canvas) => canvas.to_lines(),
            Self::ContinueForm(form) => form.to_lines(),
            Self::EsgScore(card) => card.to_lines(),
            Self::SustainabilityReport(report) => report.to_lines(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub applicant_name: String,
    pub organization_name: String,
    pub email: String,
    pub phone: String,
    pub trade_license: String,
    pub country: String,
    pub sector: String,
    pub sub_sector: String,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            applicant_name: "Ahmed Al Rashid".to_string(),
            organization_name: "Abu Dhabi Tech Solutions".to_string(),
            email: "ahmed.rashid@adts.ae".to_string(),
            phone: "+971 50 123 4567".to_string(),
            trade_license: "CN-2847569".to_string(),
            country: "United Arab Emirates".to_string(),
            sector: "Technology".to_string(),
            sub_sector: "Cloud Computing & AI".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EsgPillar {
    Environmental,
    Social,
    Governance,
}

impl EsgPillar {
    pub const ALL: [EsgPillar; 3] = [Self::Environmental, Self::Social, Self::Governance];

    pub fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Social => "Social",
            Self::Governance => "Governance",
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Environmental => 'E',
            Self::Social => 'S',
            Self::Governance => 'G',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarNarrative {
    pub pillar: EsgPillar,
    pub summary: String,
    /// (field label, prefilled value)
    pub metrics: Vec<(String, String)>,
}

fn metrics(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(label, value)| (label.to_string(), value.to_string()))
        .collect()
}

pub fn sample_esg_profile() -> Vec<PillarNarrative> {
    vec![
        PillarNarrative {
            pillar: EsgPillar::Environmental,
            summary: "We have implemented comprehensive sustainability measures including 60% renewable energy usage, zero-waste-to-landfill program, and ISO 14001 certified environmental management system.".to_string(),
            metrics: metrics(&[
                ("Carbon emissions", "8,500 tCO2e (35% reduction YoY)"),
                ("Energy reduction", "60% renewable sources"),
                ("Waste management", "Zero waste to landfill"),
                ("Water conservation", "40% water recycled"),
            ]),
        },
        PillarNarrative {
            pillar: EsgPillar::Social,
            summary: "Strong commitment to diversity with 45% female workforce, comprehensive employee wellness programs, and active community engagement through STEM education initiatives.".to_string(),
            metrics: metrics(&[
                ("Workforce diversity", "45% female workforce"),
                ("Community programs", "12 STEM workshops/year"),
                ("Health & safety", "Zero workplace incidents"),
                ("Employee wellbeing", "95% satisfaction score"),
            ]),
        },
        PillarNarrative {
            pillar: EsgPillar::Governance,
            summary: "Independent board with 7 members including 3 independent directors. Robust compliance framework with quarterly audits and transparent reporting practices.".to_string(),
            metrics: metrics(&[
                ("Board structure", "7 members, 3 independent"),
                ("Compliance frameworks", "ISO 27001, SOC2 certified"),
                ("Risk management", "Quarterly audits"),
                ("Transparency", "100% GRI compliant"),
            ]),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasSectionId {
    Applicant,
    EsgProfile,
    Documents,
}

impl CanvasSectionId {
    pub fn title(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant Information",
            Self::EsgProfile => "ESG Profile",
            Self::Documents => "Documents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    Pending,
    Loading,
    Complete,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSection {
    pub id: CanvasSectionId,
    pub state: SectionState,
}

/// Timed stages of the prefill animation, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasStage {
    ApplicantComplete,
    EsgComplete,
    DocumentsReady,
}

impl CanvasStage {
    pub const SEQUENCE: [CanvasStage; 3] = [
        Self::ApplicantComplete,
        Self::EsgComplete,
        Self::DocumentsReady,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCanvas {
    pub sections: Vec<CanvasSection>,
    pub expanded: Option<CanvasSectionId>,
    pub applicant: ApplicantProfile,
    pub esg_profile: Vec<PillarNarrative>,
    pub disclaimer: String,
    pub submit_label: String,
}

impl ApplicationCanvas {
    pub fn prefilled(applicant: ApplicantProfile) -> Self {
        Self {
            sections: vec![
                CanvasSection {
                    id: CanvasSectionId::Applicant,
                    state: SectionState::Loading,
                },
                CanvasSection {
                    id: CanvasSectionId::EsgProfile,
                    state: SectionState::Loading,
                },
                CanvasSection {
                    id: CanvasSectionId::Documents,
                    state: SectionState::Pending,
                },
            ],
            expanded: Some(CanvasSectionId::Documents),
            applicant,
            esg_profile: sample_esg_profile(),
            disclaimer: "All submitted documents will be verified by Abu Dhabi Chamber. Processing typically takes 3-5 business days. You'll receive email updates on your application status.".to_string(),
            submit_label: "Submit ESG Application".to_string(),
        }
    }

    pub fn section_state(&self, id: CanvasSectionId) -> Option<SectionState> {
        self.sections
            .iter()
            .find(|section| section.id == id)
            .map(|section| section.state)
    }

    fn set_state(&mut self, id: CanvasSectionId, state: SectionState) {
        if let Some(section) = self.sections.iter_mut().find(|section| section.id == id) {
            section.state = state;
        }
    }

    pub fn apply_stage(&mut self, stage: CanvasStage) {
        match stage {
            CanvasStage::ApplicantComplete => {
                self.set_state(CanvasSectionId::Applicant, SectionState::Complete)
            }
            CanvasStage::EsgComplete => {
                self.set_state(CanvasSectionId::EsgProfile, SectionState::Complete)
            }
            CanvasStage::DocumentsReady => {
                self.set_state(CanvasSectionId::Documents, SectionState::Ready)
            }
        }
    }

    /// Accordion behaviour: opening one section closes the others.
    pub fn expand(&mut self, id: CanvasSectionId) {
        self.expanded = Some(id);
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for section in &self.sections {
            let marker = match section.state {
                SectionState::Complete => "[x]",
                SectionState::Loading => "[~]",
                SectionState::Ready => "[>]",
                SectionState::Pending => "[ ]",
            };
            let open = self.expanded == Some(section.id);
            lines.push(format!(
                "{marker} {}{}",
                section.id.title(),
                if open { " (open)" } else { "" }
            ));
            if !open {
                continue;
            }
            match section.id {
                CanvasSectionId::Applicant => {
                    let a = &self.applicant;
                    for (label, value) in [
                        ("Applicant Name", &a.applicant_name),
                        ("Organization Name", &a.organization_name),
                        ("Email Address", &a.email),
                        ("Phone Number", &a.phone),
                        ("Trade License Number", &a.trade_license),
                        ("Country", &a.country),
                        ("Sector", &a.sector),
                        ("Sub-sector", &a.sub_sector),
                    ] {
                        lines.push(format!("    {label}: {value}"));
                    }
                }
                CanvasSectionId::EsgProfile => {
                    for narrative in &self.esg_profile {
                        lines.push(format!(
                            "    {} ({})",
                            narrative.pillar.label(),
                            narrative.pillar.letter()
                        ));
                        lines.push(format!("      {}", narrative.summary));
                        for (label, value) in &narrative.metrics {
                            lines.push(format!("      {label}: {value}"));
                        }
                    }
                }
                CanvasSectionId::Documents => {
                    lines.push("    Required: ESG / Sustainability Policy, Latest ESG / Sustainability Report, Governance or Ethics Policy, Trade License".to_string());
                    lines.push("    Use /upload to select files".to_string());
                }
            }
        }
        lines.push(format!("Note: {}", self.disclaimer));
        lines.push(format!("[ {} ]", self.submit_label));
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueForm {
    pub prompt: String,
    pub fields: Vec<String>,
    pub action: String,
}

impl ContinueForm {
    pub fn applicant_details() -> Self {
        Self {
            prompt: "Let's continue with your applicant information. What's your organization name?".to_string(),
            fields: vec![
                "Organization Name".to_string(),
                "Trade License Number".to_string(),
            ],
            action: "Continue to ESG Profile".to_string(),
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![self.prompt.clone()];
        for field in &self.fields {
            lines.push(format!("  {field}: ____________"));
        }
        lines.push(format!("[ {} ]", self.action));
        lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar: EsgPillar,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsgScoreCard {
    pub overall: u8,
    pub out_of: u8,
    pub rating: String,
    pub pillars: Vec<PillarScore>,
}

impl EsgScoreCard {
    pub fn projected() -> Self {
        Self {
            overall: 78,
            out_of: 100,
            rating: "Above Average".to_string(),
            pillars: vec![
                PillarScore {
                    pillar: EsgPillar::Environmental,
                    score: 82,
                },
                PillarScore {
                    pillar: EsgPillar::Social,
                    score: 75,
                },
                PillarScore {
                    pillar: EsgPillar::Governance,
                    score: 77,
                },
            ],
        }
    }

    pub fn pillar(&self, pillar: EsgPillar) -> Option<u8> {
        self.pillars
            .iter()
            .find(|entry| entry.pillar == pillar)
            .map(|entry| entry.score)
    }

    /// Fill width proportional to `score / out_of`, rounded down.
    pub fn bar(&self, score: u8, width: usize) -> String {
        let filled = if self.out_of == 0 {
            0
        } else {
            (usize::from(score.min(self.out_of)) * width) / usize::from(self.out_of)
        };
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Your projected ESG score based on current data:".to_string(),
            format!("{}/{}  {}", self.overall, self.out_of, self.rating),
        ];
        for entry in &self.pillars {
            lines.push(format!(
                "  {:<14} {} {}",
                entry.pillar.label(),
                self.bar(entry.score, 20),
                entry.score
            ));
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub heading: String,
    pub title: String,
    pub achievements: Vec<String>,
    pub action: String,
}

impl ReportSummary {
    pub fn sustainability_2024() -> Self {
        Self {
            heading: "Generating your sustainability report...".to_string(),
            title: "2024 Sustainability Report".to_string(),
            achievements: vec![
                "Carbon emissions reduced by 35%".to_string(),
                "100% renewable energy in main facilities".to_string(),
                "Zero waste to landfill achieved".to_string(),
                "Employee satisfaction at 87%".to_string(),
            ],
            action: "Download Full Report".to_string(),
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![self.heading.clone(), self.title.clone()];
        for item in &self.achievements {
            lines.push(format!("  ✓ {item}"));
        }
        lines.push(format!("[ {} ]", self.action));
        lines
    }
}
