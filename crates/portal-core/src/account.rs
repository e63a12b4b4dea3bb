//! Member account records shown on the dashboard: applications in flight,
//! payments and assistant insights. All three are fixed sample tables.

use chrono::NaiveDate;
use serde::Serialize;

use super::catalog::ServicePlatform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Drafts were never sent and rejections are closed; everything else
    /// stays on the dashboard.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Draft | Self::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub id: &'static str,
    pub service: &'static str,
    pub department: &'static str,
    pub status: ApplicationStatus,
    /// ISO date.
    pub updated_at: &'static str,
    pub platform: ServicePlatform,
}

impl Application {
    pub fn updated_on(&self) -> Option<NaiveDate> {
        parse_date(self.updated_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: &'static str,
    pub description: &'static str,
    /// Whole currency units.
    pub amount: u32,
    pub currency: &'static str,
    pub status: PaymentStatus,
    /// ISO date.
    pub due_date: &'static str,
}

impl Payment {
    pub fn is_outstanding(&self) -> bool {
        matches!(self.status, PaymentStatus::Pending | PaymentStatus::Overdue)
    }

    pub fn due_on(&self) -> Option<NaiveDate> {
        parse_date(self.due_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Recommendation,
    Alert,
    Insight,
}

impl InsightKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Recommendation => "recommendation",
            Self::Alert => "alert",
            Self::Insight => "insight",
        }
    }
}

/// Declared most urgent first, so the derived ordering sorts by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    High,
    Medium,
    Low,
}

impl InsightPriority {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiInsight {
    pub id: &'static str,
    pub text: &'static str,
    pub kind: InsightKind,
    pub priority: Option<InsightPriority>,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn active_applications() -> Vec<&'static Application> {
    SAMPLE_APPLICATIONS
        .iter()
        .filter(|application| application.status.is_active())
        .collect()
}

/// Sum of unpaid amounts per currency, in first-seen currency order.
pub fn outstanding_totals() -> Vec<(&'static str, u32)> {
    let mut totals: Vec<(&'static str, u32)> = Vec::new();
    for payment in SAMPLE_PAYMENTS.iter().filter(|payment| payment.is_outstanding()) {
        match totals.iter_mut().find(|(currency, _)| *currency == payment.currency) {
            Some((_, total)) => *total += payment.amount,
            None => totals.push((payment.currency, payment.amount)),
        }
    }
    totals
}

/// Insights ordered by priority; unranked ones go last, ties keep table order.
pub fn ranked_insights() -> Vec<&'static AiInsight> {
    let mut insights: Vec<&AiInsight> = SAMPLE_INSIGHTS.iter().collect();
    insights.sort_by_key(|insight| (insight.priority.is_none(), insight.priority));
    insights
}

pub static SAMPLE_APPLICATIONS: [Application; 3] = [
    Application {
        id: "1",
        service: "Chamber ESG Label",
        department: "Sustainability",
        status: ApplicationStatus::UnderReview,
        updated_at: "2024-12-10",
        platform: ServicePlatform::Adc,
    },
    Application {
        id: "2",
        service: "Policy Advocacy",
        department: "Business Development",
        status: ApplicationStatus::Submitted,
        updated_at: "2024-12-09",
        platform: ServicePlatform::Adc,
    },
    Application {
        id: "3",
        service: "Certificate of Origin",
        department: "Trade Documentation",
        status: ApplicationStatus::Approved,
        updated_at: "2024-12-08",
        platform: ServicePlatform::Tamm,
    },
];

pub static SAMPLE_PAYMENTS: [Payment; 2] = [
    Payment {
        id: "1",
        description: "Annual Membership Renewal - Elite Tier",
        amount: 15000,
        currency: "AED",
        status: PaymentStatus::Pending,
        due_date: "2024-12-31",
    },
    Payment {
        id: "2",
        description: "Chamber ESG Label Application Fee",
        amount: 2500,
        currency: "AED",
        status: PaymentStatus::Paid,
        due_date: "2024-11-30",
    },
];

pub static SAMPLE_INSIGHTS: [AiInsight; 3] = [
    AiInsight {
        id: "1",
        text: "Your annual membership renewal is due in 20 days. Renew now to maintain Elite tier benefits and uninterrupted access to premium services.",
        kind: InsightKind::Alert,
        priority: Some(InsightPriority::High),
    },
    AiInsight {
        id: "2",
        text: "Based on your recent use of Chamber Business Matchmaking and Global Tenders Hub, consider exploring the Expert Library for sector-specific insights.",
        kind: InsightKind::Recommendation,
        priority: Some(InsightPriority::Medium),
    },
    AiInsight {
        id: "3",
        text: "Your Chamber ESG Label application is progressing well. Current stage: Quality Check (Step 3 of 6). Expected completion: 5 business days.",
        kind: InsightKind::Insight,
        priority: Some(InsightPriority::Low),
    },
];
