use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use super::catalog::visible_services;
use super::catalog::Catalog;

/// Membership level. The derived ordering is the visibility ordering:
/// a higher tier sees everything a lower tier sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MembershipTier {
    Essential,
    Elite,
    #[serde(rename = "Elite Plus")]
    ElitePlus,
}

impl MembershipTier {
    pub const ALL: [MembershipTier; 3] = [Self::Essential, Self::Elite, Self::ElitePlus];

    pub fn label(self) -> &'static str {
        match self {
            Self::Essential => "Essential",
            Self::Elite => "Elite",
            Self::ElitePlus => "Elite Plus",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "essential" => Some(Self::Essential),
            "elite" => Some(Self::Elite),
            "eliteplus" => Some(Self::ElitePlus),
            _ => None,
        }
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MembershipTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("unknown membership tier '{s}' (expected essential, elite or elite-plus)")
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipStatus {
    Active,
    Expiring,
    Expired,
}

impl MembershipStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expiring => "Expiring",
            Self::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub company_name: String,
    pub member_id: String,
    pub tier: MembershipTier,
    pub status: MembershipStatus,
    pub valid_until: NaiveDate,
    pub services_used_this_month: u32,
    pub days_until_renewal: Option<u32>,
}

impl Membership {
    pub fn new(company_name: impl Into<String>, member_id: impl Into<String>, tier: MembershipTier) -> Self {
        Self {
            company_name: company_name.into(),
            member_id: member_id.into(),
            tier,
            status: MembershipStatus::Active,
            valid_until: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            services_used_this_month: 12,
            days_until_renewal: Some(20),
        }
    }

    pub fn renewal_due_soon(&self) -> bool {
        self.days_until_renewal.is_some_and(|days| days <= 30)
    }
}

pub const MOST_USED_SERVICES: [&str; 2] = ["Trade License Renewal", "Certificate of Origin"];

/// Canned reply of the dashboard quick assistant.
pub fn dashboard_briefing(membership: &Membership, catalog: &Catalog) -> String {
    let available = visible_services(catalog, membership.tier).len();
    format!(
        "Based on your {} membership, you have access to {} premium services. \
         Your most used services are {} and {}. \
         Would you like me to help you with any specific service today?",
        membership.tier.label(),
        available,
        MOST_USED_SERVICES[0],
        MOST_USED_SERVICES[1],
    )
}
