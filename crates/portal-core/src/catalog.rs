//! Static service catalog and the tier gate over it.
//!
//! The catalog is fixed at start-up and never mutated. Every lookup here is
//! total: "nothing found" is an empty vector, never an error.

use std::collections::HashSet;

use serde::Serialize;

use super::membership::MembershipTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServicePlatform {
    /// Chamber-internal services.
    #[serde(rename = "ADC Platform")]
    Adc,
    /// Government-integrated services.
    #[serde(rename = "TAMM")]
    Tamm,
    /// Third-party affiliate programmes.
    #[serde(rename = "Affiliates Platform")]
    Affiliates,
}

impl ServicePlatform {
    pub fn label(self) -> &'static str {
        match self {
            Self::Adc => "ADC Platform",
            Self::Tamm => "TAMM",
            Self::Affiliates => "Affiliates Platform",
        }
    }

    /// Accepts the short names (`adc`, `tamm`, `affiliates`) as well as the labels.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let normalized = normalized.strip_suffix(" platform").unwrap_or(&normalized);
        match normalized {
            "adc" => Some(Self::Adc),
            "tamm" => Some(Self::Tamm),
            "affiliates" | "affiliate" => Some(Self::Affiliates),
            _ => None,
        }
    }
}

impl std::str::FromStr for ServicePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("unknown platform '{s}' (expected adc, tamm or affiliates)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub name_ar: &'static str,
    pub department: &'static str,
    pub platform: ServicePlatform,
    pub description: &'static str,
    pub description_ar: &'static str,
    pub category: &'static str,
    pub tags: &'static [&'static str],
    pub tier_required: Option<MembershipTier>,
    pub ai_enabled: bool,
    pub url: Option<&'static str>,
}

impl Service {
    pub fn is_visible_to(&self, tier: MembershipTier) -> bool {
        self.tier_required.map_or(true, |required| required <= tier)
    }

    fn matches_text(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_SERVICES.to_vec())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.name == name)
    }

    pub fn by_platform(&self, platform: ServicePlatform) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|service| service.platform == platform)
            .collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|service| service.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Ids that appear more than once, in first-duplicate order.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for service in &self.services {
            if !seen.insert(service.id) && !duplicates.contains(&service.id) {
                duplicates.push(service.id);
            }
        }
        duplicates
    }
}

pub fn visible_services(catalog: &Catalog, tier: MembershipTier) -> Vec<&Service> {
    catalog
        .iter()
        .filter(|service| service.is_visible_to(tier))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMapping {
    pub key: &'static str,
    pub markers: &'static [&'static str],
    pub services: &'static [&'static str],
}

/// Checked top to bottom; the first mapping with a marker in the query wins.
pub const KEYWORD_MAPPINGS: [KeywordMapping; 3] = [
    KeywordMapping {
        key: "start",
        markers: &["start", "begin"],
        services: &[
            "Business Development Services",
            "Business Enablement Advisory",
            "Market Directory",
            "Expert Library",
        ],
    },
    KeywordMapping {
        key: "grow",
        markers: &["grow", "expand"],
        services: &[
            "Chamber Boost",
            "Chamber Business Matchmaking",
            "Upskilling Programs",
            "Data Hub",
        ],
    },
    KeywordMapping {
        key: "scale",
        markers: &["scale", "international"],
        services: &[
            "Global Tenders Hub",
            "Policy Advocacy",
            "Flagship & Sectoral Reports",
            "Chamber ESG Label",
        ],
    },
];

pub const FALLBACK_RESULT_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMatch {
    Keyword(&'static str),
    Substring,
    Fallback,
    /// Blank query; nothing was searched.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<'a> {
    pub services: Vec<&'a Service>,
    pub matched_by: SearchMatch,
}

pub fn search_services<'a>(query: &str, catalog: &'a Catalog) -> Vec<&'a Service> {
    search_services_detailed(query, catalog).services
}

pub fn search_services_detailed<'a>(query: &str, catalog: &'a Catalog) -> SearchOutcome<'a> {
    search_in(query, catalog.iter().collect())
}

/// Same as [`search_services`], restricted to what `tier` may see.
pub fn search_visible<'a>(
    query: &str,
    catalog: &'a Catalog,
    tier: MembershipTier,
) -> SearchOutcome<'a> {
    search_in(query, visible_services(catalog, tier))
}

fn search_in<'a>(query: &str, pool: Vec<&'a Service>) -> SearchOutcome<'a> {
    if query.trim().is_empty() {
        return SearchOutcome {
            services: Vec::new(),
            matched_by: SearchMatch::Empty,
        };
    }
    let query_lower = query.to_lowercase();

    if let Some(mapping) = KEYWORD_MAPPINGS.iter().find(|mapping| {
        mapping
            .markers
            .iter()
            .any(|marker| query_lower.contains(marker))
    }) {
        let services: Vec<&Service> = mapping
            .services
            .iter()
            .filter_map(|name| pool.iter().copied().find(|service| service.name == *name))
            .collect();
        if !services.is_empty() {
            tracing::debug!(mapping = mapping.key, count = services.len(), "keyword search");
            return SearchOutcome {
                services,
                matched_by: SearchMatch::Keyword(mapping.key),
            };
        }
    } else {
        let services: Vec<&Service> = pool
            .iter()
            .copied()
            .filter(|service| service.matches_text(&query_lower))
            .collect();
        if !services.is_empty() {
            return SearchOutcome {
                services,
                matched_by: SearchMatch::Substring,
            };
        }
    }

    SearchOutcome {
        services: pool.into_iter().take(FALLBACK_RESULT_COUNT).collect(),
        matched_by: SearchMatch::Fallback,
    }
}

pub fn result_summary(count: usize) -> String {
    if count == 1 {
        "1 service found".to_string()
    } else {
        format!("{count} services found")
    }
}

pub const BUILTIN_SERVICES: [Service; 19] = [
    Service {
        id: "1",
        name: "Chamber ESG Label",
        name_ar: "شهادة ESG من الغرفة",
        department: "Sustainability",
        platform: ServicePlatform::Adc,
        description: "Apply for ESG (Environmental, Social, Governance) certification to demonstrate your commitment to sustainable business practices.",
        description_ar: "تقدم بطلب للحصول على شهادة ESG (البيئة والمجتمع والحوكمة) لإثبات التزامك بممارسات الأعمال المستدامة.",
        category: "Certificates",
        tags: &["ESG", "sustainability", "environment", "social", "governance"],
        tier_required: None,
        ai_enabled: true,
        url: None,
    },
    Service {
        id: "2",
        name: "Policy Advocacy",
        name_ar: "الدعوة للسياسات",
        department: "Business Development",
        platform: ServicePlatform::Adc,
        description: "Engage with policymakers to advocate for business-friendly policies and regulations.",
        description_ar: "التواصل مع صانعي السياسات للدعوة إلى سياسات ولوائح صديقة للأعمال.",
        category: "Business Enablement",
        tags: &["policy", "advocacy", "regulations", "government"],
        tier_required: None,
        ai_enabled: true,
        url: None,
    },
    Service {
        id: "3",
        name: "Upskilling Programs",
        name_ar: "برامج تطوير المهارات",
        department: "Training & Development",
        platform: ServicePlatform::Adc,
        description: "Professional development and training programs to enhance business skills and capabilities.",
        description_ar: "برامج التطوير المهني والتدريب لتعزيز مهارات وقدرات الأعمال.",
        category: "Training",
        tags: &["training", "skills", "development", "courses"],
        tier_required: None,
        ai_enabled: false,
        url: None,
    },
    Service {
        id: "4",
        name: "Chamber Boost",
        name_ar: "دعم الغرفة",
        department: "Business Support",
        platform: ServicePlatform::Adc,
        description: "Comprehensive support program to accelerate business growth and market expansion.",
        description_ar: "برنامج دعم شامل لتسريع نمو الأعمال والتوسع في السوق.",
        category: "Business Enablement",
        tags: &["boost", "growth", "support", "acceleration"],
        tier_required: Some(MembershipTier::ElitePlus),
        ai_enabled: false,
        url: None,
    },
    Service {
        id: "5",
        name: "Chamber Business Matchmaking",
        name_ar: "التوفيق بين الأعمال",
        department: "Business Development",
        platform: ServicePlatform::Adc,
        description: "Connect with potential business partners, investors, and collaborators through our matchmaking service.",
        description_ar: "تواصل مع شركاء الأعمال المحتملين والمستثمرين والمتعاونين من خلال خدمة التوفيق لدينا.",
        category: "Networking",
        tags: &["matchmaking", "partners", "investors", "networking"],
        tier_required: None,
        ai_enabled: true,
        url: None,
    },
    Service {
        id: "6",
        name: "Business Development Services",
        name_ar: "خدمات تطوير الأعمال",
        department: "Business Development",
        platform: ServicePlatform::Adc,
        description: "Strategic consulting and support services to help grow and develop your business.",
        description_ar: "خدمات استشارية ودعم استراتيجي للمساعدة في نمو وتطوير أعمالك.",
        category: "Business Enablement",
        tags: &["development", "consulting", "strategy", "growth"],
        tier_required: None,
        ai_enabled: false,
        url: None,
    },
    Service {
        id: "7",
        name: "Business Enablement Advisory",
        name_ar: "استشارات تمكين الأعمال",
        department: "Advisory Services",
        platform: ServicePlatform::Adc,
        description: "Expert advisory services to enable and support business operations and growth initiatives.",
        description_ar: "خدمات استشارية متخصصة لتمكين ودعم عمليات الأعمال ومبادرات النمو.",
        category: "Advisory",
        tags: &["advisory", "enablement", "consulting", "support"],
        tier_required: Some(MembershipTier::Elite),
        ai_enabled: false,
        url: None,
    },
    Service {
        id: "8",
        name: "Expert Library",
        name_ar: "مكتبة الخبراء",
        department: "Knowledge Services",
        platform: ServicePlatform::Adc,
        description: "Access a comprehensive library of expert resources, guides, and knowledge materials.",
        description_ar: "الوصول إلى مكتبة شاملة من موارد الخبراء والأدلة والمواد المعرفية.",
        category: "Market Intelligence",
        tags: &["library", "resources", "knowledge", "guides"],
        tier_required: None,
        ai_enabled: true,
        url: None,
    },
    Service {
        id: "9",
        name: "Global Tenders Hub",
        name_ar: "مركز المناقصات العالمية",
        department: "Trade Services",
        platform: ServicePlatform::Adc,
        description: "Access international tender opportunities and procurement notices from around the world.",
        description_ar: "الوصول إلى فرص المناقصات الدولية وإعلانات المشتريات من جميع أنحاء العالم.",
        category: "Market Intelligence",
        tags: &["tenders", "procurement", "international", "opportunities"],
        tier_required: None,
        ai_enabled: true,
        url: None,
    },
    Service {
        id: "10",
        name: "Data Hub",
        name_ar: "مركز البيانات",
        department: "Research & Analytics",
        platform: ServicePlatform::Adc,
        description: "Access comprehensive business data, analytics, and market insights for informed decision-making.",
        description_ar: "الوصول إلى بيانات الأعمال الشاملة والتحليلات ورؤى السوق لاتخاذ قرارات مستنيرة.",
        category: "Market Intelligence",
        tags: &["data", "analytics", "insights", "market"],
        tier_required: None,
        ai_enabled: true,
        url: None,
    },
    Service {
        id: "11",
        name: "Flagship & Sectoral Reports",
        name_ar: "التقارير الرئيسية والقطاعية",
        department: "Research & Analytics",
        platform: ServicePlatform::Adc,
        description: "Access in-depth flagship reports and sector-specific analysis for strategic planning.",
        description_ar: "الوصول إلى التقارير الرئيسية المتعمقة والتحليلات الخاصة بالقطاعات للتخطيط الاستراتيجي.",
        category: "Market Intelligence",
        tags: &["reports", "analysis", "sectors", "research"],
        tier_required: None,
        ai_enabled: false,
        url: None,
    },
    Service {
        id: "12",
        name: "Procurement Hub",
        name_ar: "مركز المشتريات",
        department: "Trade Services",
        platform: ServicePlatform::Adc,
        description: "Centralized procurement platform for business purchasing and supplier management.",
        description_ar: "منصة مشتريات مركزية لشراء الأعمال وإدارة الموردين.",
        category: "Trade",
        tags: &["procurement", "purchasing", "suppliers"],
        tier_required: Some(MembershipTier::ElitePlus),
        ai_enabled: false,
        url: None,
    },
    Service {
        id: "13",
        name: "AD Connect and Concierge",
        name_ar: "خدمة AD Connect والكونسيرج",
        department: "Member Services",
        platform: ServicePlatform::Adc,
        description: "Premium concierge services and networking opportunities for chamber members.",
        description_ar: "خدمات الكونسيرج المتميزة وفرص التواصل لأعضاء الغرفة.",
        category: "Member Services",
        tags: &["concierge", "networking", "connect", "premium"],
        tier_required: Some(MembershipTier::ElitePlus),
        ai_enabled: false,
        url: None,
    },
    Service {
        id: "14",
        name: "Market Directory",
        name_ar: "دليل السوق",
        department: "Trade Services",
        platform: ServicePlatform::Adc,
        description: "Comprehensive directory of businesses, suppliers, and market participants in Abu Dhabi.",
        description_ar: "دليل شامل للشركات والموردين والمشاركين في سوق أبوظبي.",
        category: "Market Intelligence",
        tags: &["directory", "businesses", "suppliers", "market"],
        tier_required: None,
        ai_enabled: true,
        url: None,
    },
    Service {
        id: "15",
        name: "Certificate of Origin",
        name_ar: "شهادة المنشأ",
        department: "Trade Documentation",
        platform: ServicePlatform::Tamm,
        description: "Obtain certificates of origin for your exported goods and products.",
        description_ar: "الحصول على شهادات المنشأ للسلع والمنتجات المصدرة.",
        category: "Certificates",
        tags: &["origin", "certificate", "export", "trade"],
        tier_required: None,
        ai_enabled: false,
        url: Some("https://www.tamm.abudhabi/services/certificate-of-origin"),
    },
    Service {
        id: "16",
        name: "Membership Renewal – Industrial Areas",
        name_ar: "تجديد العضوية - المناطق الصناعية",
        department: "Membership Services",
        platform: ServicePlatform::Tamm,
        description: "Renew your chamber membership for businesses in industrial areas.",
        description_ar: "تجديد عضويتك في الغرفة للشركات في المناطق الصناعية.",
        category: "Membership",
        tags: &["renewal", "membership", "industrial"],
        tier_required: None,
        ai_enabled: false,
        url: Some("https://www.tamm.abudhabi/services/membership-renewal-industrial"),
    },
    Service {
        id: "17",
        name: "Businessman Certificate",
        name_ar: "شهادة رجل أعمال",
        department: "Documentation Services",
        platform: ServicePlatform::Tamm,
        description: "Obtain a certificate verifying your status as a registered businessman.",
        description_ar: "الحصول على شهادة تثبت حالتك كرجل أعمال مسجل.",
        category: "Certificates",
        tags: &["businessman", "certificate", "verification"],
        tier_required: None,
        ai_enabled: false,
        url: Some("https://www.tamm.abudhabi/services/businessman-certificate"),
    },
    Service {
        id: "18",
        name: "Abu Dhabi Youth Business Council",
        name_ar: "مجلس أبوظبي لرجال الأعمال الشباب",
        department: "Youth Programs",
        platform: ServicePlatform::Affiliates,
        description: "Support and networking platform for young entrepreneurs and business professionals.",
        description_ar: "منصة دعم وتواصل لرواد الأعمال الشباب والمهنيين.",
        category: "Special Programs",
        tags: &["youth", "entrepreneurs", "networking"],
        tier_required: None,
        ai_enabled: false,
        url: Some("https://abudhabichamber.ae/youth-council"),
    },
    Service {
        id: "19",
        name: "Abu Dhabi Businesswomen Council",
        name_ar: "مجلس سيدات أعمال أبوظبي",
        department: "Women Programs",
        platform: ServicePlatform::Affiliates,
        description: "Empowering women in business through networking, mentorship, and development programs.",
        description_ar: "تمكين المرأة في الأعمال من خلال التواصل والإرشاد وبرامج التطوير.",
        category: "Special Programs",
        tags: &["women", "businesswomen", "empowerment"],
        tier_required: None,
        ai_enabled: false,
        url: Some("https://abudhabichamber.ae/businesswomen-council"),
    },
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(services: &[&Service]) -> Vec<&'static str> {
        services.iter().map(|service| service.name).collect()
    }

    #[test]
    fn builtin_catalog_ids_are_unique() {
        assert!(Catalog::builtin().validate().is_empty());
    }

    #[test]
    fn validate_reports_duplicate_ids_once() {
        let mut services = BUILTIN_SERVICES.to_vec();
        services.push(BUILTIN_SERVICES[0].clone());
        services.push(BUILTIN_SERVICES[0].clone());
        assert_eq!(Catalog::new(services).validate(), vec!["1"]);
    }

    #[test]
    fn tier_gate_hides_services_above_caller_tier() {
        let catalog = Catalog::builtin();
        for tier in MembershipTier::ALL {
            let visible = visible_services(&catalog, tier);
            for service in catalog.iter() {
                let shown = visible.iter().any(|candidate| candidate.id == service.id);
                match service.tier_required {
                    None => assert!(shown, "{} hidden from {tier}", service.name),
                    Some(required) => assert_eq!(shown, required <= tier, "{}", service.name),
                }
            }
        }
    }

    #[test]
    fn visible_sets_grow_monotonically_with_tier() {
        let catalog = Catalog::builtin();
        let essential = names(&visible_services(&catalog, MembershipTier::Essential));
        let elite = names(&visible_services(&catalog, MembershipTier::Elite));
        let elite_plus = names(&visible_services(&catalog, MembershipTier::ElitePlus));

        assert!(essential.iter().all(|name| elite.contains(name)));
        assert!(elite.iter().all(|name| elite_plus.contains(name)));
        assert_eq!(elite_plus.len(), catalog.len());
        assert_eq!((essential.len(), elite.len()), (15, 16));
    }

    #[test]
    fn start_marker_returns_mapping_in_table_order() {
        let catalog = Catalog::builtin();
        let found = search_services("I want to Start a company", &catalog);
        assert_eq!(
            names(&found),
            vec![
                "Business Development Services",
                "Business Enablement Advisory",
                "Market Directory",
                "Expert Library",
            ]
        );
    }

    #[test]
    fn begin_and_expand_and_international_use_their_tables() {
        let catalog = Catalog::builtin();
        let begin = search_services_detailed("where do I BEGIN", &catalog);
        assert_eq!(begin.matched_by, SearchMatch::Keyword("start"));

        let grow = search_services("expand operations", &catalog);
        assert_eq!(
            names(&grow),
            vec!["Chamber Boost", "Chamber Business Matchmaking", "Upskilling Programs", "Data Hub"]
        );

        let scale = search_services("go International", &catalog);
        assert_eq!(
            names(&scale),
            vec![
                "Global Tenders Hub",
                "Policy Advocacy",
                "Flagship & Sectoral Reports",
                "Chamber ESG Label",
            ]
        );
    }

    #[test]
    fn substring_search_matches_name_or_description() {
        let catalog = Catalog::builtin();
        let outcome = search_services_detailed("TENDER", &catalog);
        assert_eq!(outcome.matched_by, SearchMatch::Substring);
        assert_eq!(names(&outcome.services), vec!["Global Tenders Hub"]);

        let by_description = search_services("mentorship", &catalog);
        assert_eq!(names(&by_description), vec!["Abu Dhabi Businesswomen Council"]);
    }

    #[test]
    fn no_match_falls_back_to_first_eight_entries() {
        let catalog = Catalog::builtin();
        let outcome = search_services_detailed("zzz-nothing-here", &catalog);
        assert_eq!(outcome.matched_by, SearchMatch::Fallback);
        let expected: Vec<&str> = catalog.iter().take(8).map(|service| service.name).collect();
        assert_eq!(names(&outcome.services), expected);
    }

    #[test]
    fn blank_query_is_an_empty_result() {
        let catalog = Catalog::builtin();
        let outcome = search_services_detailed("   ", &catalog);
        assert_eq!(outcome.matched_by, SearchMatch::Empty);
        assert!(outcome.services.is_empty());
        assert_eq!(result_summary(outcome.services.len()), "0 services found");
    }

    #[test]
    fn tier_restricted_search_drops_hidden_mapping_entries() {
        let catalog = Catalog::builtin();
        let outcome = search_visible("start here", &catalog, MembershipTier::Essential);
        assert_eq!(
            names(&outcome.services),
            vec!["Business Development Services", "Market Directory", "Expert Library"]
        );
    }

    #[test]
    fn lookups_by_platform_and_category() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.by_platform(ServicePlatform::Tamm).len(), 3);
        assert_eq!(catalog.by_platform(ServicePlatform::Affiliates).len(), 2);
        assert_eq!(catalog.by_category("certificates").len(), 3);
        assert_eq!(catalog.get("9").map(|service| service.name), Some("Global Tenders Hub"));
        assert!(catalog.by_name("Nope").is_none());
    }

    #[test]
    fn platform_parse_accepts_short_names_and_labels() {
        assert_eq!(ServicePlatform::parse("TAMM"), Some(ServicePlatform::Tamm));
        assert_eq!(ServicePlatform::parse("adc platform"), Some(ServicePlatform::Adc));
        assert_eq!(
            "Affiliates Platform".parse::<ServicePlatform>(),
            Ok(ServicePlatform::Affiliates)
        );
        assert!("dubai".parse::<ServicePlatform>().is_err());
    }
}
