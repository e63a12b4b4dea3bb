#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationTemplateId {
    EsgCertificate,
    EsgRenewal,
}

impl ApplicationTemplateId {
    pub fn for_renewal(renewal: bool) -> Self {
        if renewal {
            Self::EsgRenewal
        } else {
            Self::EsgCertificate
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EsgCertificate => "esg_certificate",
            Self::EsgRenewal => "esg_renewal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationTemplate {
    pub id: ApplicationTemplateId,
    pub title: &'static str,
    pub steps: &'static [&'static str],
}

pub const STEP_APPLICANT_INFORMATION: usize = 0;
pub const STEP_ESG_PROFILE: usize = 1;
pub const STEP_DOCUMENTS: usize = 2;

const ESG_STEPS: [&str; 3] = ["Applicant Information", "ESG Profile", "Documents"];

const APPLICATION_TEMPLATES: [ApplicationTemplate; 2] = [
    ApplicationTemplate {
        id: ApplicationTemplateId::EsgCertificate,
        title: "ESG Certificate Application",
        steps: &ESG_STEPS,
    },
    ApplicationTemplate {
        id: ApplicationTemplateId::EsgRenewal,
        title: "ESG Certificate Renewal",
        steps: &ESG_STEPS,
    },
];

pub fn application_template(id: ApplicationTemplateId) -> &'static ApplicationTemplate {
    match id {
        ApplicationTemplateId::EsgCertificate => &APPLICATION_TEMPLATES[0],
        ApplicationTemplateId::EsgRenewal => &APPLICATION_TEMPLATES[1],
    }
}
