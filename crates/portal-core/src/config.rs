use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use super::error::PortalError;
use super::membership::MembershipTier;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    pub member: MemberConfig,
    pub session: SessionConfig,
}

/// Simulated latencies, in milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub reply_delay_ms: u64,
    pub canvas_delay_ms: u64,
    pub analysis_delay_ms: u64,
    pub typewriter_char_ms: u64,
    pub canvas_applicant_ms: u64,
    pub canvas_esg_ms: u64,
    pub canvas_documents_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
            canvas_delay_ms: 500,
            analysis_delay_ms: 2000,
            typewriter_char_ms: 20,
            canvas_applicant_ms: 500,
            canvas_esg_ms: 1500,
            canvas_documents_ms: 1000,
        }
    }
}

impl TimingConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn canvas_delay(&self) -> Duration {
        Duration::from_millis(self.canvas_delay_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn typewriter_tick(&self) -> Duration {
        Duration::from_millis(self.typewriter_char_ms)
    }

    /// Gaps between successive canvas stages, in stage order.
    pub fn canvas_stage_gaps(&self) -> [Duration; 3] {
        [
            Duration::from_millis(self.canvas_applicant_ms),
            Duration::from_millis(self.canvas_esg_ms),
            Duration::from_millis(self.canvas_documents_ms),
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MemberConfig {
    pub tier: MembershipTier,
    pub company_name: String,
    pub member_id: String,
}

impl Default for MemberConfig {
    fn default() -> Self {
        Self {
            tier: MembershipTier::ElitePlus,
            company_name: "Abu Dhabi Tech Solutions".to_string(),
            member_id: "ADC-2024-001234".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub renewal: bool,
    /// Write a transcript journal for each chat session.
    pub journal: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            renewal: false,
            journal: true,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("portal").join("config.toml"))
    }

    /// Loads `path`, or the default location when `None`. A missing file
    /// yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, PortalError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| PortalError::io(&path, source))?;
        Self::parse(&raw).map_err(|message| PortalError::config(&path, message))
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tmpdir");
        let config = Config::load(Some(&dir.path().join("absent.toml"))).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.timing.reply_delay_ms, 1000);
        assert!(config.session.journal);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::parse(
            r#"
            [timing]
            reply_delay_ms = 10

            [member]
            tier = "Elite"
            "#,
        )
        .expect("parse");
        assert_eq!(config.timing.reply_delay_ms, 10);
        assert_eq!(config.timing.canvas_delay_ms, 500);
        assert_eq!(config.member.tier, MembershipTier::Elite);
        assert_eq!(config.member.company_name, "Abu Dhabi Tech Solutions");
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timing = [").expect("write");
        let err = Config::load(Some(&path)).expect_err("should fail");
        assert!(matches!(err, PortalError::Config { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn canvas_gaps_follow_stage_order() {
        let gaps = TimingConfig::default().canvas_stage_gaps();
        assert_eq!(
            gaps.map(|gap| gap.as_millis()),
            [500, 1500, 1000]
        );
    }
}
