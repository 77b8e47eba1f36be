//! Pipeline configuration loading.
//!
//! Every field is optional; the defaults reproduce the reference board
//! timing.  The expected YAML structure is:
//! ```yaml
//! blinker:
//!   on_ms: 1000
//!   period_ms: 2000
//! sampler:
//!   period_ms: 2000
//!   upper_bound: 10000
//!   seed: 42          # omit to seed from the wall clock
//! ranker:
//!   period_ms: 1000
//! reporter:
//!   period_ms: 1000
//! serial:
//!   output: stdout    # stdout | stderr | path to a file
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::rank::DEFAULT_UPPER_BOUND;

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlinkerConfig {
    /// How long OUT0 stays asserted in each period.
    pub on_ms: u64,
    pub period_ms: u64,
}

impl Default for BlinkerConfig {
    fn default() -> Self {
        Self {
            on_ms: 1_000,
            period_ms: 2_000,
        }
    }
}

impl BlinkerConfig {
    pub fn on_time(&self) -> Duration {
        Duration::from_millis(self.on_ms)
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    pub period_ms: u64,
    /// Samples are drawn from `[0, upper_bound)`.
    pub upper_bound: u32,
    /// Fixed PRNG seed.  `None` seeds from the wall clock at startup.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            period_ms: 2_000,
            upper_bound: DEFAULT_UPPER_BOUND,
            seed: None,
        }
    }
}

impl SamplerConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

/// Period of a task that has no other setting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeriodConfig {
    pub period_ms: u64,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self { period_ms: 1_000 }
    }
}

impl PeriodConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

/// Where the serial channel writes on a host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SerialTarget {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

impl FromStr for SerialTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "stdout" | "-" => SerialTarget::Stdout,
            "stderr" => SerialTarget::Stderr,
            path => SerialTarget::File(PathBuf::from(path)),
        })
    }
}

impl fmt::Display for SerialTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialTarget::Stdout => write!(f, "stdout"),
            SerialTarget::Stderr => write!(f, "stderr"),
            SerialTarget::File(p) => write!(f, "{}", p.display()),
        }
    }
}

impl<'de> Deserialize<'de> for SerialTarget {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    pub output: SerialTarget,
}

// ── PipelineConfig ────────────────────────────────────────────────────────────

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub blinker: BlinkerConfig,
    pub sampler: SamplerConfig,
    pub ranker: PeriodConfig,
    pub reporter: PeriodConfig,
    pub serial: SerialConfig,
}

impl PipelineConfig {
    /// Parse and validate a YAML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid YAML for
    /// this layout, or fails [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading pipeline configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))?;

        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Parse and validate YAML text.  An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = if yaml.trim().is_empty() {
            PipelineConfig::default()
        } else {
            serde_yaml::from_str(yaml).context("Failed to parse YAML")?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no task could run with.
    pub fn validate(&self) -> Result<()> {
        for (task, period_ms) in [
            ("blinker", self.blinker.period_ms),
            ("sampler", self.sampler.period_ms),
            ("ranker", self.ranker.period_ms),
            ("reporter", self.reporter.period_ms),
        ] {
            if period_ms == 0 {
                bail!("{task}.period_ms must be greater than 0");
            }
        }
        if self.blinker.on_ms >= self.blinker.period_ms {
            bail!(
                "blinker.on_ms ({}) must be shorter than blinker.period_ms ({})",
                self.blinker.on_ms,
                self.blinker.period_ms
            );
        }
        if self.sampler.upper_bound == 0 {
            bail!("sampler.upper_bound must be greater than 0");
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_match_board_timing() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.blinker.on_time(), Duration::from_millis(1_000));
        assert_eq!(cfg.blinker.period(), Duration::from_millis(2_000));
        assert_eq!(cfg.sampler.period(), Duration::from_millis(2_000));
        assert_eq!(cfg.sampler.upper_bound, 10_000);
        assert_eq!(cfg.sampler.seed, None);
        assert_eq!(cfg.ranker.period(), Duration::from_millis(1_000));
        assert_eq!(cfg.reporter.period(), Duration::from_millis(1_000));
        assert_eq!(cfg.serial.output, SerialTarget::Stdout);
        cfg.validate().unwrap();
    }

    #[test]
    fn load_full_yaml() {
        let yaml = r#"
blinker:
  on_ms: 100
  period_ms: 400
sampler:
  period_ms: 500
  upper_bound: 50
  seed: 7
ranker:
  period_ms: 250
reporter:
  period_ms: 250
serial:
  output: /tmp/rank.log
"#;
        let f = yaml_tempfile(yaml);
        let cfg = PipelineConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.blinker.on_ms, 100);
        assert_eq!(cfg.blinker.period_ms, 400);
        assert_eq!(cfg.sampler.upper_bound, 50);
        assert_eq!(cfg.sampler.seed, Some(7));
        assert_eq!(cfg.ranker.period_ms, 250);
        assert_eq!(
            cfg.serial.output,
            SerialTarget::File(PathBuf::from("/tmp/rank.log"))
        );
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = PipelineConfig::from_yaml("sampler:\n  seed: 99\n").unwrap();
        assert_eq!(cfg.sampler.seed, Some(99));
        assert_eq!(cfg.sampler.period_ms, 2_000);
        assert_eq!(cfg.blinker, BlinkerConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            PipelineConfig::from_yaml("").unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = PipelineConfig::from_yaml("ranker:\n  period_ms: 0\n").unwrap_err();
        assert!(err.to_string().contains("ranker.period_ms"));
    }

    #[test]
    fn on_time_must_fit_in_period() {
        let err =
            PipelineConfig::from_yaml("blinker:\n  on_ms: 2000\n  period_ms: 2000\n").unwrap_err();
        assert!(err.to_string().contains("blinker.on_ms"));
    }

    #[test]
    fn zero_upper_bound_is_rejected() {
        assert!(PipelineConfig::from_yaml("sampler:\n  upper_bound: 0\n").is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(PipelineConfig::from_yaml("sampler:\n  batch: 8\n").is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = PipelineConfig::load_from_file(Path::new("/nonexistent/pipeline.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn serial_target_parsing() {
        assert_eq!("stdout".parse::<SerialTarget>().unwrap(), SerialTarget::Stdout);
        assert_eq!("-".parse::<SerialTarget>().unwrap(), SerialTarget::Stdout);
        assert_eq!("stderr".parse::<SerialTarget>().unwrap(), SerialTarget::Stderr);
        assert_eq!(
            "out.txt".parse::<SerialTarget>().unwrap(),
            SerialTarget::File(PathBuf::from("out.txt"))
        );
    }
}
