//! Threshold rule configuration types

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable prefix used by [`RuleConfig::from_env`]
pub const ENV_PREFIX: &str = "WATERMARK_";

/// Which side of a bound counts as a breach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Breach when value > bound
    #[default]
    Above,
    /// Breach when value < bound
    Below,
}

/// Alert severity of a single bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    /// Lower-case severity label
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, unvalidated rule options as read from a file or the environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Warning bound
    pub warning: Option<f64>,
    /// Critical bound
    pub critical: Option<f64>,
    /// Comparison direction
    pub direction: Direction,
    /// Trailing sample count for rising-trend suppression
    pub hysteresis_window: Option<i64>,
    /// Breaching series needed before the overall status escalates
    pub min_breaching_nodes: Option<i64>,
}

impl RuleConfig {
    /// Create an empty option bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set warning bound
    pub fn with_warning(mut self, bound: f64) -> Self {
        self.warning = Some(bound);
        self
    }

    /// Set critical bound
    pub fn with_critical(mut self, bound: f64) -> Self {
        self.critical = Some(bound);
        self
    }

    /// Set comparison direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set rising-trend window
    pub fn with_hysteresis_window(mut self, samples: i64) -> Self {
        self.hysteresis_window = Some(samples);
        self
    }

    /// Set node quorum
    pub fn with_min_breaching_nodes(mut self, nodes: i64) -> Self {
        self.min_breaching_nodes = Some(nodes);
        self
    }

    /// Read options from environment variables
    /// WATERMARK_WARNING=80
    /// WATERMARK_CRITICAL=95
    /// WATERMARK_BELOW=true
    /// WATERMARK_RESET_WINDOW=5
    /// WATERMARK_NODES=2
    pub fn from_env() -> Result<Self, RuleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary key lookup (keys carry [`ENV_PREFIX`])
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(format!("{ENV_PREFIX}{name}").as_str())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let direction = match get("BELOW").as_deref() {
            Some("true") | Some("1") => Direction::Below,
            _ => Direction::Above,
        };

        Ok(Self {
            warning: parse_opt(get("WARNING"), "WARNING")?,
            critical: parse_opt(get("CRITICAL"), "CRITICAL")?,
            direction,
            hysteresis_window: parse_opt(get("RESET_WINDOW"), "RESET_WINDOW")?,
            min_breaching_nodes: parse_opt(get("NODES"), "NODES")?,
        })
    }

    /// Load options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

fn parse_opt<T: std::str::FromStr>(
    value: Option<String>,
    name: &str,
) -> Result<Option<T>, RuleError> {
    value
        .map(|v| {
            v.parse::<T>().map_err(|_| RuleError::InvalidValue {
                key: format!("{ENV_PREFIX}{name}"),
                value: v,
            })
        })
        .transpose()
}

/// Validated, immutable threshold rule
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRule {
    warning: Option<f64>,
    critical: Option<f64>,
    direction: Direction,
    hysteresis_window: Option<NonZeroUsize>,
    min_breaching_nodes: Option<NonZeroUsize>,
}

impl ThresholdRule {
    /// Warning bound, if any
    pub fn warning(&self) -> Option<f64> {
        self.warning
    }

    /// Critical bound, if any
    pub fn critical(&self) -> Option<f64> {
        self.critical
    }

    /// Comparison direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Trailing samples checked for a rising trend
    pub fn hysteresis_window(&self) -> Option<usize> {
        self.hysteresis_window.map(NonZeroUsize::get)
    }

    /// Breaching series required to escalate
    pub fn min_breaching_nodes(&self) -> Option<usize> {
        self.min_breaching_nodes.map(NonZeroUsize::get)
    }

    /// Bound configured for a severity
    pub fn bound(&self, severity: Severity) -> Option<f64> {
        match severity {
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }

    /// Whether any comparison can be performed at all
    pub fn has_bounds(&self) -> bool {
        self.warning.is_some() || self.critical.is_some()
    }
}

impl TryFrom<RuleConfig> for ThresholdRule {
    type Error = RuleError;

    fn try_from(config: RuleConfig) -> Result<Self, Self::Error> {
        for (severity, bound) in [
            (Severity::Warning, config.warning),
            (Severity::Critical, config.critical),
        ] {
            if let Some(b) = bound {
                if !b.is_finite() {
                    return Err(RuleError::InvalidBound { severity, bound: b });
                }
            }
        }

        let hysteresis_window = config
            .hysteresis_window
            .map(|w| positive(w).ok_or(RuleError::InvalidHysteresisWindow(w)))
            .transpose()?;
        let min_breaching_nodes = config
            .min_breaching_nodes
            .map(|n| positive(n).ok_or(RuleError::InvalidNodes(n)))
            .transpose()?;

        Ok(Self {
            warning: config.warning,
            critical: config.critical,
            direction: config.direction,
            hysteresis_window,
            min_breaching_nodes,
        })
    }
}

fn positive(n: i64) -> Option<NonZeroUsize> {
    usize::try_from(n).ok().and_then(NonZeroUsize::new)
}

/// Rule configuration errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Node count cannot be < 1 (got {0})")]
    InvalidNodes(i64),

    #[error("Hysteresis window cannot be < 1 (got {0})")]
    InvalidHysteresisWindow(i64),

    #[error("Invalid {severity} bound: {bound}")]
    InvalidBound { severity: Severity, bound: f64 },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid rule JSON: {0}")]
    Json(#[from] serde_json::Error),
}
