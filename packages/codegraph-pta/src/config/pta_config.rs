//! Pointer analysis configuration

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Largest accepted context depth.
///
/// Context strings longer than this blow up the number of context-qualified
/// entities without a practical precision gain.
pub const MAX_CONTEXT_DEPTH: usize = 8;

/// Which context selector drives the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    /// Context-insensitive (baseline)
    Insensitive,

    /// k-limiting call-string sensitivity (k-CFA)
    CallSite,

    /// k-object sensitivity (receiver allocation sites)
    Object,

    /// k-type sensitivity (class containing the receiver's allocation site)
    Type,

    /// Object sensitivity for instance calls, call-site for static calls
    Hybrid,
}

impl SelectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorKind::Insensitive => "ci",
            SelectorKind::CallSite => "call",
            SelectorKind::Object => "obj",
            SelectorKind::Type => "type",
            SelectorKind::Hybrid => "hybrid",
        }
    }
}

/// Context sensitivity variant plus depth, written as `ci` or `<k>-<kind>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextSensitivity {
    pub kind: SelectorKind,
    pub depth: usize,
}

impl ContextSensitivity {
    pub const INSENSITIVE: ContextSensitivity = ContextSensitivity {
        kind: SelectorKind::Insensitive,
        depth: 0,
    };

    pub fn call_site(k: usize) -> Self {
        Self {
            kind: SelectorKind::CallSite,
            depth: k,
        }
    }

    pub fn object(k: usize) -> Self {
        Self {
            kind: SelectorKind::Object,
            depth: k,
        }
    }

    pub fn type_sensitive(k: usize) -> Self {
        Self {
            kind: SelectorKind::Type,
            depth: k,
        }
    }

    pub fn hybrid(k: usize) -> Self {
        Self {
            kind: SelectorKind::Hybrid,
            depth: k,
        }
    }
}

impl Default for ContextSensitivity {
    fn default() -> Self {
        Self::INSENSITIVE
    }
}

impl fmt::Display for ContextSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SelectorKind::Insensitive => write!(f, "ci"),
            kind => write!(f, "{}-{}", self.depth, kind.as_str()),
        }
    }
}

impl FromStr for ContextSensitivity {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        let spec = s.trim();
        if spec.eq_ignore_ascii_case("ci") {
            return Ok(Self::INSENSITIVE);
        }
        if spec.starts_with('-') {
            return Err(ConfigError::invalid_sensitivity(
                s,
                "depth must not be negative",
            ));
        }

        let (depth, kind) = spec
            .split_once('-')
            .ok_or_else(|| ConfigError::invalid_sensitivity(s, "missing '-' separator"))?;
        let depth: usize = depth
            .parse()
            .map_err(|_| ConfigError::invalid_sensitivity(s, "depth is not a number"))?;
        let kind = match kind.to_ascii_lowercase().as_str() {
            "obj" | "object" => SelectorKind::Object,
            "call" | "cfa" => SelectorKind::CallSite,
            "type" => SelectorKind::Type,
            "hybrid" => SelectorKind::Hybrid,
            other => {
                return Err(ConfigError::invalid_sensitivity(
                    s,
                    format!("unknown selector kind '{}'", other),
                ))
            }
        };

        let parsed = Self { kind, depth };
        parsed.validate()?;
        Ok(parsed)
    }
}

impl TryFrom<String> for ContextSensitivity {
    type Error = ConfigError;

    fn try_from(value: String) -> ConfigResult<Self> {
        value.parse()
    }
}

impl From<ContextSensitivity> for String {
    fn from(value: ContextSensitivity) -> Self {
        value.to_string()
    }
}

impl Validatable for ContextSensitivity {
    fn validate(&self) -> ConfigResult<()> {
        match self.kind {
            SelectorKind::Insensitive if self.depth != 0 => Err(ConfigError::range_with_hint(
                "context_sensitivity.depth",
                self.depth,
                0,
                0,
                "Context-insensitive analysis has no depth",
            )),
            SelectorKind::Insensitive => Ok(()),
            _ if self.depth == 0 || self.depth > MAX_CONTEXT_DEPTH => {
                Err(ConfigError::range_with_hint(
                    "context_sensitivity.depth",
                    self.depth,
                    1,
                    MAX_CONTEXT_DEPTH,
                    "Use 'ci' for context-insensitive analysis",
                ))
            }
            _ => Ok(()),
        }
    }

    fn config_name(&self) -> &'static str {
        "ContextSensitivity"
    }
}

/// Worklist discipline. Both reach the same fixpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorklistOrder {
    /// Queue: oldest entry first
    #[default]
    Fifo,

    /// Stack: newest entry first
    Lifo,
}

impl FromStr for WorklistOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(WorklistOrder::Fifo),
            "lifo" => Ok(WorklistOrder::Lifo),
            other => Err(ConfigError::UnknownWorklistOrder(other.to_string())),
        }
    }
}

/// Named starting points for [`PtaConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Context-insensitive
    Fast,

    /// 1-object sensitivity
    Balanced,

    /// 2-object sensitivity
    Precise,
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Preset::Fast),
            "balanced" => Ok(Preset::Balanced),
            "precise" => Ok(Preset::Precise),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

/// Pointer analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PtaConfig {
    /// Context sensitivity variant and depth
    pub context_sensitivity: ContextSensitivity,

    /// Worklist discipline
    pub worklist_order: WorklistOrder,

    /// Build the object → variables index eagerly when the result is created
    pub build_alias_index: bool,
}

impl Default for PtaConfig {
    fn default() -> Self {
        Self::preset(Preset::Fast)
    }
}

impl PtaConfig {
    /// Create config from preset
    pub fn preset(preset: Preset) -> Self {
        let context_sensitivity = match preset {
            Preset::Fast => ContextSensitivity::INSENSITIVE,
            Preset::Balanced => ContextSensitivity::object(1),
            Preset::Precise => ContextSensitivity::object(2),
        };
        Self {
            context_sensitivity,
            worklist_order: WorklistOrder::Fifo,
            build_alias_index: false,
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: PtaConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builder: Set context sensitivity
    pub fn context_sensitivity(mut self, v: ContextSensitivity) -> Self {
        self.context_sensitivity = v;
        self
    }

    /// Builder: Set worklist order
    pub fn worklist_order(mut self, v: WorklistOrder) -> Self {
        self.worklist_order = v;
        self
    }

    /// Builder: Set build_alias_index
    pub fn build_alias_index(mut self, v: bool) -> Self {
        self.build_alias_index = v;
        self
    }
}

impl Validatable for PtaConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.context_sensitivity.validate()
    }

    fn config_name(&self) -> &'static str {
        "PtaConfig"
    }
}
