//! Analysis configuration
//!
//! Three ways to obtain a [`PtaConfig`]:
//! - Preset: `PtaConfig::preset(Preset::Balanced)`
//! - Builder: `PtaConfig::default().context_sensitivity("2-obj".parse()?)`
//! - YAML: `PtaConfig::from_yaml_file("pta.yaml")?`
//!
//! ```yaml
//! context_sensitivity: 2-obj
//! worklist_order: fifo
//! build_alias_index: true
//! ```

pub mod error;
pub mod pta_config;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use pta_config::{
    ContextSensitivity, Preset, PtaConfig, SelectorKind, WorklistOrder, MAX_CONTEXT_DEPTH,
};
pub use validation::Validatable;
