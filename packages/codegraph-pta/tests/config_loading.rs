//! Configuration loading and validation through the public API

mod common;

use codegraph_pta::config::{
    ConfigError, ContextSensitivity, Preset, PtaConfig, Validatable, WorklistOrder,
};
use codegraph_pta::features::points_to::PointerAnalysis;
use codegraph_pta::PtaError;
use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn test_yaml_document_is_parsed_and_validated() {
    let yaml = r#"
context_sensitivity: 2-obj
worklist_order: lifo
build_alias_index: true
"#;
    let config = PtaConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(
        config,
        PtaConfig::default()
            .context_sensitivity(ContextSensitivity::object(2))
            .worklist_order(WorklistOrder::Lifo)
            .build_alias_index(true)
    );
}

#[test]
fn test_missing_yaml_keys_use_defaults() {
    let config = PtaConfig::from_yaml_str("context_sensitivity: 1-call\n").unwrap();
    assert_eq!(config.context_sensitivity, ContextSensitivity::call_site(1));
    assert_eq!(config.worklist_order, WorklistOrder::Fifo);
    assert!(!config.build_alias_index);
}

#[test]
fn test_bad_yaml_sensitivity_is_rejected() {
    for bad in ["0-obj", "9-call", "-1-obj", "2-stack", "twoobj"] {
        let yaml = format!("context_sensitivity: \"{}\"\n", bad);
        assert!(PtaConfig::from_yaml_str(&yaml).is_err(), "accepted {}", bad);
    }
    let err = PtaConfig::from_yaml_str("worklist_order: random\n").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_yaml_file_round_trip() {
    let config = PtaConfig::preset(Preset::Precise).worklist_order(WorklistOrder::Lifo);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

    let loaded = PtaConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PtaConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_invalid_depth_rejected_before_any_solving() {
    let config = PtaConfig {
        context_sensitivity: ContextSensitivity::object(0),
        ..PtaConfig::default()
    };
    let err = PointerAnalysis::new(config).unwrap_err();
    assert!(matches!(err, PtaError::Config(ConfigError::Range { .. })));
}

#[test]
fn test_presets_run_end_to_end() {
    let fx = field_program();
    for (preset, selector) in [
        (Preset::Fast, "ci"),
        (Preset::Balanced, "1-obj"),
        (Preset::Precise, "2-obj"),
    ] {
        let result = PointerAnalysis::new(PtaConfig::preset(preset))
            .unwrap()
            .analyze(&fx.world)
            .unwrap();
        assert_eq!(result.selector(), selector);
        assert!(!result.points_to_set_of(fx.ra).is_empty());
    }
}
