//! Registry lifecycle, duplicate handling, and batch validation.

use std::process::Command;
use std::sync::Arc;
use std::thread;

use opschema_core::config::{SchemaConfig, ValidationMode};
use opschema_core::def::OperatorDef;
use opschema_core::location::SourceLocation;
use opschema_registry::{
    operator_schema, operator_schema_str, Error, FailureKind, SchemaRegistry,
    SchemaRegistryBuilder,
};
use opschema_rules::SchemaViolation;

fn math_registry() -> SchemaRegistry {
    let mut builder = SchemaRegistryBuilder::new();
    operator_schema!(builder, Add)
        .num_inputs(2)
        .num_outputs(1)
        .allow_inplace([(0, 0), (1, 0)]);
    operator_schema!(builder, Relu)
        .num_inputs(1)
        .num_outputs(1)
        .allow_one_to_one_inplace();
    operator_schema_str!(builder, "Split")
        .num_inputs(1)
        .num_outputs_range(1, 16);
    operator_schema!(builder, Copy).same_number_of_output();
    builder.freeze().expect("freeze failed")
}

#[test]
fn test_lookup_registered_and_absent() {
    let registry = math_registry();
    assert_eq!(registry.len(), 4);

    let relu = registry.lookup("Relu").expect("Relu registered");
    assert!(relu.file().ends_with("registry_tests.rs"));
    assert!(relu.line() > 0);

    // Unknown types are absent, never a default schema.
    assert!(registry.lookup("Conv").is_none());
    assert!(registry.lookup("").is_none());
}

#[test]
fn test_duplicate_registration_is_reported_with_both_sites() {
    let mut builder = SchemaRegistryBuilder::new();
    builder
        .try_register("Relu", SourceLocation::new("ops/relu.rs", 3))
        .unwrap()
        .num_inputs(1);

    // Same constraints still count as a duplicate.
    let err = builder
        .try_register("Relu", SourceLocation::new("ops/activations.rs", 88))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateRegistration { .. }));
    let msg = err.to_string();
    assert!(msg.contains("ops/activations.rs line 88"), "{msg}");
    assert!(msg.contains("ops/relu.rs line 3"), "{msg}");
}

#[test]
fn test_duplicate_register_aborts_process() {
    const CHILD_ENV: &str = "OPSCHEMA_DUPLICATE_ABORT_CHILD";

    if std::env::var_os(CHILD_ENV).is_some() {
        let mut builder = SchemaRegistryBuilder::new();
        builder.register("Relu", SourceLocation::new("ops/relu.rs", 3));
        builder.register("Relu", SourceLocation::new("ops/activations.rs", 88));
        unreachable!("duplicate registration must abort");
    }

    let exe = std::env::current_exe().expect("test binary path");
    let output = Command::new(exe)
        .args([
            "test_duplicate_register_aborts_process",
            "--exact",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(CHILD_ENV, "1")
        .output()
        .expect("spawn child test");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already registered from ops/relu.rs line 3"), "{stderr}");
    assert!(stderr.contains("ops/activations.rs line 88"), "{stderr}");
}

#[test]
fn test_calculate_output_through_registry() {
    let registry = math_registry();
    assert_eq!(registry.calculate_output("Copy", 3), Some(3));
    assert_eq!(registry.calculate_output("Copy", 0), Some(0));
    assert_eq!(registry.calculate_output("Add", 2), None);
    assert_eq!(registry.calculate_output("Conv", 2), None);
}

#[test]
fn test_check_dispatches_on_op_type() {
    let registry = math_registry();

    let add_inplace = OperatorDef::new("Add").with_inputs(["a", "b"]).with_outputs(["b"]);
    assert_eq!(registry.check(&add_inplace), Some(Ok(())));

    let split = OperatorDef::new("Split").with_inputs(["x"]).with_outputs(Vec::<String>::new());
    assert!(matches!(
        registry.check(&split),
        Some(Err(SchemaViolation::OutputArity { count: 0, .. }))
    ));

    let conv = OperatorDef::new("Conv").with_inputs(["x", "w"]).with_outputs(["y"]);
    assert_eq!(registry.check(&conv), None);
}

fn graph_fixture() -> Vec<OperatorDef> {
    serde_json::from_str(
        r#"[
            {"type": "Relu", "name": "r0", "inputs": ["x"], "outputs": ["x"]},
            {"type": "Add", "name": "a0", "inputs": ["x", "y"], "outputs": ["y"]},
            {"type": "Add", "name": "a1", "inputs": ["x"], "outputs": ["z"]},
            {"type": "Conv", "name": "c0", "inputs": ["z", "w"], "outputs": ["out"]},
            {"type": "Relu", "name": "r1", "inputs": ["p", "q"], "outputs": ["q"]},
            {"type": "Copy", "name": "cp", "inputs": ["p", "q"], "outputs": ["p2"]}
        ]"#,
    )
    .expect("fixture parses")
}

#[test]
fn test_validate_all_permissive_collects_every_violation() {
    let registry = math_registry();
    let defs = graph_fixture();

    let failures = registry
        .validate_all_with_mode(&defs, ValidationMode::Permissive)
        .unwrap_err();

    let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![2, 4, 5]);

    assert_eq!(failures[0].op_type, "Add");
    assert!(matches!(
        failures[0].kind,
        FailureKind::Violation(SchemaViolation::InputArity { count: 1, .. })
    ));
    assert!(matches!(
        failures[1].kind,
        FailureKind::Violation(SchemaViolation::InputArity { count: 2, .. })
    ));
    assert_eq!(
        failures[2].kind,
        FailureKind::Violation(SchemaViolation::CalculatorMismatch {
            inputs: 2,
            expected: 2,
            actual: 1
        })
    );
    assert_eq!(
        failures[0].to_string(),
        "operator #2 (Add a1): 1 inputs given, expected exactly 2"
    );
    assert_eq!(failures[1].name, "r1");
}

#[test]
fn test_validate_all_follows_configured_mode() {
    let defs = graph_fixture();

    // Default config is permissive: Conv is skipped.
    let permissive = math_registry();
    assert_eq!(permissive.validate_all(&defs).unwrap_err().len(), 3);

    let mut builder = SchemaRegistryBuilder::with_config(SchemaConfig::default().strict());
    operator_schema!(builder, Relu).num_inputs(1).num_outputs(1);
    let strict = builder.freeze().unwrap();
    let failures = strict.validate_all(&defs).unwrap_err();
    assert!(failures
        .iter()
        .any(|f| f.op_type == "Conv" && f.kind == FailureKind::UnknownOperatorType));

    // An explicit mode overrides the configured one.
    assert!(strict
        .validate_all_with_mode(&defs[3..4], ValidationMode::Permissive)
        .is_ok());
}

#[test]
fn test_anonymous_instance_report() {
    let registry = math_registry();
    let defs = vec![OperatorDef::new("Relu").with_inputs(["x", "y"]).with_outputs(["z"])];
    let failures = registry.validate_all(&defs).unwrap_err();
    assert!(failures[0].name.is_empty());
    assert_eq!(
        failures[0].to_string(),
        "operator #0 (Relu): 2 inputs given, expected exactly 1"
    );
}

#[test]
fn test_register_name_held_in_variable() {
    let mut builder = SchemaRegistryBuilder::new();
    let op_name = String::from("Relu");
    operator_schema_str!(builder, op_name.clone()).num_inputs(1);
    operator_schema_str!(builder, format!("{op_name}Grad")).num_inputs(2);
    // A bare identifier is stringified, not evaluated.
    operator_schema!(builder, op_name);
    let registry = builder.freeze().unwrap();

    assert!(registry.lookup("Relu").is_some());
    assert!(registry.lookup("ReluGrad").is_some());
    assert!(registry.lookup("op_name").is_some());
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_validate_all_strict_reports_unknown_types() {
    let registry = math_registry();
    let defs = graph_fixture();

    let failures = registry
        .validate_all_with_mode(&defs, ValidationMode::Strict)
        .unwrap_err();
    let unknown: Vec<&str> = failures
        .iter()
        .filter(|f| f.kind == FailureKind::UnknownOperatorType)
        .map(|f| f.op_type.as_str())
        .collect();
    assert_eq!(unknown, vec!["Conv"]);
    assert_eq!(failures.len(), 4);
}

#[test]
fn test_validate_all_ok() {
    let registry = math_registry();
    let defs = vec![
        OperatorDef::new("Relu").with_inputs(["x"]).with_outputs(["y"]),
        OperatorDef::new("Add").with_inputs(["y", "b"]).with_outputs(["y"]),
    ];
    assert!(registry
        .validate_all_with_mode(&defs, ValidationMode::Strict)
        .is_ok());
    assert!(registry
        .validate_all_with_mode(&Vec::<OperatorDef>::new(), ValidationMode::Strict)
        .is_ok());
}

#[test]
fn test_config_mode_drives_verify() {
    let mut builder = SchemaRegistryBuilder::with_config(SchemaConfig::default().strict());
    operator_schema!(builder, Relu).num_inputs(1).num_outputs(1);
    let registry = builder.freeze().unwrap();

    let relu = OperatorDef::new("Relu").with_inputs(["x"]).with_outputs(["y"]);
    let conv = OperatorDef::new("Conv").with_inputs(["x"]).with_outputs(["y"]);
    assert!(registry.verify(&relu));
    assert!(!registry.verify(&conv));
}

#[test]
fn test_freeze_catches_enforced_but_not_allowed() {
    let mut builder = SchemaRegistryBuilder::new();
    operator_schema!(builder, Relu).num_inputs(1).num_outputs(1).allow_one_to_one_inplace();
    operator_schema!(builder, Scale)
        .num_inputs(1)
        .num_outputs(1)
        .enforce_inplace([(0, 0)]);

    let err = builder.freeze().unwrap_err();
    match err {
        Error::InvalidSchema { name, input, output, .. } => {
            assert_eq!(name, "Scale");
            assert_eq!((input, output), (0, 0));
        }
        other => panic!("expected InvalidSchema, got {other:?}"),
    }
}

#[test]
fn test_concurrent_reads_after_freeze() {
    let registry = Arc::new(math_registry());
    let mut handles = Vec::new();

    for t in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let def = OperatorDef::new("Relu")
                .with_inputs([format!("x{t}")])
                .with_outputs([format!("x{t}")]);
            for _ in 0..100 {
                assert!(registry.verify(&def));
                assert_eq!(registry.calculate_output("Copy", t), Some(t));
            }
        }));
    }

    for h in handles {
        h.join().expect("reader thread panicked");
    }
}
