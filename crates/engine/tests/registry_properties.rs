// Property tests for registry lifecycle and type dispatch.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use bindparam_core::ops::ParamOp;
use bindparam_core::{ParamData, ParamKind, ParamValue};
use bindparam_engine::{Registry, RegistryError};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_value() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        any::<bool>().prop_map(ParamValue::Flag),
        any::<i64>().prop_map(ParamValue::Int),
        (-1e6..1e6f64).prop_map(ParamValue::Double),
        "[a-z]{0,8}".prop_map(ParamValue::String),
        prop::collection::vec("[a-z]{1,4}", 0..4).prop_map(ParamValue::StringVector),
        prop::collection::vec(any::<i64>(), 0..4).prop_map(ParamValue::IntVector),
    ]
}

/// Distinct identifiers that never collide with the persistent names
fn arb_identifiers(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("p_[a-z0-9_]{1,10}", 1..max).prop_map(|s| s.into_iter().collect())
}

fn arb_params(max: usize) -> impl Strategy<Value = Vec<ParamData>> {
    arb_identifiers(max).prop_flat_map(|ids| {
        let n = ids.len();
        (
            Just(ids),
            prop::collection::vec(arb_value(), n),
            prop::collection::vec(any::<(bool, bool, bool)>(), n),
        )
            .prop_map(|(ids, values, flags)| {
                ids.into_iter()
                    .zip(values)
                    .zip(flags)
                    .map(|((id, value), (required, input, no_transpose))| {
                        let mut p = ParamData::from_value(id.clone(), format!("{} option", id), value);
                        p.required = required;
                        p.input = input;
                        p.no_transpose = no_transpose;
                        p
                    })
                    .collect()
            })
    })
}

// ---------------------------------------------------------------------------
// Snapshot round-trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn store_clear_restore_roundtrip(params in arb_params(12), binding in "[A-Z][a-zA-Z]{0,10}") {
        let mut reg = Registry::new();
        reg.binding(&binding).params(params.clone()).commit().unwrap();

        reg.restore(&binding);
        let before = reg.active().clone();

        reg.store(&binding);
        reg.clear();
        prop_assert!(reg.active().is_empty());
        reg.restore(&binding);

        prop_assert_eq!(reg.active(), &before);
        for p in &params {
            let got = reg.active().get(&p.name).unwrap();
            prop_assert_eq!(&got.value, &p.value);
            prop_assert_eq!(got.required, p.required);
            prop_assert_eq!(got.input, p.input);
            prop_assert_eq!(got.no_transpose, p.no_transpose);
        }
    }
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn declarations_accumulate(params in arb_params(12)) {
        let mut reg = Registry::new();
        for p in &params {
            reg.declare("HMMTrain", p.clone()).unwrap();
            prop_assert!(reg.active().is_empty());
        }

        let snap = reg.snapshot("HMMTrain").unwrap();
        prop_assert_eq!(snap.len(), params.len());
        for p in &params {
            prop_assert!(snap.contains(&p.name));
        }
    }
}

// ---------------------------------------------------------------------------
// Idempotent type registration
// ---------------------------------------------------------------------------

#[test]
fn same_type_installs_one_entry() {
    let mut reg = Registry::new();
    reg.declare("HMMTrain", ParamData::new("states", "Hidden states.", 0i64)).unwrap();
    reg.declare("HMMTrain", ParamData::new("gaussians", "Gaussians per state.", 0i64)).unwrap();

    assert_eq!(reg.types().type_names(), vec!["int"]);
    let entry = reg.types().entry("int").unwrap();
    assert_eq!(entry.kind, ParamKind::Int);
    assert_eq!(entry.ops.len(), ParamOp::ALL.len());

    let ctx = reg.execution("HMMTrain").unwrap();
    for op in ParamOp::ALL {
        let a = ctx.dispatch("states", op).unwrap();
        let b = ctx.dispatch("gaussians", op).unwrap();
        if op != ParamOp::GetPrintableParamName {
            assert_eq!(a, b, "{} should agree for equal values", op);
        }
    }
}

// ---------------------------------------------------------------------------
// Persistent exemption
// ---------------------------------------------------------------------------

#[test]
fn persistent_params_skip_snapshots() {
    let mut reg = Registry::new();
    reg.declare("HMMTrain", ParamData::new("verbose", "Verbose output.", false).with_alias('v')).unwrap();
    reg.declare("HMMTrain", ParamData::new("copy_all_inputs", "Copy inputs.", false)).unwrap();

    // No restore/store happened for the binding
    assert!(reg.snapshot("HMMTrain").is_none());

    reg.declare("Perceptron", ParamData::new("max_iterations", "Max iterations.", 1000i64)).unwrap();
    reg.restore("Perceptron");
    reg.clear();

    let names = reg.active().names();
    assert_eq!(names, vec!["copy_all_inputs", "verbose"]);
    assert!(!reg.snapshot("Perceptron").unwrap().contains("verbose"));
}

// ---------------------------------------------------------------------------
// Alias uniqueness across bindings
// ---------------------------------------------------------------------------

fn verbose() -> ParamData {
    ParamData::new("verbose", "Verbose output.", false).with_alias('v')
}

fn vectors() -> ParamData {
    ParamData::new("vectors", "Vectors to cluster.", Vec::<i64>::new()).with_alias('v')
}

fn alias_owners(reg: &Registry, alias: char) -> Vec<&str> {
    reg.active()
        .iter()
        .filter(|p| p.alias == Some(alias))
        .map(|p| p.name.as_str())
        .collect()
}

#[test]
fn alias_clash_rejected_persistent_first() {
    let mut reg = Registry::new();
    reg.declare("HMMTrain", verbose()).unwrap();
    let err = reg.declare("KMeans", vectors()).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateAlias { alias: 'v', .. }), "{err}");

    assert!(reg.snapshot("KMeans").is_none());
    assert_eq!(alias_owners(&reg, 'v'), vec!["verbose"]);
}

#[test]
fn alias_clash_rejected_snapshot_first() {
    let mut reg = Registry::new();
    reg.declare("KMeans", vectors()).unwrap();
    let err = reg.declare("HMMTrain", verbose()).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateAlias { alias: 'v', .. }), "{err}");

    let ctx = reg.execution("KMeans").unwrap();
    assert_eq!(alias_owners(&ctx, 'v'), vec!["vectors"]);
    assert_eq!(ctx.active().by_alias('v').map(|p| p.name.as_str()), Some("vectors"));
    assert!(!ctx.active().contains("verbose"));
}

#[test]
fn persistent_redeclaration_cannot_reuse_snapshot_alias() {
    let mut reg = Registry::new();
    reg.declare("HMMTrain", ParamData::new("verbose", "Verbose output.", false)).unwrap();
    reg.declare("KMeans", vectors()).unwrap();

    // A later binding declares verbose again, this time with -v
    let err = reg.declare("Perceptron", verbose()).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateAlias { alias: 'v', .. }), "{err}");

    let ctx = reg.execution("KMeans").unwrap();
    assert_eq!(alias_owners(&ctx, 'v'), vec!["vectors"]);
    assert_eq!(ctx.active().get("verbose").unwrap().alias, None);
}

#[test]
fn builder_alias_clash_rejected_in_either_order() {
    for params in [vec![verbose(), vectors()], vec![vectors(), verbose()]] {
        let mut reg = Registry::new();
        let err = reg.binding("KMeans").params(params).commit().unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateAlias { alias: 'v', .. }), "{err}");
        assert!(reg.snapshot("KMeans").is_none());
        assert!(reg.active().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Empty restore
// ---------------------------------------------------------------------------

#[test]
fn restore_of_unknown_binding_is_empty() {
    let mut reg = Registry::new();
    reg.declare("HMMTrain", ParamData::new("states", "Hidden states.", 0i64)).unwrap();
    reg.restore("HMMTrain");
    reg.restore("KMeans");
    assert!(reg.active().is_empty());
    assert!(reg.snapshot("KMeans").is_none());
}

// ---------------------------------------------------------------------------
// Dispatch failure
// ---------------------------------------------------------------------------

#[test]
fn dispatch_on_unknown_type_fails() {
    let mut reg = Registry::new();
    reg.declare("HMMTrain", ParamData::new("states", "Hidden states.", 0i64)).unwrap();
    let ctx = reg.execution("HMMTrain").unwrap();

    for op in ParamOp::ALL {
        assert_eq!(
            ctx.dispatch_named("arma::mat", op.name(), "states"),
            Err(RegistryError::UnknownType { type_name: "arma::mat".into() })
        );
    }
    assert!(reg.types().lookup("arma::mat", ParamOp::GetParam).is_err());
}
