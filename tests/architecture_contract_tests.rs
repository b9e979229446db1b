//! Architecture contract tests.

mod support;

use support::architecture::{
    find_code_lines_containing, find_lines_containing, path_exists, read_relative,
};

#[test]
fn domain_has_no_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "rayon::",
            "tracing::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::application",
            "crate::infrastructure",
        ],
    );
    assert!(
        hits.is_empty(),
        "ports should depend only on domain types: {hits:#?}"
    );
}

#[test]
fn application_layer_has_no_direct_adapter_imports() {
    let hits = find_lines_containing("src/application", &["crate::adapter::"]);
    assert!(
        hits.is_empty(),
        "application layer should not import adapters directly: {hits:#?}"
    );
}

#[test]
fn application_layer_does_not_read_config_files() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::infrastructure", "std::fs", "toml::"],
    );
    assert!(
        hits.is_empty(),
        "application layer should receive settings, not load them: {hits:#?}"
    );
}

#[test]
fn adapters_do_not_reach_into_application() {
    let hits = find_lines_containing("src/adapter", &["crate::application"]);
    assert!(
        hits.is_empty(),
        "adapters should implement ports without calling the pipeline: {hits:#?}"
    );
}

#[test]
fn ledger_contract_lives_in_outbound_port() {
    assert!(
        path_exists("src/port/outbound/ledger.rs"),
        "BetLedger trait should live under port/outbound"
    );
    for adapter in [
        "src/adapter/outbound/memory.rs",
        "src/adapter/outbound/jsonl.rs",
    ] {
        let source = read_relative(adapter);
        assert!(
            source.contains("impl BetLedger for"),
            "`{adapter}` should implement the BetLedger port"
        );
    }
}

#[test]
fn simulation_engine_is_split_by_concern() {
    for file in [
        "src/application/simulation/engine.rs",
        "src/application/simulation/mechanics.rs",
        "src/application/simulation/correlated.rs",
        "src/application/simulation/cancel.rs",
    ] {
        assert!(path_exists(file), "expected simulation module `{file}`");
    }
}

#[test]
fn library_code_does_not_unwrap() {
    let hits: Vec<_> = find_code_lines_containing("src", &[".unwrap()", ".expect("])
        .into_iter()
        .filter(|(path, _, _)| !path.starts_with("src/testkit/"))
        .collect();
    assert!(
        hits.is_empty(),
        "library code should propagate errors instead of panicking: {hits:#?}"
    );
}

#[test]
fn decimal_macros_are_test_only() {
    let hits = find_code_lines_containing("src", &["dec!(", "rust_decimal_macros"]);
    assert!(
        hits.is_empty(),
        "library code should build decimals without test macros: {hits:#?}"
    );

    let manifest = read_relative("Cargo.toml");
    let dev_section = manifest
        .find("[dev-dependencies]")
        .expect("manifest has dev-dependencies");
    let declared = manifest
        .find("rust_decimal_macros")
        .expect("rust_decimal_macros is declared");
    assert!(
        declared > dev_section,
        "rust_decimal_macros belongs in [dev-dependencies]"
    );
}
