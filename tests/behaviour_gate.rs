//! Behaviour-driven tests for the verification-gated install pipeline.
//!
//! These scenarios run the full batch pipeline through the public API with
//! a scripted delegate engine: a matching digest installs, an unannotated
//! requirement blocks the batch, a poisoned cache entry fails verification,
//! and digest rotation passes on any match.

mod support;

use hashgate::manifest::Manifest;
use hashgate::pipeline::{PipelineContext, run_batch};
use hashgate::report::{BatchReport, EXIT_SUCCESS, EXIT_VERIFICATION_FAILED};
use hashgate::test_utils::sha256_urlsafe;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use support::ScriptedEngine;

const PAYLOAD: &[u8] = b"useless package payload";

#[derive(Default)]
struct GateWorld {
    manifest_text: RefCell<String>,
    engine: RefCell<Option<ScriptedEngine>>,
    report: RefCell<Option<BatchReport>>,
}

#[fixture]
fn gate_world() -> GateWorld {
    GateWorld::default()
}

#[given("an index serving a package whose digest matches the manifest")]
fn given_matching_package(gate_world: &GateWorld) {
    let mut engine = ScriptedEngine::default();
    engine.serve("useless==1.0", PAYLOAD);
    gate_world.engine.replace(Some(engine));
    gate_world.manifest_text.replace(format!(
        "# sha256: {}\nuseless==1.0\n",
        sha256_urlsafe(PAYLOAD)
    ));
}

#[given("a manifest whose requirement has no digest annotation")]
fn given_unannotated_requirement(gate_world: &GateWorld) {
    let mut engine = ScriptedEngine::default();
    engine.serve("useless==1.0", PAYLOAD);
    gate_world.engine.replace(Some(engine));
    gate_world
        .manifest_text
        .replace("useless==1.0\n".to_owned());
}

#[given("a poisoned artefact staged under a correct manifest digest")]
fn given_poisoned_artefact(gate_world: &GateWorld) {
    // The engine stages an empty placeholder, as a poisoned cache would;
    // the manifest expects the real package's digest.
    let mut engine = ScriptedEngine::default();
    engine.serve("useless==1.0", b"");
    gate_world.engine.replace(Some(engine));
    gate_world.manifest_text.replace(format!(
        "# sha256: {}\nuseless==1.0\n",
        sha256_urlsafe(PAYLOAD)
    ));
}

#[given("an index serving a package matching the second of two annotated digests")]
fn given_rotated_digests(gate_world: &GateWorld) {
    let mut engine = ScriptedEngine::default();
    engine.serve("useless==1.0", PAYLOAD);
    gate_world.engine.replace(Some(engine));
    gate_world.manifest_text.replace(format!(
        "# sha256: badbadbad\n# sha256: {}\nuseless==1.0\n",
        sha256_urlsafe(PAYLOAD)
    ));
}

#[given("an index that cannot serve the requested package")]
fn given_unservable_package(gate_world: &GateWorld) {
    let mut engine = ScriptedEngine::default();
    engine.fail_download("useless==1.0");
    gate_world.engine.replace(Some(engine));
    gate_world
        .manifest_text
        .replace("# sha256: abc123\nuseless==1.0\n".to_owned());
}

#[when("the gated install runs")]
fn when_gated_install_runs(gate_world: &GateWorld) {
    let engine = gate_world.engine.borrow();
    let engine = engine.as_ref().expect("engine not scripted");
    let requirements = Manifest::parse(&gate_world.manifest_text.borrow()).into_requirements();

    let context = PipelineContext {
        engine,
        quiet: true,
    };
    let mut stderr = Vec::new();
    let report = run_batch(&requirements, &context, &mut stderr).expect("batch runs");
    gate_world.report.replace(Some(report));
}

#[then("the batch verifies and the package is installed")]
fn then_batch_verifies_and_installs(gate_world: &GateWorld) {
    let report = gate_world.report.borrow();
    let report = report.as_ref().expect("batch not run");
    assert!(report.all_verified());
    assert_eq!(report.exit_code(), EXIT_SUCCESS);

    let engine = gate_world.engine.borrow();
    let engine = engine.as_ref().expect("engine not scripted");
    assert_eq!(engine.installed(), vec!["useless==1.0".to_owned()]);
}

#[then("the batch fails verification and nothing is installed")]
fn then_batch_fails_with_zero_installs(gate_world: &GateWorld) {
    let report = gate_world.report.borrow();
    let report = report.as_ref().expect("batch not run");
    assert!(!report.all_verified());
    assert_eq!(report.exit_code(), EXIT_VERIFICATION_FAILED);

    let engine = gate_world.engine.borrow();
    let engine = engine.as_ref().expect("engine not scripted");
    assert!(engine.installed().is_empty());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/gate.feature", index = 0)]
fn scenario_verified_batch_installs(gate_world: GateWorld) {
    let _ = gate_world;
}

#[scenario(path = "tests/features/gate.feature", index = 1)]
fn scenario_unannotated_requirement_blocks_batch(gate_world: GateWorld) {
    let _ = gate_world;
}

#[scenario(path = "tests/features/gate.feature", index = 2)]
fn scenario_poisoned_cache_never_installs(gate_world: GateWorld) {
    let _ = gate_world;
}

#[scenario(path = "tests/features/gate.feature", index = 3)]
fn scenario_rotated_digests_pass_on_any_match(gate_world: GateWorld) {
    let _ = gate_world;
}

#[scenario(path = "tests/features/gate.feature", index = 4)]
fn scenario_staging_failure_blocks_batch(gate_world: GateWorld) {
    let _ = gate_world;
}
