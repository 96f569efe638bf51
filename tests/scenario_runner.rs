//! Runs the shipped feature files against an in-memory pet store.

#![expect(clippy::expect_used, reason = "integration tests; panics are acceptable")]

mod support;

use std::sync::Arc;

use camino::Utf8Path;
use petstore_harness::scenario::{StepStatus, parse_feature};
use petstore_harness::{ContextSettings, ScenarioRunner, StepRegistry, TagFilter};
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::fake_petstore::{FakePetStore, SEEDED_PET_IDS};
use support::{TEST_TIMEOUT, create_temp_dir, settings_for, unreachable_base_url, utf8_path};

fn features_dir() -> &'static Utf8Path {
    Utf8Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/features"))
}

fn runner(settings: ContextSettings) -> ScenarioRunner {
    let registry = StepRegistry::standard().expect("standard bindings register");
    ScenarioRunner::new(Arc::new(registry), settings)
}

#[tokio::test]
async fn shipped_features_pass_and_clean_up() {
    let (server, store) = FakePetStore::start().await;

    let report = runner(settings_for(&server))
        .with_workers(4)
        .run_dir(features_dir())
        .await
        .expect("features load");

    let failures: Vec<_> = report
        .scenarios
        .iter()
        .filter(|scenario| !scenario.passed)
        .map(|scenario| (scenario.name.clone(), scenario.steps.clone()))
        .collect();
    assert!(failures.is_empty(), "failing scenarios: {failures:#?}");
    assert_eq!(report.summary.total, 16);
    assert!(report.summary.is_success());

    assert_eq!(store.pet_ids(), SEEDED_PET_IDS.to_vec());
    assert!(store.usernames().is_empty(), "users left behind: {:?}", store.usernames());
}

#[tokio::test]
async fn every_scenario_records_final_evidence() {
    let (server, _store) = FakePetStore::start().await;

    let report = runner(settings_for(&server))
        .run_dir(features_dir())
        .await
        .expect("features load");

    for scenario in &report.scenarios {
        let evidence = scenario
            .final_evidence
            .as_ref()
            .unwrap_or_else(|| panic!("{} has no final evidence", scenario.name));
        assert!(evidence.url.starts_with(&server.uri()), "unexpected url {}", evidence.url);
    }
}

#[rstest]
#[case::smoke_pets("@smoke and @pet", &["Create a new pet", "Delete a pet"])]
#[case::store_reads("@store and @read", &["Get an order by id"])]
#[case::excluding("@user and not @regression", &["Create a user", "Delete a user"])]
#[tokio::test]
async fn tag_filter_selects_scenarios(#[case] expression: &str, #[case] expected: &[&str]) {
    let (server, _store) = FakePetStore::start().await;
    let filter = TagFilter::parse(expression).expect("valid expression");

    let report = runner(settings_for(&server))
        .with_filter(filter)
        .run_dir(features_dir())
        .await
        .expect("features load");

    let names: Vec<&str> = report.scenarios.iter().map(|scenario| scenario.name.as_str()).collect();
    assert_eq!(names, expected);
    assert!(report.summary.is_success());
}

#[tokio::test]
async fn status_search_passes_when_nothing_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/findByStatus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let report = runner(settings_for(&server))
        .with_filter(TagFilter::parse("@search").expect("valid expression"))
        .run_dir(features_dir())
        .await
        .expect("features load");

    assert_eq!(report.summary.total, 3);
    let failures: Vec<_> = report
        .scenarios
        .iter()
        .filter(|scenario| !scenario.passed)
        .map(|scenario| (scenario.name.clone(), scenario.steps.clone()))
        .collect();
    assert!(failures.is_empty(), "failing scenarios: {failures:#?}");
}

#[tokio::test]
async fn status_update_keeps_fields_the_model_does_not_know() {
    let server = MockServer::start().await;
    let stored = json!({
        "id": 4242,
        "name": "Rex",
        "photoUrls": ["string"],
        "status": "available",
        "microchip": "A-17"
    });
    let mut updated = stored.clone();
    if let Some(fields) = updated.as_object_mut() {
        fields.insert("status".to_owned(), json!("sold"));
    }
    Mock::given(method("POST"))
        .and(path("/v2/pet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/pet/4242"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v2/pet"))
        .and(body_json(updated.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2/pet/4242"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let feature = parse_feature(
        "inline.feature",
        "Feature: Inline\n\n  Scenario: Sell a pet\n    Given I have a pet with name \"Rex\" and status \"available\"\n    When I create the pet\n    And I save the pet id\n    And I update the pet status to \"sold\"\n    Then the response status code should be 200\n",
    )
    .expect("feature parses");

    let report = runner(settings_for(&server)).run_features(&[feature]).await;

    let scenario = report.scenarios.first().expect("one scenario");
    assert!(scenario.passed, "steps: {:#?}", scenario.steps);
    server.verify().await;
}

#[tokio::test]
async fn undefined_step_fails_scenario_and_skips_the_rest() {
    let (server, _store) = FakePetStore::start().await;
    let feature = parse_feature(
        "inline.feature",
        "Feature: Inline\n\n  Scenario: Feed a pet\n    Given I have a pet with name \"Rex\" and status \"available\"\n    When I feed the pet\n    Then the response status code should be 200\n",
    )
    .expect("feature parses");

    let report = runner(settings_for(&server)).run_features(&[feature]).await;

    let scenario = report.scenarios.first().expect("one scenario");
    assert!(!scenario.passed);
    let statuses: Vec<StepStatus> = scenario.steps.iter().map(|step| step.status).collect();
    assert_eq!(
        statuses,
        [StepStatus::Passed, StepStatus::Undefined, StepStatus::Skipped]
    );
    let detail = scenario
        .steps
        .get(1)
        .and_then(|step| step.error.as_deref())
        .expect("undefined step carries an error");
    assert!(detail.contains("no step binding matches `I feed the pet`"), "{detail}");
    assert_eq!(report.summary.failed, 1);
}

#[tokio::test]
async fn failed_assertion_names_expected_and_actual() {
    let (server, _store) = FakePetStore::start().await;
    let feature = parse_feature(
        "inline.feature",
        "Feature: Inline\n\n  Scenario: Wrong status\n    When I get the store inventory\n    Then the response status code should be 201\n",
    )
    .expect("feature parses");

    let report = runner(settings_for(&server)).run_features(&[feature]).await;

    let step = report
        .scenarios
        .first()
        .and_then(|scenario| scenario.steps.get(1))
        .expect("assertion step");
    assert_eq!(step.status, StepStatus::Failed);
    let detail = step.error.as_deref().expect("failure detail");
    assert!(detail.contains("201") && detail.contains("200"), "{detail}");
}

#[tokio::test]
async fn unreachable_service_fails_every_scenario() {
    let settings = ContextSettings::new(&unreachable_base_url(), TEST_TIMEOUT).expect("valid URL");

    let report = runner(settings)
        .with_filter(TagFilter::parse("@store").expect("valid expression"))
        .run_dir(features_dir())
        .await
        .expect("features load");

    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.failed, 4);
}

#[tokio::test]
async fn report_is_written_as_json_and_html() {
    let (server, _store) = FakePetStore::start().await;
    let report = runner(settings_for(&server))
        .with_filter(TagFilter::parse("@smoke").expect("valid expression"))
        .run_dir(features_dir())
        .await
        .expect("features load");
    let dir = create_temp_dir();

    let paths = report.write(&utf8_path(&dir)).expect("report written");

    let json = std::fs::read_to_string(&paths.json).expect("json report readable");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("json report parses");
    assert_eq!(parsed["summary"]["total"], report.summary.total);
    let html = std::fs::read_to_string(&paths.html).expect("html report readable");
    assert!(html.contains("Create a new pet"));
}
