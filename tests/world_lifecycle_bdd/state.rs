//! Scenario state for the World lifecycle BDD tests.

use std::time::Duration;

use petstore_harness::{ContextSettings, Evidence, StepError, World};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::MockServer;

use super::fake_petstore::FakePetStore;
use super::runtime::{self, SharedRuntime};

#[derive(ScenarioState, Default)]
pub(crate) struct LifecycleState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) store: Slot<FakePetStore>,
    pub(crate) world: Slot<World>,
    pub(crate) created_pet: Slot<i64>,
    pub(crate) evidence: Slot<Vec<Evidence>>,
    pub(crate) error: Slot<StepError>,
}

impl LifecycleState {
    /// Context settings pointing at the fake store.
    pub(crate) fn settings(&self) -> ContextSettings {
        let base_url = self
            .server
            .with_ref(|server| format!("{}/v2", server.uri()))
            .unwrap_or_else(|| panic!("fake pet store not started"));
        ContextSettings::new(&base_url, Duration::from_secs(5))
            .unwrap_or_else(|error| panic!("mock server URI rejected: {error}"))
    }
}

/// Ensures the runtime and fake store are running.
pub(crate) fn ensure_runtime_and_store(state: &LifecycleState) -> SharedRuntime {
    runtime::ensure_runtime_and_store(&state.runtime, &state.server, &state.store)
        .unwrap_or_else(|error| panic!("failed to initialise runtime: {error}"))
}

/// Lends the World to `action` on the shared runtime and puts it back.
pub(crate) fn with_world<R>(
    state: &LifecycleState,
    action: impl AsyncFnOnce(&mut World) -> R,
) -> R {
    let runtime = ensure_runtime_and_store(state);
    let mut world = state
        .world
        .take()
        .unwrap_or_else(|| panic!("World not created"));
    let output = runtime.block_on(action(&mut world));
    state.world.set(world);
    output
}
