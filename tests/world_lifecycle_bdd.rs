//! Behavioural tests for the per-test World lifecycle.

#[path = "world_lifecycle_bdd/mod.rs"]
mod world_lifecycle_bdd_support;

use petstore_harness::expect::expect_i64_field;
use petstore_harness::petstore::{Pet, PetStatus};
use petstore_harness::{StepError, World};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use world_lifecycle_bdd_support::fake_petstore::{FakePetStore, SEEDED_PET_IDS};
use world_lifecycle_bdd_support::{LifecycleState, ensure_runtime_and_store, with_world};

#[fixture]
fn lifecycle_state() -> LifecycleState {
    LifecycleState::default()
}

#[given("a fake pet store")]
fn fake_pet_store(lifecycle_state: &LifecycleState) {
    let _runtime = ensure_runtime_and_store(lifecycle_state);
}

#[given("a started World")]
fn started_world(lifecycle_state: &LifecycleState) {
    let mut world = World::default();
    world
        .start(&lifecycle_state.settings())
        .unwrap_or_else(|error| panic!("World failed to start: {error}"));
    lifecycle_state.world.set(world);
}

#[given("an inactive World")]
fn inactive_world(lifecycle_state: &LifecycleState) {
    lifecycle_state.world.set(World::default());
}

#[when("the World creates a pet named {name}")]
fn create_pet(lifecycle_state: &LifecycleState, name: String) {
    let id = with_world(lifecycle_state, async |world: &mut World| {
        let pet = Pet::named(name, PetStatus::Available);
        let response = world.pets()?.create(&pet).await?;
        world.capture("create pet", response).await?;
        expect_i64_field(world.last_json()?, "id")
    })
    .unwrap_or_else(|error| panic!("pet creation failed: {error}"));
    lifecycle_state.created_pet.set(id);
}

#[when("the World tracks the created pet")]
fn track_pet(lifecycle_state: &LifecycleState) {
    let id = lifecycle_state
        .created_pet
        .get()
        .unwrap_or_else(|| panic!("no pet was created"));
    lifecycle_state
        .world
        .with_mut(|world| world.track_pet(id))
        .unwrap_or_else(|| panic!("World not created"));
}

#[when("the World is finished")]
fn finish_world(lifecycle_state: &LifecycleState) {
    let evidence = with_world(lifecycle_state, async |world: &mut World| world.finish().await);
    lifecycle_state.evidence.set(evidence);
}

#[when("the World is started again")]
fn restart_world(lifecycle_state: &LifecycleState) {
    let settings = lifecycle_state.settings();
    let outcome = lifecycle_state
        .world
        .with_mut(|world| world.start(&settings))
        .unwrap_or_else(|| panic!("World not created"));
    if let Err(error) = outcome {
        lifecycle_state.error.set(error);
    }
}

#[when("a pet lookup is attempted")]
fn attempt_lookup(lifecycle_state: &LifecycleState) {
    let outcome = with_world(lifecycle_state, async |world: &mut World| {
        let response = world.pets()?.get_by_id(SEEDED_PET_IDS[0]).await?;
        world.capture("get pet", response).await?;
        Ok::<(), StepError>(())
    });
    if let Err(error) = outcome {
        lifecycle_state.error.set(error);
    }
}

#[then("the World is inactive")]
fn world_is_inactive(lifecycle_state: &LifecycleState) {
    let active = lifecycle_state
        .world
        .with_ref(World::is_active)
        .unwrap_or_else(|| panic!("World not created"));
    assert!(!active);
}

#[then("{count:usize} evidence record is handed back")]
fn evidence_handed_back(lifecycle_state: &LifecycleState, count: usize) {
    let evidence = lifecycle_state
        .evidence
        .get()
        .unwrap_or_else(|| panic!("World was not finished"));
    assert_eq!(evidence.len(), count);
    let remaining = lifecycle_state
        .world
        .with_ref(|world| world.evidence().len())
        .unwrap_or_else(|| panic!("World not created"));
    assert_eq!(remaining, 0);
}

#[then("the start is rejected because the World is already active")]
fn start_rejected(lifecycle_state: &LifecycleState) {
    assert_eq!(lifecycle_state.error.get(), Some(StepError::AlreadyActive));
}

#[then("the store holds only the seeded pets")]
fn only_seeded_pets(lifecycle_state: &LifecycleState) {
    let pets = lifecycle_state
        .store
        .with_ref(FakePetStore::pet_ids)
        .unwrap_or_else(|| panic!("fake pet store not started"));
    assert_eq!(pets, SEEDED_PET_IDS.to_vec());
}

#[then("the lookup fails because no context is open")]
fn lookup_fails(lifecycle_state: &LifecycleState) {
    assert_eq!(lifecycle_state.error.get(), Some(StepError::Inactive));
}

#[scenario(path = "tests/features/world_lifecycle.feature", index = 0)]
fn finishing_resets_world(lifecycle_state: LifecycleState) {
    let _ = lifecycle_state;
}

#[scenario(path = "tests/features/world_lifecycle.feature", index = 1)]
fn double_start_is_rejected(lifecycle_state: LifecycleState) {
    let _ = lifecycle_state;
}

#[scenario(path = "tests/features/world_lifecycle.feature", index = 2)]
fn finishing_removes_tracked_pet(lifecycle_state: LifecycleState) {
    let _ = lifecycle_state;
}

#[scenario(path = "tests/features/world_lifecycle.feature", index = 3)]
fn inactive_world_rejects_requests(lifecycle_state: LifecycleState) {
    let _ = lifecycle_state;
}
