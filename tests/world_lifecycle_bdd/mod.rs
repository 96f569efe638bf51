//! Support modules for the World lifecycle BDD tests.

#[path = "../support/fake_petstore.rs"]
pub(crate) mod fake_petstore;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::{LifecycleState, ensure_runtime_and_store, with_world};
