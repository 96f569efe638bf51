//! Spec-file runner: code-style suites for pets, the store and users.
//!
//! Each [`SpecCase`] is a plain async function over a fresh [`World`]. The
//! catalogue mirrors the smoke and regression suites; cases carry tags so
//! a [`TagFilter`](crate::scenario::TagFilter) can select a subset.

mod pet;
mod report;
mod runner;
mod store;
mod user;

use crate::session::World;
use crate::steps::StepFuture;

pub use report::{SpecReport, SpecResult};
pub use runner::SpecRunner;

/// Body of a spec case.
pub type SpecBody = for<'w> fn(&'w mut World) -> StepFuture<'w>;

/// One code-style test case.
#[derive(Debug, Clone, Copy)]
pub struct SpecCase {
    /// Suite the case belongs to (`pet`, `store` or `user`).
    pub suite: &'static str,
    /// Human-readable case name.
    pub name: &'static str,
    /// Tags used for filtering, without the `@`.
    pub tags: &'static [&'static str],
    /// Case body.
    pub run: SpecBody,
}

impl SpecCase {
    /// Tags including the suite name.
    #[must_use]
    pub fn effective_tags(&self) -> Vec<&'static str> {
        std::iter::once(self.suite)
            .chain(self.tags.iter().copied())
            .collect()
    }
}

/// Every built-in case: pet suite, then store, then user.
#[must_use]
pub fn catalogue() -> Vec<SpecCase> {
    pet::CASES
        .iter()
        .chain(store::CASES)
        .chain(user::CASES)
        .copied()
        .collect()
}
