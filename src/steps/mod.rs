//! Table-driven step bindings.
//!
//! A [`StepRegistry`] maps step patterns to plain handler functions. The
//! standard registry is assembled once at startup from the common, pet,
//! store and user binding tables; resolving a step is a linear scan over
//! the compiled patterns.

mod common;
pub mod pattern;
mod pet;
mod store;
mod user;

use std::future::Future;
use std::pin::Pin;

use crate::error::HarnessError;
use crate::session::{StepError, World};

pub use pattern::{StepArg, StepPattern, Token, tokenize};

/// Future returned by a step handler, borrowing the World for `'w`.
pub type StepFuture<'w> = Pin<Box<dyn Future<Output = Result<(), StepError>> + Send + 'w>>;

/// A step handler.
pub type StepHandler = for<'w> fn(&'w mut World, StepArgs) -> StepFuture<'w>;

/// Arguments captured from step text, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepArgs {
    values: Vec<StepArg>,
}

impl StepArgs {
    /// Wraps captured arguments.
    #[must_use]
    pub const fn new(values: Vec<StepArg>) -> Self {
        Self { values }
    }

    /// Number of captured arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the pattern had no placeholders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text captured by `{string}` or `{word}` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidArgument`] when the argument is missing
    /// or is an integer.
    pub fn text(&self, index: usize) -> Result<&str, StepError> {
        match self.values.get(index) {
            Some(StepArg::Text(value) | StepArg::Word(value)) => Ok(value),
            Some(StepArg::Int(_)) => Err(StepError::invalid_argument(format!(
                "argument {index} is an integer, not text"
            ))),
            None => Err(StepError::invalid_argument(format!(
                "argument {index} was not captured"
            ))),
        }
    }

    /// Integer captured by `{int}` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidArgument`] when the argument is missing
    /// or is text.
    pub fn int(&self, index: usize) -> Result<i64, StepError> {
        match self.values.get(index) {
            Some(StepArg::Int(value)) => Ok(*value),
            Some(StepArg::Text(_) | StepArg::Word(_)) => Err(StepError::invalid_argument(
                format!("argument {index} is text, not an integer"),
            )),
            None => Err(StepError::invalid_argument(format!(
                "argument {index} was not captured"
            ))),
        }
    }

    /// Integer at `index` narrowed to a status code.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidArgument`] when the value is not a
    /// valid HTTP status.
    pub fn status(&self, index: usize) -> Result<u16, StepError> {
        let raw = self.int(index)?;
        u16::try_from(raw)
            .ok()
            .filter(|code| (100..=599).contains(code))
            .ok_or_else(|| StepError::invalid_argument(format!("{raw} is not an HTTP status")))
    }
}

#[derive(Debug, Clone)]
struct StepDefinition {
    pattern: StepPattern,
    handler: StepHandler,
}

/// Result of resolving step text against the registry.
#[derive(Debug, Clone)]
pub enum StepMatch<'r> {
    /// Exactly one pattern matched.
    Matched {
        /// Pattern that matched.
        pattern: &'r str,
        /// Handler to run.
        handler: StepHandler,
        /// Captured arguments.
        args: StepArgs,
    },
    /// No pattern matched.
    Undefined,
    /// More than one pattern matched.
    Ambiguous(Vec<&'r str>),
}

/// Registry of step patterns and their handlers.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Registry with every pet, store and user binding.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidPattern`] if a built-in pattern fails
    /// to compile or is registered twice.
    pub fn standard() -> Result<Self, HarnessError> {
        let mut registry = Self::new();
        common::register(&mut registry)?;
        pet::register(&mut registry)?;
        store::register(&mut registry)?;
        user::register(&mut registry)?;
        Ok(registry)
    }

    /// Adds a binding.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidPattern`] when the pattern does not
    /// compile or a pattern with the same tokens is already registered.
    pub fn register(&mut self, pattern: &str, handler: StepHandler) -> Result<&mut Self, HarnessError> {
        let compiled = StepPattern::parse(pattern)?;
        if self
            .definitions
            .iter()
            .any(|definition| definition.pattern.same_shape(&compiled))
        {
            return Err(HarnessError::InvalidPattern {
                pattern: pattern.to_owned(),
                message: "already registered".to_owned(),
            });
        }
        self.definitions.push(StepDefinition {
            pattern: compiled,
            handler,
        });
        Ok(self)
    }

    /// Number of registered bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Registered pattern texts, in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.definitions
            .iter()
            .map(|definition| definition.pattern.source())
    }

    /// Resolves step text to a binding.
    #[must_use]
    pub fn resolve(&self, text: &str) -> StepMatch<'_> {
        let tokens = tokenize(text);
        let mut matches = self.definitions.iter().filter_map(|definition| {
            definition
                .pattern
                .matches(&tokens)
                .map(|args| (definition, args))
        });
        let Some((first, args)) = matches.next() else {
            return StepMatch::Undefined;
        };
        let others: Vec<&str> = matches
            .map(|(definition, _)| definition.pattern.source())
            .collect();
        if others.is_empty() {
            return StepMatch::Matched {
                pattern: first.pattern.source(),
                handler: first.handler,
                args: StepArgs::new(args),
            };
        }
        let mut candidates = vec![first.pattern.source()];
        candidates.extend(others);
        StepMatch::Ambiguous(candidates)
    }
}
