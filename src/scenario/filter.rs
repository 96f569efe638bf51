//! Tag expressions selecting which scenarios and spec cases run.
//!
//! An expression is a disjunction of clauses separated by `or` or `,`;
//! each clause is a conjunction of terms joined by `and`; a term is a tag,
//! optionally preceded by `not`. Tags may be written with or without the
//! leading `@`. `@smoke and not @slow, @regression` therefore selects
//! smoke tests that are not slow, plus every regression test.

use crate::error::HarnessError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    tag: String,
    negated: bool,
}

/// A parsed tag expression. The empty filter selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    clauses: Vec<Vec<Term>>,
}

impl TagFilter {
    /// Filter that selects every test.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Parses a tag expression; blank input yields [`TagFilter::all`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when a clause or term is
    /// empty or a tag contains whitespace.
    pub fn parse(expression: &str) -> Result<Self, HarnessError> {
        if expression.trim().is_empty() {
            return Ok(Self::all());
        }
        let clauses = expression
            .split(',')
            .flat_map(|part| part.split(" or "))
            .map(|clause| parse_clause(expression, clause))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }

    /// Parses an optional expression, treating `None` as select-all.
    ///
    /// # Errors
    ///
    /// See [`TagFilter::parse`].
    pub fn from_option(expression: Option<&str>) -> Result<Self, HarnessError> {
        expression.map_or_else(|| Ok(Self::all()), Self::parse)
    }

    /// Returns true when this filter selects everything.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns true when a test carrying `tags` is selected.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        if self.is_all() {
            return true;
        }
        self.clauses.iter().any(|clause| {
            clause.iter().all(|term| {
                let present = tags.iter().any(|tag| tag.as_ref() == term.tag);
                present != term.negated
            })
        })
    }
}

fn parse_clause(expression: &str, clause: &str) -> Result<Vec<Term>, HarnessError> {
    clause
        .split(" and ")
        .map(|raw| parse_term(expression, raw))
        .collect()
}

fn parse_term(expression: &str, raw: &str) -> Result<Term, HarnessError> {
    let trimmed = raw.trim();
    let (negated, rest) = trimmed
        .strip_prefix("not ")
        .map_or((false, trimmed), |rest| (true, rest.trim()));
    let tag = rest.strip_prefix('@').unwrap_or(rest);
    if tag.is_empty() || tag.contains(char::is_whitespace) {
        return Err(HarnessError::Configuration {
            message: format!("invalid tag expression `{expression}`: bad term `{trimmed}`"),
        });
    }
    Ok(Term {
        tag: tag.to_owned(),
        negated,
    })
}
