//! Step pattern parsing and tokenised matching.
//!
//! Step text is split on whitespace, except that a double-quoted string is
//! kept as one token with its quotes removed. Patterns are tokenised the same
//! way; each token is either a literal word or one of the placeholders
//! `{string}`, `{int}` and `{word}`. A step matches a pattern when both have
//! the same number of tokens and every token matches its counterpart.

use crate::error::HarnessError;

/// One token of step text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word.
    Word(String),
    /// A double-quoted string, quotes removed.
    Quoted(String),
}

/// Splits step text into tokens.
///
/// An unterminated quote yields a bare word containing the opening quote,
/// so the step can never match a `{string}` placeholder.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&next) = chars.peek() {
        if next.is_whitespace() {
            chars.next();
            continue;
        }
        if next == '"' {
            chars.next();
            let mut quoted = String::new();
            let mut terminated = false;
            while let Some(character) = chars.next() {
                match character {
                    '"' => {
                        terminated = true;
                        break;
                    }
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            quoted.push(escaped);
                        }
                    }
                    other => quoted.push(other),
                }
            }
            tokens.push(if terminated {
                Token::Quoted(quoted)
            } else {
                Token::Word(format!("\"{quoted}"))
            });
            continue;
        }
        let mut word = String::new();
        while let Some(&character) = chars.peek() {
            if character.is_whitespace() {
                break;
            }
            word.push(character);
            chars.next();
        }
        tokens.push(Token::Word(word));
    }
    tokens
}

/// A typed argument captured by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArg {
    /// Captured by `{string}`.
    Text(String),
    /// Captured by `{int}`.
    Int(i64),
    /// Captured by `{word}`.
    Word(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Text,
    Int,
    Word,
}

/// A compiled step pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPattern {
    source: String,
    segments: Vec<Segment>,
}

impl StepPattern {
    /// Compiles `source`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidPattern`] for an empty pattern, an
    /// unknown `{placeholder}` or a quoted literal.
    pub fn parse(source: &str) -> Result<Self, HarnessError> {
        let invalid = |message: &str| HarnessError::InvalidPattern {
            pattern: source.to_owned(),
            message: message.to_owned(),
        };
        let segments = tokenize(source)
            .into_iter()
            .map(|token| match token {
                Token::Quoted(_) => Err(invalid("quoted literals are not supported")),
                Token::Word(word) => match word.as_str() {
                    "{string}" => Ok(Segment::Text),
                    "{int}" => Ok(Segment::Int),
                    "{word}" => Ok(Segment::Word),
                    _ if word.starts_with('{') && word.ends_with('}') => {
                        Err(invalid(&format!("unknown placeholder {word}")))
                    }
                    _ => Ok(Segment::Literal(word)),
                },
            })
            .collect::<Result<Vec<_>, _>>()?;
        if segments.is_empty() {
            return Err(invalid("pattern is empty"));
        }
        Ok(Self {
            source: source.to_owned(),
            segments,
        })
    }

    /// Pattern text as registered.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true when both patterns match exactly the same step texts,
    /// whatever whitespace their sources use.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.segments == other.segments
    }

    /// Matches pre-tokenised step text, returning captured arguments.
    #[must_use]
    pub fn matches(&self, tokens: &[Token]) -> Option<Vec<StepArg>> {
        if tokens.len() != self.segments.len() {
            return None;
        }
        let mut args = Vec::new();
        for (segment, token) in self.segments.iter().zip(tokens) {
            match (segment, token) {
                (Segment::Literal(expected), Token::Word(word)) if expected == word => {}
                (Segment::Text, Token::Quoted(text)) => args.push(StepArg::Text(text.clone())),
                (Segment::Int, Token::Word(word)) => args.push(StepArg::Int(word.parse().ok()?)),
                (Segment::Word, Token::Word(word)) => args.push(StepArg::Word(word.clone())),
                _ => return None,
            }
        }
        Some(args)
    }
}
