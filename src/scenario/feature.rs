//! Feature-file discovery and parsing.
//!
//! The accepted language is a subset of Gherkin: `Feature:` with free
//! description text, `@tag` lines, `#` comments, one optional
//! `Background:`, `Scenario:`/`Example:` blocks, and
//! `Scenario Outline:`/`Scenario Template:` blocks expanded from their
//! `Examples:` tables by `<param>` substitution. Steps start with `Given`,
//! `When`, `Then`, `And`, `But` or `*`.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

const STEP_KEYWORDS: [&str; 6] = ["Given", "When", "Then", "And", "But", "*"];

/// A parsed feature file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature title.
    pub name: String,
    /// Free text between the title and the first block.
    pub description: Vec<String>,
    /// Tags on the feature, without the `@`.
    pub tags: Vec<String>,
    /// File the feature was read from.
    pub path: String,
    /// Runnable scenarios, outlines already expanded.
    pub scenarios: Vec<Scenario>,
}

/// One runnable scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario title; expanded outlines carry an example suffix.
    pub name: String,
    /// Effective tags: the feature's followed by the scenario's own.
    pub tags: Vec<String>,
    /// Line of the `Scenario:` keyword.
    pub line: usize,
    /// Background steps followed by the scenario's own steps.
    pub steps: Vec<Step>,
}

/// One step line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Keyword as written (`Given`, `And`, `*`, ...).
    pub keyword: String,
    /// Text after the keyword.
    pub text: String,
    /// One-based line number.
    pub line: usize,
}

/// Finds `*.feature` files below `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] when a directory cannot be read.
pub fn discover(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, HarnessError> {
    let mut found = Vec::new();
    collect_features(dir, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_features(dir: &Utf8Path, found: &mut Vec<Utf8PathBuf>) -> Result<(), HarnessError> {
    let entries = dir
        .read_dir_utf8()
        .map_err(|error| HarnessError::io(dir, &error))?;
    for entry in entries {
        let entry = entry.map_err(|error| HarnessError::io(dir, &error))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|error| HarnessError::io(path, &error))?;
        if file_type.is_dir() {
            collect_features(path, found)?;
        } else if path.extension() == Some("feature") {
            found.push(path.to_owned());
        }
    }
    Ok(())
}

/// Reads and parses the feature file at `path`.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] when the file cannot be read and
/// [`HarnessError::FeatureParse`] when it is not valid.
pub fn load_feature(path: &Utf8Path) -> Result<Feature, HarnessError> {
    let source = std::fs::read_to_string(path).map_err(|error| HarnessError::io(path, &error))?;
    parse_feature(path.as_str(), &source)
}

#[derive(Debug, Default)]
struct ExamplesDraft {
    tags: Vec<String>,
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

#[derive(Debug)]
enum BlockKind {
    Background,
    Scenario,
    Outline(Vec<ExamplesDraft>),
}

#[derive(Debug)]
struct BlockDraft {
    kind: BlockKind,
    name: String,
    tags: Vec<String>,
    line: usize,
    steps: Vec<Step>,
}

#[derive(Debug)]
struct Parser<'a> {
    path: &'a str,
    feature: Option<(String, Vec<String>)>,
    description: Vec<String>,
    pending_tags: Vec<String>,
    background: Option<Vec<Step>>,
    block: Option<BlockDraft>,
    scenarios: Vec<Scenario>,
}

/// Parses feature `source`; `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`HarnessError::FeatureParse`] naming the offending line.
pub fn parse_feature(path: &str, source: &str) -> Result<Feature, HarnessError> {
    let mut parser = Parser {
        path,
        feature: None,
        description: Vec::new(),
        pending_tags: Vec::new(),
        background: None,
        block: None,
        scenarios: Vec::new(),
    };
    for (index, raw) in source.lines().enumerate() {
        parser.line(index + 1, raw.trim())?;
    }
    parser.finish()
}

impl Parser<'_> {
    fn line(&mut self, line: usize, text: &str) -> Result<(), HarnessError> {
        if text.is_empty() || text.starts_with('#') {
            return Ok(());
        }
        if text.starts_with('@') {
            return self.tags(line, text);
        }
        if let Some(name) = text.strip_prefix("Feature:") {
            return self.start_feature(line, name);
        }
        if self.feature.is_none() {
            return Err(parse_error(self.path, line, "expected `Feature:` before any other content"));
        }
        if text.strip_prefix("Background:").is_some() {
            return self.start_block(line, BlockKind::Background, String::new());
        }
        if let Some(name) = strip_any(text, &["Scenario Outline:", "Scenario Template:"]) {
            return self.start_block(line, BlockKind::Outline(Vec::new()), name.trim().to_owned());
        }
        if let Some(name) = strip_any(text, &["Scenario:", "Example:"]) {
            return self.start_block(line, BlockKind::Scenario, name.trim().to_owned());
        }
        if strip_any(text, &["Examples:", "Scenarios:"]).is_some() {
            return self.start_examples(line);
        }
        if text.starts_with('|') {
            return self.table_row(line, text);
        }
        if let Some((keyword, step_text)) = split_step(text) {
            return self.step(line, keyword, step_text);
        }
        self.free_text(line, text)
    }

    fn tags(&mut self, line: usize, text: &str) -> Result<(), HarnessError> {
        for word in text.split_whitespace() {
            if word.starts_with('#') {
                break;
            }
            let Some(tag) = word.strip_prefix('@').filter(|tag| !tag.is_empty()) else {
                return Err(parse_error(self.path, line, format!("`{word}` is not a tag")));
            };
            self.pending_tags.push(tag.to_owned());
        }
        Ok(())
    }

    fn start_feature(&mut self, line: usize, name: &str) -> Result<(), HarnessError> {
        if self.feature.is_some() {
            return Err(parse_error(self.path, line, "a file may contain only one `Feature:`"));
        }
        let tags = std::mem::take(&mut self.pending_tags);
        self.feature = Some((name.trim().to_owned(), tags));
        Ok(())
    }

    fn start_block(&mut self, line: usize, kind: BlockKind, name: String) -> Result<(), HarnessError> {
        self.close_block()?;
        if matches!(kind, BlockKind::Background) {
            if self.background.is_some() {
                return Err(parse_error(self.path, line, "only one `Background:` is allowed"));
            }
            if !self.scenarios.is_empty() {
                return Err(parse_error(self.path, line, "`Background:` must precede all scenarios"));
            }
            if !self.pending_tags.is_empty() {
                return Err(parse_error(self.path, line, "tags cannot be applied to `Background:`"));
            }
        }
        self.block = Some(BlockDraft {
            kind,
            name,
            tags: std::mem::take(&mut self.pending_tags),
            line,
            steps: Vec::new(),
        });
        Ok(())
    }

    fn start_examples(&mut self, line: usize) -> Result<(), HarnessError> {
        let tags = std::mem::take(&mut self.pending_tags);
        match self.block.as_mut().map(|block| &mut block.kind) {
            Some(BlockKind::Outline(examples)) => {
                examples.push(ExamplesDraft {
                    tags,
                    ..ExamplesDraft::default()
                });
                Ok(())
            }
            _ => Err(parse_error(self.path, line, "`Examples:` is only valid inside a scenario outline")),
        }
    }

    fn table_row(&mut self, line: usize, text: &str) -> Result<(), HarnessError> {
        let cells = split_row(text);
        let current = match self.block.as_mut().map(|block| &mut block.kind) {
            Some(BlockKind::Outline(examples)) => examples.last_mut(),
            _ => None,
        };
        let Some(examples) = current else {
            return Err(parse_error(
                self.path,
                line,
                "table rows are only valid inside `Examples:`",
            ));
        };
        let Some(header) = &examples.header else {
            examples.header = Some(cells);
            return Ok(());
        };
        if header.len() != cells.len() {
            return Err(parse_error(
                self.path,
                line,
                format!(
                    "row has {} cells but the header has {}",
                    cells.len(),
                    header.len()
                ),
            ));
        }
        examples.rows.push(cells);
        Ok(())
    }

    fn step(&mut self, line: usize, keyword: &str, text: &str) -> Result<(), HarnessError> {
        if !self.pending_tags.is_empty() {
            return Err(parse_error(self.path, line, "tags must precede a feature, scenario or examples block"));
        }
        let Some(block) = self.block.as_mut() else {
            return Err(parse_error(self.path, line, "steps must belong to a scenario or background"));
        };
        if has_examples(&block.kind) {
            return Err(parse_error(self.path, line, "steps cannot follow `Examples:`"));
        }
        block.steps.push(Step {
            keyword: keyword.to_owned(),
            text: text.to_owned(),
            line,
        });
        Ok(())
    }

    fn free_text(&mut self, line: usize, text: &str) -> Result<(), HarnessError> {
        let accepted = match &self.block {
            None => self.scenarios.is_empty() && self.background.is_none(),
            Some(block) => block.steps.is_empty() && !has_examples(&block.kind),
        };
        if !accepted {
            return Err(parse_error(
                self.path,
                line,
                format!("unexpected line `{text}`"),
            ));
        }
        if self.block.is_none() {
            self.description.push(text.to_owned());
        }
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), HarnessError> {
        let Some(block) = self.block.take() else {
            return Ok(());
        };
        let feature_tags = self
            .feature
            .as_ref()
            .map(|(_, tags)| tags.clone())
            .unwrap_or_default();
        let background = self.background.clone().unwrap_or_default();
        match block.kind {
            BlockKind::Background => {
                self.background = Some(block.steps);
            }
            BlockKind::Scenario => {
                self.scenarios.push(Scenario {
                    name: block.name,
                    tags: merge_tags(&feature_tags, &block.tags, &[]),
                    line: block.line,
                    steps: background.into_iter().chain(block.steps).collect(),
                });
            }
            BlockKind::Outline(examples) => {
                if examples.iter().all(|group| group.rows.is_empty()) {
                    return Err(parse_error(self.path, block.line, "scenario outline has no example rows"));
                }
                let mut ordinal = 0_usize;
                for group in &examples {
                    let header = group.header.as_deref().unwrap_or_default();
                    for row in &group.rows {
                        ordinal += 1;
                        let steps = background
                            .iter()
                            .cloned()
                            .chain(block.steps.iter().map(|step| Step {
                                text: substitute(&step.text, header, row),
                                ..step.clone()
                            }))
                            .collect();
                        self.scenarios.push(Scenario {
                            name: format!("{} (example {ordinal})", substitute(&block.name, header, row)),
                            tags: merge_tags(&feature_tags, &block.tags, &group.tags),
                            line: block.line,
                            steps,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Feature, HarnessError> {
        self.close_block()?;
        let Some((name, tags)) = self.feature.take() else {
            return Err(parse_error(self.path, 1, "missing `Feature:` header"));
        };
        Ok(Feature {
            name,
            description: self.description,
            tags,
            path: self.path.to_owned(),
            scenarios: self.scenarios,
        })
    }
}

fn parse_error(path: &str, line: usize, message: impl Into<String>) -> HarnessError {
    HarnessError::FeatureParse {
        path: path.to_owned(),
        line,
        message: message.into(),
    }
}

fn has_examples(kind: &BlockKind) -> bool {
    matches!(kind, BlockKind::Outline(examples) if !examples.is_empty())
}

fn strip_any<'t>(text: &'t str, prefixes: &[&str]) -> Option<&'t str> {
    prefixes.iter().find_map(|prefix| text.strip_prefix(prefix))
}

fn split_step(text: &str) -> Option<(&str, &str)> {
    STEP_KEYWORDS.iter().find_map(|keyword| {
        let rest = text.strip_prefix(keyword)?;
        let step_text = rest.strip_prefix(char::is_whitespace)?;
        Some((*keyword, step_text.trim()))
    })
}

fn split_row(text: &str) -> Vec<String> {
    let inner = text.trim().trim_start_matches('|').trim_end_matches('|');
    inner.split('|').map(|cell| cell.trim().to_owned()).collect()
}

fn substitute(text: &str, header: &[String], row: &[String]) -> String {
    header
        .iter()
        .zip(row)
        .fold(text.to_owned(), |current, (name, value)| {
            current.replace(&format!("<{name}>"), value)
        })
}

fn merge_tags(feature: &[String], scenario: &[String], examples: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for tag in feature.iter().chain(scenario).chain(examples) {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

#[cfg(test)]
#[path = "feature_tests.rs"]
mod tests;
