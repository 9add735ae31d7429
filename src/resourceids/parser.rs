use std::collections::HashMap;

use thiserror::Error;

use super::segment::{Segment, SegmentKind};

/// Errors raised while parsing a resource ID.
///
/// Every parse failure carries the expected format so the caller can show
/// the user what a well-formed ID looks like.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    #[error("parsing {id_type} ID: the input was empty")]
    Empty { id_type: String },

    #[error(
        "parsing {id_type} ID {input:?}: expected {}{expected} segments but got {actual}\n\nexpected an ID in the format: {example}",
        count_qualifier(.at_least)
    )]
    SegmentCount {
        id_type: String,
        input: String,
        expected: usize,
        at_least: bool,
        actual: usize,
        example: String,
    },

    #[error(
        "parsing {id_type} ID {input:?}: the segment {name:?} should be {expected:?} but got {actual:?}\n\nexpected an ID in the format: {example}"
    )]
    SegmentMismatch {
        id_type: String,
        input: String,
        name: String,
        expected: String,
        actual: String,
        example: String,
    },

    #[error(
        "parsing {id_type} ID {input:?}: the segment {name:?} was empty\n\nexpected an ID in the format: {example}"
    )]
    EmptySegment {
        id_type: String,
        input: String,
        name: String,
        example: String,
    },

    #[error(
        "parsing {id_type} ID {input:?}: the segment {name:?} should be one of [{possible}] but got {actual:?}\n\nexpected an ID in the format: {example}"
    )]
    InvalidConstant {
        id_type: String,
        input: String,
        name: String,
        possible: String,
        actual: String,
        example: String,
    },

    #[error("the parsed ID did not contain the segment {name:?}")]
    MissingSegment { name: String },

    #[error("no known resource ID type matched {input:?}")]
    UnknownType { input: String },
}

fn count_qualifier(at_least: &bool) -> &'static str {
    if *at_least {
        "at least "
    } else {
        ""
    }
}

/// Values captured by a successful parse, keyed by segment name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    values: HashMap<String, String>,
}

impl Parsed {
    pub fn get(&self, name: &str) -> Result<&str, ResourceIdError> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ResourceIdError::MissingSegment {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub struct Parser {
    id_type: &'static str,
    segments: Vec<Segment>,
}

impl Parser {
    pub fn new(id_type: &'static str, segments: Vec<Segment>) -> Self {
        Self { id_type, segments }
    }

    pub fn example(&self) -> String {
        let examples: Vec<&str> = self
            .segments
            .iter()
            .filter(|s| s.holds_value())
            .map(|s| s.example)
            .collect();
        format_id(&self.segments, &examples)
    }

    /// Parses `input` against the segments.
    ///
    /// With `insensitively` set, static segments and constants match
    /// regardless of case and are returned in their canonical casing.
    pub fn parse(&self, input: &str, insensitively: bool) -> Result<Parsed, ResourceIdError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ResourceIdError::Empty {
                id_type: self.id_type.to_string(),
            });
        }

        // Only one leading slash is optional; a second one is an empty component.
        let components: Vec<&str> = trimmed
            .strip_prefix('/')
            .unwrap_or(trimmed)
            .split('/')
            .collect();
        let fixed = self
            .segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Scope)
            .count();
        let has_scope = fixed != self.segments.len();

        let count_ok = if has_scope {
            components.len() >= fixed
        } else {
            components.len() == fixed
        };
        if !count_ok {
            return Err(ResourceIdError::SegmentCount {
                id_type: self.id_type.to_string(),
                input: input.to_string(),
                expected: fixed,
                at_least: has_scope,
                actual: components.len(),
                example: self.example(),
            });
        }

        let mut parsed = Parsed::default();
        let mut position = 0usize;

        for segment in &self.segments {
            match &segment.kind {
                SegmentKind::Scope => {
                    let width = components.len() - fixed;
                    let scope_parts = &components[position..position + width];
                    if scope_parts.iter().any(|p| p.is_empty()) {
                        return Err(self.empty_segment(input, segment));
                    }
                    parsed
                        .values
                        .insert(segment.name.to_string(), format!("/{}", scope_parts.join("/")));
                    position += width;
                }
                SegmentKind::Static(expected) | SegmentKind::ResourceProvider(expected) => {
                    let actual = components[position];
                    let matched = if insensitively {
                        actual.eq_ignore_ascii_case(expected)
                    } else {
                        actual == *expected
                    };
                    if !matched {
                        return Err(ResourceIdError::SegmentMismatch {
                            id_type: self.id_type.to_string(),
                            input: input.to_string(),
                            name: segment.name.to_string(),
                            expected: expected.to_string(),
                            actual: actual.to_string(),
                            example: self.example(),
                        });
                    }
                    position += 1;
                }
                SegmentKind::Constant(possible) => {
                    let actual = components[position];
                    if actual.is_empty() {
                        return Err(self.empty_segment(input, segment));
                    }
                    let canonical = possible.iter().find(|value| {
                        if insensitively {
                            value.eq_ignore_ascii_case(actual)
                        } else {
                            **value == actual
                        }
                    });
                    let Some(canonical) = canonical else {
                        return Err(ResourceIdError::InvalidConstant {
                            id_type: self.id_type.to_string(),
                            input: input.to_string(),
                            name: segment.name.to_string(),
                            possible: possible.join(", "),
                            actual: actual.to_string(),
                            example: self.example(),
                        });
                    };
                    parsed
                        .values
                        .insert(segment.name.to_string(), canonical.to_string());
                    position += 1;
                }
                SegmentKind::UserSpecified => {
                    let actual = components[position];
                    if actual.is_empty() {
                        return Err(self.empty_segment(input, segment));
                    }
                    parsed
                        .values
                        .insert(segment.name.to_string(), actual.to_string());
                    position += 1;
                }
            }
        }

        Ok(parsed)
    }

    fn empty_segment(&self, input: &str, segment: &Segment) -> ResourceIdError {
        ResourceIdError::EmptySegment {
            id_type: self.id_type.to_string(),
            input: input.to_string(),
            name: segment.name.to_string(),
            example: self.example(),
        }
    }
}

/// Builds the URL-shaped ID from segments and the values of the
/// value-holding segments, in order.
pub fn format_id(segments: &[Segment], values: &[&str]) -> String {
    let mut values = values.iter();
    let mut parts: Vec<&str> = Vec::with_capacity(segments.len());

    for segment in segments {
        match &segment.kind {
            SegmentKind::Static(value) | SegmentKind::ResourceProvider(value) => parts.push(value),
            SegmentKind::Scope => {
                let scope = values.next().copied().unwrap_or_default().trim_matches('/');
                if !scope.is_empty() {
                    parts.push(scope);
                }
            }
            SegmentKind::UserSpecified | SegmentKind::Constant(_) => {
                parts.push(values.next().copied().unwrap_or_default());
            }
        }
    }

    format!("/{}", parts.join("/"))
}

/// `Description (Label: "value" / Label: "value")`
pub fn describe(description: &str, segments: &[Segment], values: &[&str]) -> String {
    let components: Vec<String> = segments
        .iter()
        .filter(|s| s.holds_value())
        .zip(values.iter())
        .map(|(segment, value)| format!("{}: {:?}", segment.label(), value))
        .collect();
    format!("{} ({})", description, components.join(" / "))
}
