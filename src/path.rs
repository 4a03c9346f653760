use serde_json::Value;

use crate::errors::{ParseError, ResolveError};

/// A compiled property path: an ordered, non-empty sequence of accessor
/// steps plus the original path string.
///
/// Syntax:
///   property            `name`
///   nested property     `outer.inner`
///   sequence index      `items[0]`
///   mapping key         `labels[en]`
///
/// Compiling is pure; a `Path` is immutable and can be evaluated against any
/// number of roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    steps: Vec<Step>,
}

/// One hop of a path. Each variant carries the consumed-path context its
/// error messages need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A named-member read. `owner` is the dotted prefix of the segments
    /// before this one; `None` means the read targets the root itself.
    Property { name: String, owner: Option<String> },
    /// A bracketed lookup: positional on sequences, keyed on mappings.
    /// `path` is the consumed prefix including the bracket segment.
    Index { key: String, path: String },
}

impl Path {
    /// Compiles a path string.
    pub fn parse(input: &str) -> Result<Path, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let mut steps = Vec::new();
        let mut consumed = String::with_capacity(input.len());
        for (index, segment) in input.split('.').enumerate() {
            if segment.is_empty() {
                return Err(ParseError::EmptySegment(input.to_string()));
            }
            let owner = if index == 0 {
                None
            } else {
                Some(consumed.clone())
            };
            if !consumed.is_empty() {
                consumed.push('.');
            }
            consumed.push_str(segment);

            let mut name = String::new();
            let mut token = String::new();
            let mut in_bracket = false;
            let mut closed = false;
            for character in segment.chars() {
                if in_bracket {
                    // Only the first `]` closes the bracket; anything after
                    // it, short of another `]`, still lands in the token.
                    if character == ']' {
                        closed = true;
                    } else {
                        token.push(character);
                    }
                } else if character == '[' {
                    in_bracket = true;
                } else if is_ident_char(character) {
                    name.push(character);
                } else {
                    return Err(ParseError::InvalidCharacter {
                        path: input.to_string(),
                        character,
                    });
                }
            }

            if in_bracket {
                if !closed {
                    return Err(ParseError::UnclosedBracket(input.to_string()));
                }
                if !name.is_empty() {
                    steps.push(Step::Property {
                        name,
                        owner: owner.clone(),
                    });
                }
                steps.push(Step::Index {
                    key: token,
                    path: consumed.clone(),
                });
            } else {
                steps.push(Step::Property { name, owner });
            }
        }

        Ok(Path {
            raw: input.to_string(),
            steps,
        })
    }

    /// Walks `root` through every step in order; the first failing step's
    /// error propagates unchanged.
    pub fn evaluate(&self, root: &Value) -> Result<Value, ResolveError> {
        let mut current = root.clone();
        for step in &self.steps {
            current = step.resolve(&current)?;
        }
        Ok(current)
    }

    /// The original path string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Step {
    /// Pulls the child value this step names out of `parent`.
    pub fn resolve(&self, parent: &Value) -> Result<Value, ResolveError> {
        match self {
            Step::Property { name, owner } => match parent {
                Value::Object(map) => match map.get(name) {
                    Some(child) => Ok(child.clone()),
                    None => Err(self.property_not_found(name, owner)),
                },
                _ => Err(self.property_not_found(name, owner)),
            },
            Step::Index { key, path } => match parent {
                Value::Null => Err(ResolveError::NullParent { path: path.clone() }),
                // Positional access is strict: the key must be numeric and
                // in range.
                Value::Array(items) => {
                    let index: usize = key.parse().map_err(|cause| ResolveError::IndexFormat {
                        key: key.clone(),
                        path: path.clone(),
                        cause,
                    })?;
                    items
                        .get(index)
                        .cloned()
                        .ok_or_else(|| ResolveError::IndexOutOfBounds {
                            index,
                            len: items.len(),
                            path: path.clone(),
                        })
                }
                // Keyed access is permissive: a missing key resolves to null
                // and it is the predicate's job to reject it.
                Value::Object(map) => Ok(map.get(key).cloned().unwrap_or(Value::Null)),
                other => Err(ResolveError::NotIndexable {
                    path: path.clone(),
                    kind: kind_name(other),
                }),
            },
        }
    }

    fn property_not_found(&self, name: &str, owner: &Option<String>) -> ResolveError {
        let owner = match owner {
            None => "root bean".to_string(),
            Some(prefix) => format!("bean {prefix}"),
        };
        ResolveError::PropertyNotFound {
            property: name.to_string(),
            owner,
        }
    }
}

fn is_ident_char(character: char) -> bool {
    character.is_alphanumeric() || character == '_' || character == '$'
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
