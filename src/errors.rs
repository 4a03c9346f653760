use std::error::Error as StdError;
use std::fmt;

use itertools::Itertools;
use thiserror::Error;

/// Boxed error used for caller-supplied failure causes.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Raised when a property path string cannot be compiled.
///
/// These are configuration errors: they surface at the registration call
/// (`BeanAssertBuilder::that`), before any root is ever retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Property must have at least one bean property.")]
    Empty,

    #[error("Property ({0}) is missing a property name or has two . next to each other.")]
    EmptySegment(String),

    #[error("Property ({path}) contains an invalid character ({character}).")]
    InvalidCharacter { path: String, character: char },

    #[error("Property ({0}) must end in a bracket (]).")]
    UnclosedBracket(String),
}

/// Raised while walking a compiled path against a concrete root value.
///
/// Every variant names the sub-path that was being resolved when the walk
/// stopped, so the failure reads the same whether the path was one hop or
/// five deep.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The parent value has no readable member with this name. `owner` is
    /// either `root bean` or `bean <prefix>` for the segments already walked.
    #[error("Property ({property}) does not exist on {owner}.")]
    PropertyNotFound { property: String, owner: String },

    /// Reading the bean's members raised; for `Serialize` roots this is a
    /// failing serializer.
    #[error("Error accessing bean ({bean}) reason: {cause}")]
    Access {
        bean: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("Cannot access into Map, List, or Array of {path} because the bean is null.")]
    NullParent { path: String },

    #[error("{key} cannot index into bean ({path}).  The index must be a number when accessing Lists or Arrays.")]
    IndexFormat {
        key: String,
        path: String,
        #[source]
        cause: std::num::ParseIntError,
    },

    #[error("Index ({index}) is out of bounds for bean ({path}) of length {len}.")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        path: String,
    },

    #[error("{path} is not a Map, List or Array but a {kind}")]
    NotIndexable { path: String, kind: &'static str },
}

/// A failed assertion run.
///
/// Failures are plain values threaded back through `Result` rather than
/// unwound; a run returns at most one of these, and its message enumerates
/// every independent problem found, indented by nesting level.
#[derive(Debug)]
pub enum Failure {
    /// The root supplier failed; no checks were attempted.
    Retrieval {
        name: Option<String>,
        cause: BoxError,
    },
    /// A compiled path could not be resolved against the retrieved root.
    Resolution(ResolveError),
    /// A predicate rejected the value it was given.
    Mismatch(String),
    /// The sole failure of a named builder, prefixed with its name.
    Named { name: String, cause: Box<Failure> },
    /// Two or more independent failures from one run, in registration order.
    Multiple {
        name: Option<String>,
        failures: Vec<Failure>,
    },
}

impl Failure {
    /// Aggregates failures under an optional name.
    ///
    /// # Panics
    ///
    /// Panics when `failures` is empty; an empty aggregate is a programmer
    /// error, not a run outcome.
    pub fn multiple(name: Option<String>, failures: Vec<Failure>) -> Self {
        assert!(!failures.is_empty(), "cannot aggregate an empty failure list");
        Failure::Multiple { name, failures }
    }

    /// Folds the failures collected by one run into its single outcome:
    /// none passes, one propagates (name-prefixed when the run is named),
    /// more than one aggregates.
    pub(crate) fn finish(name: Option<&str>, mut failures: Vec<Failure>) -> Result<(), Failure> {
        match failures.len() {
            0 => Ok(()),
            1 => {
                let failure = failures.remove(0);
                match name {
                    None => Err(failure),
                    Some(name) => Err(Failure::Named {
                        name: name.to_string(),
                        cause: Box::new(failure),
                    }),
                }
            }
            _ => Err(Failure::multiple(name.map(str::to_string), failures)),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Retrieval { name: None, .. } => f.write_str("Could not retrieve object."),
            Failure::Retrieval {
                name: Some(name), ..
            } => write!(f, "Could not retrieve object ({name})."),
            Failure::Resolution(e) => write!(f, "{e}"),
            Failure::Mismatch(message) => f.write_str(message),
            Failure::Named { name, cause } => write!(f, "{name} failed because: {cause}"),
            Failure::Multiple { name, failures } => {
                match name {
                    None => f.write_str("Multiple assertion errors:")?,
                    Some(name) => write!(f, "{name} had multiple failures:")?,
                }
                for failure in failures {
                    write!(f, "\n{}", indent(&failure.to_string()))?;
                }
                Ok(())
            }
        }
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Failure::Retrieval { cause, .. } => Some(&**cause),
            Failure::Resolution(e) => Some(e),
            Failure::Named { cause, .. } => Some(&**cause),
            Failure::Mismatch(_) | Failure::Multiple { .. } => None,
        }
    }
}

/// Prefixes every line, including embedded ones, with two spaces.
fn indent(message: &str) -> String {
    message.split('\n').map(|line| format!("  {line}")).join("\n")
}
