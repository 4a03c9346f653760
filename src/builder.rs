use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::errors::{BoxError, Failure, ParseError, ResolveError};
use crate::path::Path;
use crate::predicate::{is_null, not_null, Predicate};
use crate::AssertGroup;

/// How root retrieval can fail: the supplier itself, or serializing the bean
/// it produced.
enum RootError {
    Fetch(BoxError),
    Access(serde_json::Error),
}

type Supplier = Box<dyn Fn() -> Result<Value, RootError>>;

/// Groups multiple checks against one lazily retrieved root value.
///
/// The root is pulled exactly once per [`run_assert`](AssertGroup::run_assert)
/// and every registered check runs against it, in registration order, even
/// when earlier checks fail. The run's outcome is one [`Failure`] describing
/// everything that went wrong, or nothing.
pub struct BeanAssertBuilder {
    name: Option<String>,
    supplier: Supplier,
    checks: Vec<Check>,
}

enum Check {
    Value {
        predicate: Box<dyn Predicate>,
    },
    Path {
        path: Path,
        label: String,
        predicate: Box<dyn Predicate>,
    },
}

impl BeanAssertBuilder {
    /// Builds around a supplier that retrieves the bean when the assertions
    /// run.
    pub fn new<T, E, F>(supplier: F) -> Self
    where
        T: Serialize,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + 'static,
    {
        Self::with_supplier(None, supplier)
    }

    /// Like [`new`](Self::new), with a name that identifies this builder's
    /// failures among others.
    pub fn named<T, E, F>(name: impl Into<String>, supplier: F) -> Self
    where
        T: Serialize,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + 'static,
    {
        Self::with_supplier(Some(name.into()), supplier)
    }

    /// Builds around a bean held directly.
    pub fn of<T: Serialize + 'static>(bean: T) -> Self {
        Self::with_bean(None, bean)
    }

    /// Like [`of`](Self::of), with a name.
    pub fn of_named<T: Serialize + 'static>(name: impl Into<String>, bean: T) -> Self {
        Self::with_bean(Some(name.into()), bean)
    }

    fn with_supplier<T, E, F>(name: Option<String>, supplier: F) -> Self
    where
        T: Serialize,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + 'static,
    {
        let supplier: Supplier = Box::new(move || {
            let bean = supplier().map_err(|e| RootError::Fetch(e.into()))?;
            serde_json::to_value(bean).map_err(RootError::Access)
        });
        Self {
            name,
            supplier,
            checks: Vec::new(),
        }
    }

    fn with_bean<T: Serialize + 'static>(name: Option<String>, bean: T) -> Self {
        Self {
            name,
            supplier: Box::new(move || serde_json::to_value(&bean).map_err(RootError::Access)),
            checks: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Registers a check against the value `property` resolves to.
    ///
    /// The path compiles eagerly, so grammar errors surface here rather than
    /// at run time. The path string doubles as the label in failure messages.
    pub fn that(
        &mut self,
        property: &str,
        predicate: impl Predicate + 'static,
    ) -> Result<&mut Self, ParseError> {
        let label = property.to_string();
        self.that_described(property, label, predicate)
    }

    /// Registers a path check with a caller-supplied label.
    pub fn that_described(
        &mut self,
        property: &str,
        label: impl Into<String>,
        predicate: impl Predicate + 'static,
    ) -> Result<&mut Self, ParseError> {
        let path = Path::parse(property)?;
        self.checks.push(Check::Path {
            path,
            label: label.into(),
            predicate: Box::new(predicate),
        });
        Ok(self)
    }

    /// Registers a check against the whole root.
    pub fn that_value(&mut self, predicate: impl Predicate + 'static) -> &mut Self {
        self.checks.push(Check::Value {
            predicate: Box::new(predicate),
        });
        self
    }

    /// Checks that the root is null.
    pub fn is_null(&mut self) -> &mut Self {
        self.that_value(is_null())
    }

    /// Checks that the root is not null.
    pub fn not_null(&mut self) -> &mut Self {
        self.that_value(not_null())
    }
}

impl std::fmt::Debug for BeanAssertBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanAssertBuilder")
            .field("name", &self.name)
            .field("checks", &self.checks.len())
            .finish()
    }
}

impl AssertGroup for BeanAssertBuilder {
    fn run_assert(&self) -> Result<(), Failure> {
        trace!(name = ?self.name, checks = self.checks.len(), "running bean assertions");
        let root = match (self.supplier)() {
            Ok(root) => root,
            Err(RootError::Fetch(cause)) => {
                return Err(Failure::Retrieval {
                    name: self.name.clone(),
                    cause,
                });
            }
            Err(RootError::Access(cause)) => {
                let bean = self.name.clone().unwrap_or_else(|| "root bean".to_string());
                return Err(Failure::Resolution(ResolveError::Access { bean, cause }));
            }
        };

        let mut failures = Vec::new();
        for check in &self.checks {
            if let Err(failure) = check.run(&root) {
                failures.push(failure);
            }
        }
        if !failures.is_empty() {
            debug!(name = ?self.name, count = failures.len(), "bean assertions failed");
        }
        Failure::finish(self.name.as_deref(), failures)
    }
}

impl Check {
    fn run(&self, root: &Value) -> Result<(), Failure> {
        match self {
            Check::Value { predicate } => predicate
                .check(root)
                .map_err(|actual| mismatch(None, &predicate.expectation(), &actual)),
            Check::Path {
                path,
                label,
                predicate,
            } => {
                let value = path.evaluate(root).map_err(Failure::Resolution)?;
                predicate
                    .check(&value)
                    .map_err(|actual| mismatch(Some(label), &predicate.expectation(), &actual))
            }
        }
    }
}

/// Mismatch text in the conventional `Expected:` / `but:` shape.
fn mismatch(label: Option<&str>, expectation: &str, actual: &str) -> Failure {
    let message = match label {
        Some(label) => format!("\nExpected: {label} {expectation}\n     but: {label} {actual}"),
        None => format!("\nExpected: {expectation}\n     but: {actual}"),
    };
    Failure::Mismatch(message)
}
