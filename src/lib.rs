//! Deferred, aggregating assertions over lazily retrieved values.
//!
//! Instead of stopping at the first failed expectation, a
//! [`BeanAssertBuilder`] retrieves its root value once, runs every registered
//! check, and reports all failures in one composite message; an
//! [`AssertCollector`] does the same across many builders. Checks address
//! into the root with a compiled property path (`a.b[2].c[key]`).
//!
//! ```
//! use bean_asserts::{eq, AssertCollector};
//! use serde_json::json;
//!
//! let mut collector = AssertCollector::new();
//! collector
//!     .bean(json!({ "user": { "name": "ada", "tags": ["admin"] } }))
//!     .that("user.name", eq("ada"))?
//!     .that("user.tags[0]", eq("admin"))?;
//! collector.run_and_reset()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod collector;
pub mod errors;
pub mod path;
pub mod predicate;

pub use builder::BeanAssertBuilder;
pub use collector::AssertCollector;
pub use errors::{BoxError, Failure, ParseError, ResolveError};
pub use path::{Path, Step};
pub use predicate::{eq, is_null, not_null, predicate, Predicate};

/// A runnable group of assertions.
///
/// Builders and collectors both implement this; the run either completes
/// silently or yields exactly one [`Failure`] covering everything that went
/// wrong.
pub trait AssertGroup {
    fn run_assert(&self) -> Result<(), Failure>;
}

/// Adapts a closure into an assertion group, for ad-hoc checks that need no
/// root value.
pub struct AdHoc<F>(pub F);

impl<F> AssertGroup for AdHoc<F>
where
    F: Fn() -> Result<(), Failure>,
{
    fn run_assert(&self) -> Result<(), Failure> {
        (self.0)()
    }
}
