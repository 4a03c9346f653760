use serde_json::Value;

/// A check applied to a resolved value.
///
/// The matcher abstraction itself is a caller capability; this trait is only
/// the seam the builder needs: an expectation description for the failure
/// message, and a pass/fail check that describes the actual value on
/// rejection.
pub trait Predicate {
    /// Expectation text, e.g. `is "worked"`.
    fn expectation(&self) -> String;

    /// `Ok` when the value matches, `Err` with a description of the actual
    /// value otherwise.
    fn check(&self, value: &Value) -> Result<(), String>;
}

/// Matches values equal to `expected`.
pub fn eq(expected: impl Into<Value>) -> impl Predicate {
    IsEqual(expected.into())
}

/// Matches only null.
pub fn is_null() -> impl Predicate {
    IsNull
}

/// Matches anything but null.
pub fn not_null() -> impl Predicate {
    NotNull
}

/// Adapts a closure into a predicate; `expectation` describes what the
/// closure accepts.
pub fn predicate<F>(expectation: impl Into<String>, check: F) -> impl Predicate
where
    F: Fn(&Value) -> bool,
{
    FnPredicate {
        expectation: expectation.into(),
        check,
    }
}

struct IsEqual(Value);

impl Predicate for IsEqual {
    fn expectation(&self) -> String {
        format!("is {}", self.0)
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if *value == self.0 {
            Ok(())
        } else {
            Err(format!("was {value}"))
        }
    }
}

struct IsNull;

impl Predicate for IsNull {
    fn expectation(&self) -> String {
        "null".to_string()
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            Ok(())
        } else {
            Err(format!("was {value}"))
        }
    }
}

struct NotNull;

impl Predicate for NotNull {
    fn expectation(&self) -> String {
        "not null".to_string()
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            Err("was null".to_string())
        } else {
            Ok(())
        }
    }
}

struct FnPredicate<F> {
    expectation: String,
    check: F,
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Value) -> bool,
{
    fn expectation(&self) -> String {
        self.expectation.clone()
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if (self.check)(value) {
            Ok(())
        } else {
            Err(format!("was {value}"))
        }
    }
}
