use bean_asserts::{eq, AssertGroup, BeanAssertBuilder, Failure, ParseError};
use pretty_assertions::assert_eq;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Registers an `is "worked"` check for every path and expects the run to
/// pass.
fn run_ok(root: Value, paths: &[&str]) {
    init_tracing();
    let mut builder = BeanAssertBuilder::of(root);
    for path in paths {
        builder.that(path, eq("worked")).unwrap();
    }
    builder.run_assert().unwrap();
}

/// Same, but expects the run to fail with exactly this message.
fn run_err(root: Value, expected_message: &str, paths: &[&str]) {
    init_tracing();
    let mut builder = BeanAssertBuilder::of(root);
    for path in paths {
        builder.that(path, eq("worked")).unwrap();
    }
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(failure.to_string(), expected_message);
}

#[test]
fn access_property() {
    run_ok(json!({ "text": "worked" }), &["text"]);
}

#[test]
fn access_child_property() {
    run_ok(json!({ "thing": { "text": "worked" } }), &["thing.text"]);
}

#[test]
fn access_list() {
    run_ok(json!(["worked"]), &["[0]"]);
}

#[test]
fn access_child_list() {
    run_ok(json!({ "text": ["test", "worked"] }), &["text[1]"]);
}

#[test]
fn access_map() {
    run_ok(json!({ "test": "worked" }), &["[test]"]);
}

#[test]
fn access_map_with_a_numeric_key() {
    run_ok(json!({ "1": "worked" }), &["[1]"]);
}

#[test]
fn access_child_map() {
    run_ok(json!({ "text": { "test": "worked" } }), &["text[test]"]);
}

#[test]
fn property_not_present() {
    run_err(
        json!({}),
        "Property (text) does not exist on root bean.",
        &["text"],
    );
}

#[test]
fn child_property_not_present() {
    run_err(
        json!({ "thing": {} }),
        "Property (text) does not exist on bean thing.",
        &["thing.text"],
    );
}

#[test]
fn list_indexed_with_a_string() {
    run_err(
        json!({ "test": ["test"] }),
        "what cannot index into bean (test[what]).  The index must be a number when accessing Lists or Arrays.",
        &["test[what]"],
    );
}

#[test]
fn list_index_out_of_range() {
    run_err(
        json!(["worked"]),
        "Index (1) is out of bounds for bean ([1]) of length 1.",
        &["[1]"],
    );
}

#[test]
fn bracket_access_on_a_scalar() {
    run_err(
        json!({ "test": "test" }),
        "test[what] is not a Map, List or Array but a string",
        &["test[what]"],
    );
}

#[test]
fn bracket_access_on_null() {
    run_err(
        json!({ "test": null }),
        "Cannot access into Map, List, or Array of test[what] because the bean is null.",
        &["test[what]"],
    );
}

#[test]
fn map_miss_is_a_predicate_mismatch_not_a_resolution_error() {
    let mut builder = BeanAssertBuilder::of(json!({ "test": "worked" }));
    builder.that("[missing]", eq("worked")).unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert!(matches!(failure, Failure::Mismatch(_)), "got {failure:?}");
    assert_eq!(
        failure.to_string(),
        "\nExpected: [missing] is \"worked\"\n     but: [missing] was null"
    );
}

#[test]
fn multiple_failures_aggregate_in_registration_order() {
    run_err(
        json!({ "text": "notWork", "other": "notWork" }),
        "Multiple assertion errors:\n  \n  Expected: text is \"worked\"\n       but: text was \"notWork\"\n  \n  Expected: other is \"worked\"\n       but: other was \"notWork\"",
        &["text", "other"],
    );
}

#[test]
fn is_null_passes_on_null_roots() {
    let mut builder = BeanAssertBuilder::of(Value::Null);
    builder.is_null();
    builder.run_assert().unwrap();
}

#[test]
fn is_null_failure_message() {
    let mut builder = BeanAssertBuilder::of(json!(""));
    builder.is_null();
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(failure.to_string(), "\nExpected: null\n     but: was \"\"");
}

#[test]
fn not_null() {
    let mut builder = BeanAssertBuilder::of(json!(""));
    builder.not_null();
    builder.run_assert().unwrap();

    let mut builder = BeanAssertBuilder::of(Value::Null);
    builder.not_null();
    builder.run_assert().unwrap_err();
}

#[test]
fn named_builder_prefixes_its_single_failure() {
    let mut builder = BeanAssertBuilder::of_named("myBean", json!({}));
    builder.that("text", eq("worked")).unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(
        failure.to_string(),
        "myBean failed because: Property (text) does not exist on root bean."
    );
    assert!(std::error::Error::source(&failure).is_some());
}

#[test]
fn named_builder_heads_its_composite() {
    let mut builder = BeanAssertBuilder::of_named("myBean", json!({ "a": 1, "b": 2 }));
    builder.that("a", eq(7)).unwrap().that("b", eq(7)).unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert!(
        failure.to_string().starts_with("myBean had multiple failures:"),
        "got {failure}"
    );
}

#[test]
fn supplier_failure_skips_every_check() {
    let mut builder = BeanAssertBuilder::new(|| -> Result<Value, std::io::Error> {
        Err(std::io::Error::other("connection refused"))
    });
    // Would always fail if it ran; it must not show up as a constituent.
    builder.that("text", eq("worked")).unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(failure.to_string(), "Could not retrieve object.");
    assert_eq!(
        std::error::Error::source(&failure).unwrap().to_string(),
        "connection refused"
    );
}

#[test]
fn named_supplier_failure_names_the_builder() {
    let mut builder = BeanAssertBuilder::named("myBean", || -> Result<Value, std::io::Error> {
        Err(std::io::Error::other("connection refused"))
    });
    builder.that("text", eq("worked")).unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(failure.to_string(), "Could not retrieve object (myBean).");
}

struct Broken;

impl Serialize for Broken {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("getter blew up"))
    }
}

#[test]
fn failing_member_reads_surface_as_access_errors() {
    let mut builder = BeanAssertBuilder::of(Broken);
    builder.that("text", eq("worked")).unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(
        failure.to_string(),
        "Error accessing bean (root bean) reason: getter blew up"
    );

    let mut builder = BeanAssertBuilder::of_named("gadget", Broken);
    builder.that("text", eq("worked")).unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(
        failure.to_string(),
        "Error accessing bean (gadget) reason: getter blew up"
    );
}

#[test]
fn path_errors_surface_at_registration_not_at_run_time() {
    let mut builder = BeanAssertBuilder::of(json!({}));
    let err = builder.that("a..b", eq("worked")).unwrap_err();
    assert_eq!(err, ParseError::EmptySegment("a..b".to_string()));
    // Nothing was registered, so the run passes.
    builder.run_assert().unwrap();
}

#[test]
fn described_checks_use_the_caller_label() {
    let mut builder = BeanAssertBuilder::of(json!({ "text": "notWork" }));
    builder
        .that_described("text", "the greeting", eq("worked"))
        .unwrap();
    let failure = builder.run_assert().unwrap_err();
    assert_eq!(
        failure.to_string(),
        "\nExpected: the greeting is \"worked\"\n     but: the greeting was \"notWork\""
    );
}

#[derive(Serialize)]
struct Widget {
    text: String,
    sizes: Vec<u32>,
}

#[test]
fn serializable_structs_work_as_roots() {
    let mut builder = BeanAssertBuilder::of(Widget {
        text: "worked".to_string(),
        sizes: vec![3, 5],
    });
    builder
        .that("text", eq("worked"))
        .unwrap()
        .that("sizes[1]", eq(5))
        .unwrap();
    builder.run_assert().unwrap();
}

#[test]
fn running_twice_retrieves_twice_and_reports_the_same() {
    let mut builder = BeanAssertBuilder::of(json!({ "text": "notWork" }));
    builder.that("text", eq("worked")).unwrap();
    let first = builder.run_assert().unwrap_err().to_string();
    let second = builder.run_assert().unwrap_err().to_string();
    assert_eq!(first, second);
}
