//! End-to-end language scenarios, each a full lex-parse-eval round trip
//! through [`zygon_eval::Evaluator::run_source`], not a unit test of one
//! phase.

use std::path::PathBuf;

use zygon_eval::{EvalError, Value};
use zygon_util::Symbol;

fn eval(source: &str) -> Value {
    zygon_eval::Evaluator::run_source(PathBuf::from("."), PathBuf::from("lib"), source)
        .unwrap_or_else(|e| panic!("expected {source:?} to evaluate, got {e}"))
}

fn eval_err(source: &str) -> EvalError {
    zygon_eval::Evaluator::run_source(PathBuf::from("."), PathBuf::from("lib"), source)
        .expect_err("expected evaluation to fail")
}

fn table(entries: Vec<(Value, Value)>) -> Value {
    let mut map = zygon_eval::value::Entries::new();
    for (k, v) in entries {
        map.insert(k, v);
    }
    Value::new_table(map)
}

fn key(name: &str) -> Value {
    Value::TableKey(Symbol::intern(name))
}

fn number(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn scenario_arithmetic_and_blocks() {
    let result = eval("x: 1 + 2 * 3\nx\n");
    assert_eq!(result, number(7.0));
}

#[test]
fn scenario_function_with_default_and_rest() {
    assert_eq!(
        eval("f(a, b: 10, ...rest):\n    a + b\nf(5)\n"),
        number(15.0)
    );
    assert_eq!(
        eval("f(a, b: 10, ...rest):\n    a + b\nf(5, b: 20)\n"),
        number(25.0)
    );
    assert_eq!(
        eval("f(a, b: 10, ...rest):\n    a + b\nf(5, 20, 30, 40)\n"),
        number(25.0)
    );
}

#[test]
fn scenario_function_rest_parameter_collects_positional_overflow() {
    let src = "f(a, b: 10, ...rest):\n    rest\nf(5, 20, 30, 40)\n";
    let expected = table(vec![(number(0.0), number(30.0)), (number(1.0), number(40.0))]);
    assert_eq!(eval(src), expected);
}

#[test]
fn scenario_case_with_table_pattern() {
    let src = concat!(
        "point: {x: 3, y: 4}\n",
        "case point:\n",
        "    {x: 0, y: 0}: \"origin\"\n",
        "    {x: x, y: y}: \"at {x},{y}\"\n",
    );
    assert_eq!(eval(src), Value::Text("at 3,4".to_string()));
}

#[test]
fn scenario_rest_pattern_renumbering() {
    let src = concat!(
        "lst: {10, 20, 30, 40}\n",
        "case lst:\n",
        "    {first, ...tail}: tail\n",
    );
    let expected = table(vec![
        (number(0.0), number(20.0)),
        (number(1.0), number(30.0)),
        (number(2.0), number(40.0)),
    ]);
    assert_eq!(eval(src), expected);
}

#[test]
fn scenario_module_with_public_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("math.zygon"), "pub square(n): n * n\n").unwrap();

    let result = zygon_eval::Evaluator::run_source(
        dir.path().to_path_buf(),
        PathBuf::from("lib"),
        "using math\nmath.square(7)\n",
    )
    .expect("module load should succeed");
    assert_eq!(result, number(49.0));
}

#[test]
fn scenario_text_interpolation_and_io_log_returns_nil() {
    let result = eval("using IO\nIO.log(\"2+2={2+2}\")\n");
    assert_eq!(result, Value::Nil);
}

#[test]
fn idempotence_of_pure_evaluation() {
    let src = "f(a, b): a * b + (a - b)\nf(6, 3)\n";
    assert_eq!(eval(src), eval(src));
}

#[test]
fn table_change_with_empty_changes_is_a_deep_equal_copy() {
    let src = concat!(
        "using Table\n",
        "original: {a: 1, b: {c: 2}}\n",
        "copy: Table.change(original, {})\n",
        "copy\n",
    );
    let expected = table(vec![
        (key("a"), number(1.0)),
        (key("b"), table(vec![(key("c"), number(2.0))])),
    ]);
    assert_eq!(eval(src), expected);
}

#[test]
fn change_then_delete_matches_delete_when_key_was_absent() {
    // `t` has no positional entry, so key `0` is absent from it; there is no
    // literal syntax in the language for a standalone `TableKey` value, so
    // the absent key under test has to be a `Number` index rather than a
    // named key.
    let changed_then_deleted = eval(concat!(
        "using Table\n",
        "t: {a: 1}\n",
        "Table.delete(Table.change(t, {9}), 0)\n",
    ));
    let deleted_directly = eval(concat!("using Table\n", "t: {a: 1}\n", "Table.delete(t, 0)\n"));
    assert_eq!(changed_then_deleted, deleted_directly);
}

#[test]
fn table_delete_renumbers_integer_keys() {
    let src = concat!(
        "using Table\n",
        "t: {10, 20, 30}\n",
        "Table.delete(t, 0)\n",
    );
    let expected = table(vec![(number(0.0), number(20.0)), (number(1.0), number(30.0))]);
    assert_eq!(eval(src), expected);
}

#[test]
fn pattern_bindings_are_a_subset_of_the_matched_table() {
    let src = concat!(
        "point: {x: 3, y: 4, z: 5}\n",
        "case point:\n",
        "    {x: x}: x\n",
    );
    assert_eq!(eval(src), number(3.0));
}

#[test]
fn empty_table_pattern_matches_any_table() {
    let src = "case {a: 1, b: 2}:\n    {}: \"matched\"\n";
    assert_eq!(eval(src), Value::Text("matched".to_string()));
}

#[test]
fn bare_rest_requires_an_unmatched_entry_to_remain() {
    let exact_match_fails = concat!(
        "case {a: 1}:\n",
        "    {a: x, ...}: \"has more\"\n",
        "    default: \"exact\"\n",
    );
    assert_eq!(eval(exact_match_fails), Value::Text("exact".to_string()));

    let extra_entry_matches = concat!(
        "case {a: 1, b: 2}:\n",
        "    {a: x, ...}: \"has more\"\n",
        "    default: \"exact\"\n",
    );
    assert_eq!(eval(extra_entry_matches), Value::Text("has more".to_string()));
}

#[test]
fn rebinding_a_name_in_the_same_frame_is_a_hard_error() {
    let err = eval_err("x: 1\nx: 2\n");
    assert!(matches!(err, EvalError::AlreadyBound { .. }));
}

#[test]
fn unknown_identifier_is_a_hard_error() {
    let err = eval_err("y\n");
    assert!(matches!(err, EvalError::UnknownIdentifier { .. }));
}

#[test]
fn non_exhaustive_case_without_default_is_a_hard_error() {
    let err = eval_err("case 5:\n    1: \"one\"\n    2: \"two\"\n");
    assert!(matches!(err, EvalError::NonExhaustiveCase { .. }));
}

#[test]
fn spreading_a_non_table_argument_is_a_hard_error() {
    let err = eval_err("f(a): a\nf(...1)\n");
    assert!(matches!(err, EvalError::SpreadRequiresTable { .. }));
}

#[test]
fn type_module_round_trips_through_type_type() {
    let src = concat!(
        "using Type\n",
        "Type.type(1) is Type.number and Type.type(\"a\") is Type.text\n",
    );
    assert_eq!(eval(src), Value::Boolean(true));
}

#[test]
fn text_split_produces_a_number_keyed_table() {
    let src = "using Text\nText.split(\"a,b,c\", \",\")\n";
    let expected = table(vec![
        (number(0.0), Value::Text("a".to_string())),
        (number(1.0), Value::Text("b".to_string())),
        (number(2.0), Value::Text("c".to_string())),
    ]);
    assert_eq!(eval(src), expected);
}

#[test]
fn error_values_flow_as_ordinary_data_without_auto_propagation() {
    let src = concat!(
        "using Error\n",
        "using Type\n",
        "e: Error.error(\"boom\")\n",
        "Type.type(e) is Type.error\n",
    );
    assert_eq!(eval(src), Value::Boolean(true));
}
