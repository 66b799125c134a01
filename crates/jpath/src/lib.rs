//! A small, JSON-native expression language.
//!
//! Script placeholders (`{{ ... }}`) in report templates are evaluated with
//! this engine. Expressions can only read the data and variables they are
//! given and call functions from a [`FunctionRegistry`]; there is no way to
//! reach the host.

pub mod ast;
pub mod engine;
pub mod error;
pub mod functions;
mod parser;

// --- Public API ---
pub use ast::{BinaryOp, Expression, PathSegment, Selection, UnaryOp};
pub use engine::{
    EvaluationContext, evaluate, evaluate_as_bool, evaluate_as_string, is_truthy, select,
    select_first, value_to_string,
};
pub use error::JPathError;
pub use functions::{FunctionRegistry, JPathFunction};
pub use parser::parse_expression;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    fn eval_with(source: &str, data: &Value, vars: &HashMap<String, Value>) -> Result<Value, JPathError> {
        let expr = parse_expression(source)?;
        let funcs = FunctionRegistry::default();
        let e_ctx = EvaluationContext {
            context_node: data,
            variables: vars,
            functions: &funcs,
            loop_position: None,
        };
        evaluate(&expr, &e_ctx)
    }

    fn eval(source: &str, data: &Value) -> Value {
        eval_with(source, data, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_parse_and_eval_simple_path() {
        let data = json!({ "customer": { "name": "ACME" } });
        assert_eq!(eval("customer.name", &data), json!("ACME"));
    }

    #[test]
    fn test_parse_and_eval_path_with_index() {
        let data = json!({ "orders": [ { "id": "A" }, { "id": "B" } ] });
        assert_eq!(eval("orders[1].id", &data), json!("B"));
    }

    #[test]
    fn test_missing_path_is_null() {
        let data = json!({ "orders": [] });
        assert_eq!(eval("orders[3].id", &data), Value::Null);
        assert_eq!(eval("nothing.here", &data), Value::Null);
    }

    #[test]
    fn test_parse_and_eval_function() {
        assert_eq!(eval("upper('hello')", &json!(null)), json!("HELLO"));
    }

    #[test]
    fn test_parse_and_eval_nested_function_with_path() {
        let expr = parse_expression("concat('ID: ', upper(customer.orders[0].id))").unwrap();
        let data = json!({ "customer": { "orders": [{ "id": "xn123" }] } });
        let vars = HashMap::new();
        let funcs = FunctionRegistry::default();
        let e_ctx = EvaluationContext {
            context_node: &data,
            variables: &vars,
            functions: &funcs,
            loop_position: None,
        };
        let result = evaluate_as_string(&expr, &e_ctx).unwrap();
        assert_eq!(result, "ID: XN123");
    }

    #[test]
    fn test_current_context_selection() {
        let data = json!("current value");
        assert_eq!(eval(".", &data), data);
    }

    #[test]
    fn test_arithmetic_keeps_integers() {
        let data = json!({ "price": 12, "qty": 3, "rate": 0.5 });
        assert_eq!(eval("price * qty", &data), json!(36));
        assert_eq!(eval("price / 4", &data), json!(3));
        assert_eq!(eval("price / 8", &data), json!(1.5));
        assert_eq!(eval("price * rate", &data), json!(6));
        assert_eq!(eval("price % 5", &data), json!(2));
        assert_eq!(eval("-price + 2", &data), json!(-10));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let result = eval_with("1 / 0", &json!(null), &HashMap::new());
        assert!(matches!(result, Err(JPathError::TypeError(_))));
    }

    #[test]
    fn test_string_concatenation_with_plus() {
        let data = json!({ "name": "Ada", "age": 36 });
        assert_eq!(eval("name + ' (' + age + ')'", &data), json!("Ada (36)"));
    }

    #[test]
    fn test_comparison_and_logic() {
        let data = json!({ "score": 80, "name": "Ada" });
        assert_eq!(eval("score >= 80 && name == 'Ada'", &data), json!(true));
        assert_eq!(eval("score < 50 || !(name != 'Ada')", &data), json!(true));
        assert_eq!(eval("if(score > 90, 'A', 'B')", &data), json!("B"));
    }

    #[test]
    fn test_variables_shadow_context_members() {
        let data = json!({ "row": "from data" });
        let mut vars = HashMap::new();
        vars.insert("row".to_string(), json!(3));
        assert_eq!(eval_with("row", &data, &vars).unwrap(), json!(3));
        assert_eq!(eval_with("$row + 1", &data, &vars).unwrap(), json!(4));
    }

    #[test]
    fn test_accessor_reads_at_member() {
        let data = json!({ "record": { "@name": "Ada", "name": "field" } });
        assert_eq!(eval("record.name()", &data), json!("Ada"));
        assert_eq!(eval("record.name", &data), json!("field"));
    }

    #[test]
    fn test_unknown_function() {
        let result = eval_with("launch()", &json!(null), &HashMap::new());
        assert_eq!(result, Err(JPathError::UnknownFunction("launch".to_string())));
    }

    #[test]
    fn test_aggregates() {
        let data = json!({ "items": [1, 2, 3], "prices": [1.5, 2.25] });
        assert_eq!(eval("count(items)", &data), json!(3));
        assert_eq!(eval("sum(items)", &data), json!(6));
        assert_eq!(eval("sum(prices)", &data), json!(3.75));
        assert_eq!(eval("round(2.346, 2)", &data), json!(2.35));
    }

    #[test]
    fn test_integer_overflow_falls_back_to_float() {
        let data = json!({ "min": i64::MIN, "big": [i64::MAX, 1] });
        assert_eq!(eval("-min", &data).as_f64(), Some(-(i64::MIN as f64)));
        assert_eq!(eval("sum(big)", &data).as_f64(), Some(i64::MAX as f64 + 1.0));
    }

    #[test]
    fn test_evaluate_as_string_prints_integral_floats_plainly() {
        assert_eq!(value_to_string(&json!(5.0)), "5");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&Value::Null), "");
    }
}
