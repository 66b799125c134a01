//! Defines the registry and built-in implementations for JPath functions.
use super::engine::{EvaluationContext, is_truthy, value_to_string};
use serde_json::{Number, Value, json};
use std::collections::HashMap;

/// The signature for a custom JPath function implementation.
pub type JPathFunction = fn(e_ctx: &EvaluationContext, args: Vec<Value>) -> Value;

/// A registry to hold all available functions for the evaluation engine.
pub struct FunctionRegistry {
    functions: HashMap<String, JPathFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self { functions: HashMap::new() }
    }

    /// Registers a new function.
    pub fn register(&mut self, name: &str, func: JPathFunction) {
        self.functions.insert(name.to_lowercase(), func);
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&JPathFunction> {
        self.functions.get(&name.to_lowercase())
    }
}

// --- Built-in Function Implementations ---

fn upper(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    args.first().and_then(|v| v.as_str()).map(|s| s.to_uppercase().into()).unwrap_or(Value::Null)
}

fn lower(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    args.first().and_then(|v| v.as_str()).map(|s| s.to_lowercase().into()).unwrap_or(Value::Null)
}

fn trim(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    args.first().and_then(|v| v.as_str()).map(|s| s.trim().into()).unwrap_or(Value::Null)
}

fn concat(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    args.iter().map(value_to_string).collect::<String>().into()
}

fn contains(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    let haystack = args.first().and_then(|v| v.as_str());
    let needle = args.get(1).and_then(|v| v.as_str());
    match (haystack, needle) {
        (Some(h), Some(n)) => h.contains(n).into(),
        _ => false.into(),
    }
}

fn count(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    json!(args.first().and_then(|v| v.as_array()).map_or(0, |arr| arr.len()))
}

fn sum(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    let Some(items) = args.first().and_then(|v| v.as_array()) else {
        return json!(0);
    };
    let integers = items.iter().map(Value::as_i64).try_fold(0i64, |total, n| total.checked_add(n?));
    if let Some(total) = integers {
        return json!(total);
    }
    let total: f64 = items.iter().filter_map(Value::as_f64).sum();
    Number::from_f64(total).map(Value::Number).unwrap_or(Value::Null)
}

fn round(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    let Some(n) = args.first().and_then(Value::as_f64) else {
        return Value::Null;
    };
    let places = args.get(1).and_then(Value::as_i64).unwrap_or(0).clamp(0, 10) as i32;
    if places == 0 {
        return json!(n.round() as i64);
    }
    let factor = 10f64.powi(places);
    Number::from_f64((n * factor).round() / factor).map(Value::Number).unwrap_or(Value::Null)
}

fn position(e_ctx: &EvaluationContext, _args: Vec<Value>) -> Value {
    // Position is 1-based for user-facing templates.
    json!(e_ctx.loop_position.unwrap_or(0).saturating_add(1))
}

fn equals(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    if args.len() != 2 {
        return json!(false);
    }
    json!(value_to_string(&args[0]) == value_to_string(&args[1]))
}

fn if_then_else(_e_ctx: &EvaluationContext, args: Vec<Value>) -> Value {
    let mut args = args.into_iter();
    let condition = args.next().is_some_and(|v| is_truthy(&v));
    let then = args.next().unwrap_or(Value::Null);
    let otherwise = args.next().unwrap_or(Value::Null);
    if condition { then } else { otherwise }
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("trim", trim);
        registry.register("concat", concat);
        registry.register("contains", contains);
        registry.register("count", count);
        registry.register("sum", sum);
        registry.register("round", round);
        registry.register("position", position);
        registry.register("equals", equals);
        registry.register("if", if_then_else);
        registry
    }
}
