//! The evaluation engine for JPath ASTs.
use super::ast::{BinaryOp, Expression, PathSegment, Selection, UnaryOp};
use super::functions::FunctionRegistry;
use crate::error::JPathError;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Everything an expression may read while it is evaluated.
pub struct EvaluationContext<'a> {
    pub context_node: &'a Value,
    pub variables: &'a HashMap<String, Value>,
    pub functions: &'a FunctionRegistry,
    pub loop_position: Option<usize>,
}

/// Evaluates a parsed expression.
pub fn evaluate(expr: &Expression, e_ctx: &EvaluationContext) -> Result<Value, JPathError> {
    match expr {
        Expression::Literal(v) => Ok(v.clone()),
        Expression::Selection(selection) => Ok(select_first(selection, e_ctx.context_node, e_ctx.variables)
            .cloned()
            .unwrap_or(Value::Null)),
        Expression::FunctionCall { name, args } => {
            let func = e_ctx
                .functions
                .get(name)
                .ok_or_else(|| JPathError::UnknownFunction(name.clone()))?;
            let evaluated_args = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(func(e_ctx, evaluated_args))
        }
        Expression::Unary { op, operand } => {
            let v = evaluate(operand, e_ctx)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!is_truthy(&v))),
                UnaryOp::Neg => match v.as_i64().and_then(i64::checked_neg) {
                    Some(i) => Ok(Value::from(i)),
                    None => float_value(-as_number(&v, "-")?),
                },
            }
        }
        Expression::Binary { op, left, right } => match op {
            BinaryOp::And => {
                if !is_truthy(&evaluate(left, e_ctx)?) {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(is_truthy(&evaluate(right, e_ctx)?)))
            }
            BinaryOp::Or => {
                if is_truthy(&evaluate(left, e_ctx)?) {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(is_truthy(&evaluate(right, e_ctx)?)))
            }
            _ => {
                let l = evaluate(left, e_ctx)?;
                let r = evaluate(right, e_ctx)?;
                apply_binary(*op, &l, &r)
            }
        },
    }
}

/// Evaluates an expression and coerces the result to a boolean.
pub fn evaluate_as_bool(expr: &Expression, e_ctx: &EvaluationContext) -> Result<bool, JPathError> {
    evaluate(expr, e_ctx).map(|v| is_truthy(&v))
}

/// Evaluates an expression and coerces the result to a string. `null` is empty.
pub fn evaluate_as_string(expr: &Expression, e_ctx: &EvaluationContext) -> Result<String, JPathError> {
    evaluate(expr, e_ctx).map(|v| value_to_string(&v))
}

/// Truthiness: `null`, `false`, `0`, `""` and `[]` are false.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

/// The printable form of a value. Integral numbers print without a fraction.
pub fn value_to_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn apply_binary(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, JPathError> {
    match op {
        BinaryOp::Add if l.is_string() || r.is_string() => {
            Ok(Value::String(value_to_string(l) + &value_to_string(r)))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, l, r)
        }
        BinaryOp::Eq => Ok(Value::Bool(values_equal(l, r))),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(l, r))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(l, r)?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::And => Ok(Value::Bool(is_truthy(l) && is_truthy(r))),
        BinaryOp::Or => Ok(Value::Bool(is_truthy(l) || is_truthy(r))),
    }
}

fn arithmetic(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, JPathError> {
    if let (Some(a), Some(b)) = (l.as_i64(), r.as_i64()) {
        let exact = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Rem => a.checked_rem(b),
            _ => a.checked_rem(b).filter(|rem| *rem == 0).and_then(|_| a.checked_div(b)),
        };
        if let Some(v) = exact {
            return Ok(Value::from(v));
        }
    }
    let symbol = symbol(op);
    let a = as_number(l, symbol)?;
    let b = as_number(r, symbol)?;
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0.0 {
        return Err(JPathError::TypeError("Division by zero".to_string()));
    }
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        _ => a % b,
    };
    float_value(result)
}

fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

fn as_number(v: &Value, symbol: &str) -> Result<f64, JPathError> {
    match v {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| JPathError::TypeError(format!("'{}' is not a finite number", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| JPathError::TypeError(format!("Operator '{}' cannot use '{}'", symbol, s))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Ok(0.0),
        other => Err(JPathError::TypeError(format!(
            "Operator '{}' cannot use {}",
            symbol, other
        ))),
    }
}

fn float_value(f: f64) -> Result<Value, JPathError> {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        return Ok(Value::from(f as i64));
    }
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| JPathError::TypeError(format!("'{}' is not a finite number", f)))
}

fn values_equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => l == r,
    }
}

fn compare(l: &Value, r: &Value) -> Result<Ordering, JPathError> {
    match (l, r) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => {
            let a = as_number(l, "<")?;
            let b = as_number(r, "<")?;
            a.partial_cmp(&b)
                .ok_or_else(|| JPathError::TypeError(format!("Cannot compare {} and {}", l, r)))
        }
    }
}

/// Resolves a selection to every matching node. Paths yield at most one node.
pub fn select<'a>(
    selection: &Selection,
    context: &'a Value,
    variables: &'a HashMap<String, Value>,
) -> Vec<&'a Value> {
    match selection {
        Selection::CurrentContext => vec![context],
        Selection::Variable(name) => variables.get(name).into_iter().collect(),
        Selection::Path(segments) => {
            let mut iter = segments.iter();
            let mut current = match iter.next() {
                Some(PathSegment::Key(key)) => match variables.get(key).or_else(|| context.get(key)) {
                    Some(node) => node,
                    None => return vec![],
                },
                Some(segment) => match step(context, segment) {
                    Some(node) => node,
                    None => return vec![],
                },
                None => context,
            };
            for segment in iter {
                match step(current, segment) {
                    Some(node) => current = node,
                    None => return vec![],
                }
            }
            vec![current]
        }
    }
}

/// Resolves a selection to its first matching node.
pub fn select_first<'a>(
    selection: &Selection,
    context: &'a Value,
    variables: &'a HashMap<String, Value>,
) -> Option<&'a Value> {
    select(selection, context, variables).into_iter().next()
}

fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match segment {
        PathSegment::Key(key) => current.get(key),
        PathSegment::Index(index) => current.get(index),
        PathSegment::Accessor(name) => current.get(format!("@{}", name).as_str()),
    }
}
