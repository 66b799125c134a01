//! A `nom`-based parser for the JPath expression language.
//!
//! Precedence, loosest first: `||`, `&&`, `== !=`, `< <= > >=`, `+ -`,
//! `* / %`, prefix `! -`.
use super::ast::{BinaryOp, Expression, PathSegment, Selection, UnaryOp};
use crate::error::JPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, char, digit1, multispace0, satisfy, u64 as nom_u64},
    combinator::{map, map_res, not, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};
use serde_json::{Value, json};

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, JPathError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(JPathError::JPathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(JPathError::JPathParse(input.to_string(), e.to_string())),
    }
}

// --- Operator Levels ---

fn expression(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, and_expr, or_op)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, equality, and_op)
}

fn equality(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, comparison, eq_op)
}

fn comparison(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, additive, cmp_op)
}

fn additive(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, multiplicative, add_op)
}

fn multiplicative(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, unary, mul_op)
}

/// Parses `operand (operator operand)*` and folds it left-associatively.
fn binary_chain<'a>(
    input: &'a str,
    operand: fn(&'a str) -> IResult<&'a str, Expression>,
    operator: fn(&'a str) -> IResult<&'a str, BinaryOp>,
) -> IResult<&'a str, Expression> {
    let (input, first) = operand(input)?;
    let (input, rest) = many0(pair(ws(operator), operand)).parse(input)?;
    let folded = rest.into_iter().fold(first, |left, (op, right)| Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    });
    Ok((input, folded))
}

fn or_op(input: &str) -> IResult<&str, BinaryOp> {
    value(BinaryOp::Or, tag("||")).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOp> {
    value(BinaryOp::And, tag("&&")).parse(input)
}

fn eq_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((value(BinaryOp::Eq, tag("==")), value(BinaryOp::Ne, tag("!=")))).parse(input)
}

fn cmp_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((
        value(BinaryOp::Le, tag("<=")),
        value(BinaryOp::Ge, tag(">=")),
        value(BinaryOp::Lt, char('<')),
        value(BinaryOp::Gt, char('>')),
    ))
    .parse(input)
}

fn add_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((value(BinaryOp::Add, char('+')), value(BinaryOp::Sub, char('-')))).parse(input)
}

fn mul_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((
        value(BinaryOp::Mul, char('*')),
        value(BinaryOp::Div, char('/')),
        value(BinaryOp::Rem, char('%')),
    ))
    .parse(input)
}

fn unary(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        map(preceded(char('!'), unary), |operand| Expression::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }),
        map(preceded(char('-'), unary), |operand| Expression::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        }),
        primary,
    )))
    .parse(input)
}

fn primary(input: &str) -> IResult<&str, Expression> {
    alt((
        delimited(char('('), expression, char(')')),
        map(literal, Expression::Literal),
        function_call, // Must be before selection to parse `func()` not `func`
        map(selection, Expression::Selection),
    ))
    .parse(input)
}

// --- Literal Parsers ---

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A reserved word that is not the prefix of a longer identifier.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(word), not(satisfy(is_ident_char)))
}

fn boolean(input: &str) -> IResult<&str, Value> {
    alt((
        map(keyword("true"), |_| json!(true)),
        map(keyword("false"), |_| json!(false)),
    ))
    .parse(input)
}

fn null(input: &str) -> IResult<&str, Value> {
    map(keyword("null"), |_| json!(null)).parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Value> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))
    .map(|s: &str| json!(s))
    .parse(input)
}

/// Integers stay integers; anything with a fraction becomes a float.
fn number(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(pair(digit1, opt(preceded(char('.'), digit1)))),
        |text: &str| -> Result<Value, std::num::ParseFloatError> {
            match text.parse::<i64>() {
                Ok(i) => Ok(Value::from(i)),
                Err(_) => text.parse::<f64>().map(Value::from),
            }
        },
    )
    .parse(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((null, boolean, number, string_literal)).parse(input)
}

// --- Path/Selection Parser ---

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alt((alpha1, tag("_"))), take_while(is_ident_char))).parse(input)
}

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    let (input, name) = preceded(char('.'), identifier).parse(input)?;
    let (input, call) = opt(pair(char('('), preceded(multispace0, char(')')))).parse(input)?;
    let segment = match call {
        Some(_) => PathSegment::Accessor(name.to_string()),
        None => PathSegment::Key(name.to_string()),
    };
    Ok((input, segment))
}

fn index_segment(input: &str) -> IResult<&str, PathSegment> {
    map(delimited(char('['), nom_u64, char(']')), |i| {
        PathSegment::Index(i as usize)
    })
    .parse(input)
}

fn path_segment(input: &str) -> IResult<&str, PathSegment> {
    alt((key_segment, index_segment)).parse(input)
}

fn full_path(input: &str) -> IResult<&str, Selection> {
    map(
        pair(identifier, many0(path_segment)),
        |(start, mut rest)| {
            let mut segments = vec![PathSegment::Key(start.to_string())];
            segments.append(&mut rest);
            Selection::Path(segments)
        },
    )
    .parse(input)
}

fn selection(input: &str) -> IResult<&str, Selection> {
    alt((
        map(tag("."), |_| Selection::CurrentContext),
        map(preceded(char('$'), identifier), |name| {
            Selection::Variable(name.to_string())
        }),
        full_path,
    ))
    .parse(input)
}

// --- Function Call Parser ---

fn function_call(input: &str) -> IResult<&str, Expression> {
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, args) = delimited(
        char('('),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )
    .parse(input)?;

    Ok((
        input,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(keys: &[&str]) -> Expression {
        Expression::Selection(Selection::Path(
            keys.iter().map(|k| PathSegment::Key(k.to_string())).collect(),
        ))
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expression("a + b * 2").unwrap();
        assert_eq!(
            expr,
            Expression::Binary {
                op: BinaryOp::Add,
                left: Box::new(path(&["a"])),
                right: Box::new(Expression::Binary {
                    op: BinaryOp::Mul,
                    left: Box::new(path(&["b"])),
                    right: Box::new(Expression::Literal(json!(2))),
                }),
            }
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = parse_expression("10 - 3 - 2").unwrap();
        let Expression::Binary { op, left, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(*left, Expression::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn test_keywords_do_not_swallow_identifiers() {
        assert_eq!(parse_expression("nullable").unwrap(), path(&["nullable"]));
        assert_eq!(parse_expression("trueName").unwrap(), path(&["trueName"]));
        assert_eq!(parse_expression("true").unwrap(), Expression::Literal(json!(true)));
    }

    #[test]
    fn test_accessor_segment() {
        assert_eq!(
            parse_expression("record.name()").unwrap(),
            Expression::Selection(Selection::Path(vec![
                PathSegment::Key("record".into()),
                PathSegment::Accessor("name".into()),
            ]))
        );
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(parse_expression("42").unwrap(), Expression::Literal(json!(42)));
        assert_eq!(parse_expression("0.5").unwrap(), Expression::Literal(json!(0.5)));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(parse_expression("''").unwrap(), Expression::Literal(json!("")));
        assert_eq!(parse_expression("\"a b\"").unwrap(), Expression::Literal(json!("a b")));
    }

    #[test]
    fn test_parenthesized_and_unary() {
        assert!(parse_expression("-(a + 1) * 2").is_ok());
        assert!(parse_expression("!(a == b) && c != d").is_ok());
        assert!(parse_expression("a <= b || a >= c").is_ok());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        assert!(matches!(
            parse_expression("a b"),
            Err(JPathError::JPathParse(_, _))
        ));
        assert!(parse_expression("a +").is_err());
    }
}
