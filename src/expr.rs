//! Arithmetic behind `amtexpr:` amounts.
//!
//! Supports `+ - * /`, parentheses, unary signs and decimal literals. The
//! result is clamped at zero and floored to a whole amount.

use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::fold_many0,
    sequence::{delimited, pair, preceded},
};

use crate::error::EvalError;

/// Upper bound on parenthesis and unary-sign nesting.
pub const MAX_NESTING: usize = 128;

fn number(input: &str) -> IResult<&str, f64> {
    map_res(recognize((digit1, opt((char('.'), digit1)))), |s: &str| {
        s.parse::<f64>()
    })
    .parse(input)
}

fn factor(input: &str) -> IResult<&str, f64> {
    alt((
        delimited(char('('), sum, char(')')),
        map(preceded(char('-'), factor), |v| -v),
        preceded(char('+'), factor),
        number,
    ))
    .parse(input)
}

fn product(input: &str) -> IResult<&str, f64> {
    let (input, first) = factor(input)?;
    fold_many0(
        pair(one_of("*/"), factor),
        move || first,
        |acc, (op, rhs)| if op == '*' { acc * rhs } else { acc / rhs },
    )
    .parse(input)
}

fn sum(input: &str) -> IResult<&str, f64> {
    let (input, first) = product(input)?;
    fold_many0(
        pair(one_of("+-"), product),
        move || first,
        |acc, (op, rhs)| if op == '+' { acc + rhs } else { acc - rhs },
    )
    .parse(input)
}

/// Deepest recursion the parser would reach: open parentheses plus the run
/// of unary signs in front of each factor.
fn nesting(expr: &str) -> usize {
    let mut open: Vec<usize> = Vec::new();
    let mut depth = 0;
    let mut signs = 0;
    let mut deepest = 0;
    let mut prev = None;
    for c in expr.chars() {
        match c {
            '+' | '-' if matches!(prev, None | Some('(' | '+' | '-' | '*' | '/')) => signs += 1,
            '(' => {
                depth += signs + 1;
                open.push(signs);
                signs = 0;
            }
            ')' => {
                if let Some(run) = open.pop() {
                    depth -= run + 1;
                }
                signs = 0;
            }
            _ => signs = 0,
        }
        deepest = deepest.max(depth + signs);
        prev = Some(c);
    }
    deepest
}

/// Evaluates an arithmetic expression to a non-negative whole amount.
pub fn evaluate(text: &str) -> Result<u32, EvalError> {
    let expr: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if expr.is_empty() {
        return Err(EvalError::Empty);
    }
    if nesting(&expr) > MAX_NESTING {
        return Err(EvalError::TooDeep(MAX_NESTING));
    }

    let value = match sum(&expr) {
        Ok(("", value)) => value,
        Ok((rest, _)) => return Err(EvalError::Trailing(rest.to_string())),
        Err(e) => return Err(EvalError::Syntax(e.to_string())),
    };

    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    // `as` saturates, so huge results pin to u32::MAX
    Ok(value.max(0.0).floor() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_subtraction() {
        assert_eq!(evaluate("64-10").unwrap(), 54);
    }

    #[test]
    fn evaluate_precedence_and_parens() {
        assert_eq!(evaluate("2*(3+4)").unwrap(), 14);
        assert_eq!(evaluate("2*3+4").unwrap(), 10);
        assert_eq!(evaluate("10-2-3").unwrap(), 5);
        assert_eq!(evaluate("64/2/2").unwrap(), 16);
    }

    #[test]
    fn evaluate_whitespace_and_decimals() {
        assert_eq!(evaluate(" 7 / 2 ").unwrap(), 3);
        assert_eq!(evaluate("1.5*3").unwrap(), 4);
    }

    #[test]
    fn evaluate_unary_signs() {
        assert_eq!(evaluate("-(-5)").unwrap(), 5);
        assert_eq!(evaluate("+3").unwrap(), 3);
    }

    #[test]
    fn negative_clamps_to_zero() {
        assert_eq!(evaluate("3-10").unwrap(), 0);
    }

    #[test]
    fn division_by_zero_is_invalid() {
        assert_eq!(evaluate("5/0"), Err(EvalError::NonFinite));
        assert_eq!(evaluate("0/0"), Err(EvalError::NonFinite));
    }

    #[test]
    fn malformed_input_is_invalid() {
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert!(matches!(evaluate("2+"), Err(EvalError::Trailing(_))));
        assert!(matches!(evaluate("abc"), Err(EvalError::Syntax(_))));
        assert!(matches!(evaluate("(1+2"), Err(EvalError::Syntax(_))));
        assert!(matches!(evaluate("%player_level%"), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        assert_eq!(evaluate(&deep), Err(EvalError::TooDeep(MAX_NESTING)));
        assert_eq!(
            evaluate(&format!("{}1", "-".repeat(500))),
            Err(EvalError::TooDeep(MAX_NESTING))
        );
        let mixed = format!("{}1{}", "-(".repeat(70), ")".repeat(70));
        assert_eq!(evaluate(&mixed), Err(EvalError::TooDeep(MAX_NESTING)));
    }

    #[test]
    fn wide_shallow_expressions_evaluate() {
        assert_eq!(evaluate(&vec!["(1)"; 130].join("+")).unwrap(), 130);
        let signs = format!("200+{}", vec!["1*-1"; 130].join("+"));
        assert_eq!(evaluate(&signs).unwrap(), 70);
        let nested = format!("{}1{}", "(".repeat(60), ")".repeat(60));
        assert_eq!(evaluate(&nested).unwrap(), 1);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(evaluate("99999999999*99999999999").unwrap(), u32::MAX);
    }
}
