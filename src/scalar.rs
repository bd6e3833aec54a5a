//! Classification of bare tokens into scalar values.
//!
//! A bare token (one that did not arrive in quotes) is classified in a fixed
//! order: the single-letter booleans, the null spellings, the number rule,
//! then string. Leading-zero literals such as `007` and ISO-8601-looking
//! tokens keep their lexeme as a string. Quoted tokens never reach this
//! module; after unescaping they are always strings.

use crate::error::{Error, Result};
use crate::quote::is_number_token;
use crate::value::{Number, Value};

/// Classifies a bare token. `line` is used for error positions only.
pub(crate) fn classify_bare(token: &str, line: usize) -> Result<Value> {
    if token == "T" {
        return Ok(Value::Bool(true));
    }
    if token == "F" {
        return Ok(Value::Bool(false));
    }
    if token.eq_ignore_ascii_case("null")
        || token.eq_ignore_ascii_case("none")
        || token.eq_ignore_ascii_case("nil")
    {
        return Ok(Value::Null);
    }
    if is_number_token(token) {
        return parse_number(token, line);
    }
    // Leading-zero literals and ISO-looking tokens keep their lexeme.
    Ok(Value::String(token.to_string()))
}

fn parse_number(token: &str, line: usize) -> Result<Value> {
    let is_integral = !token.contains(['.', 'e', 'E']);
    if is_integral {
        if let Ok(i) = token.parse::<i64>() {
            return Ok(Value::Number(Number::Int(i)));
        }
        // Integer lexemes beyond i64 fall through to binary64, the same
        // way the format's source ecosystem reads all numbers.
    }
    let parsed: f64 = token.parse().map_err(|_| Error::BadNumber {
        line,
        lexeme: token.to_string(),
    })?;
    match Number::from_f64(parsed) {
        Some(n) => Ok(Value::Number(n)),
        None => Err(Error::BadNumber {
            line,
            lexeme: token.to_string(),
        }),
    }
}

/// True when the token would keep its lexeme as a string despite looking
/// numeric; used by tests and kept next to the rule it mirrors.
#[cfg(test)]
pub(crate) fn is_string_number_lexeme(token: &str) -> bool {
    crate::quote::has_leading_zero(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_are_single_letters() {
        assert_eq!(classify_bare("T", 1).unwrap(), Value::Bool(true));
        assert_eq!(classify_bare("F", 1).unwrap(), Value::Bool(false));
        // Spelled-out forms are reserved for quoting but decode as strings.
        assert_eq!(classify_bare("true", 1).unwrap(), Value::from("true"));
        assert_eq!(classify_bare("false", 1).unwrap(), Value::from("false"));
    }

    #[test]
    fn null_spellings_are_case_insensitive() {
        for s in ["null", "NULL", "none", "None", "nil", "NIL"] {
            assert_eq!(classify_bare(s, 1).unwrap(), Value::Null, "{s}");
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(classify_bare("0", 1).unwrap(), Value::from(0));
        assert_eq!(classify_bare("-17", 1).unwrap(), Value::from(-17));
        assert_eq!(classify_bare("3.14", 1).unwrap(), Value::Number(Number::Float(3.14)));
        // Exponent form is accepted on input and folds to an integer.
        assert_eq!(classify_bare("1e6", 1).unwrap(), Value::from(1_000_000));
        assert_eq!(
            classify_bare("2.5e-1", 1).unwrap(),
            Value::Number(Number::Float(0.25))
        );
    }

    #[test]
    fn leading_zero_literals_stay_strings() {
        assert!(is_string_number_lexeme("00501"));
        assert_eq!(classify_bare("00501", 1).unwrap(), Value::from("00501"));
        assert_eq!(classify_bare("007", 1).unwrap(), Value::from("007"));
    }

    #[test]
    fn iso_tokens_stay_strings() {
        assert_eq!(
            classify_bare("2025-06-01", 1).unwrap(),
            Value::from("2025-06-01")
        );
        assert_eq!(classify_bare("10:30:00", 1).unwrap(), Value::from("10:30:00"));
    }

    #[test]
    fn oversized_integers_widen_to_float() {
        let v = classify_bare("99999999999999999999", 1).unwrap();
        assert_eq!(v, Value::Number(Number::Float(1e20)));
    }

    #[test]
    fn overflowing_exponents_fail() {
        let err = classify_bare("1e999", 1).unwrap_err();
        assert_eq!(err.code(), "DecodeBadNumber");
    }
}
