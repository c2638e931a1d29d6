//! Boolean and string coercions
//!
//! ECMAScript ToBoolean and ToString, plus the ByteString check.

use webidl_coerce_core::{IdlError, IdlResult, Value};

/// ECMAScript ToBoolean
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::Str(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) | Value::Callable(_) => true,
    }
}

/// ECMAScript ToString
pub fn to_dom_string(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::Str(s) => s.clone(),
        Value::Array(elements) => elements
            .iter()
            .map(|e| {
                if e.is_nullish() {
                    String::new()
                } else {
                    to_dom_string(e)
                }
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Callable(name) => format!("function {}() {{ [native code] }}", name),
    }
}

/// String coercion restricted to characters U+0000..=U+00FF
pub fn to_byte_string(value: &Value) -> IdlResult<String> {
    let s = to_dom_string(value);
    if let Some(c) = s.chars().find(|c| u32::from(*c) > 0xFF) {
        return Err(IdlError::conversion_error(format!(
            "cannot convert string containing U+{:04X} to ByteString",
            u32::from(c)
        )));
    }
    Ok(s)
}

/// ECMAScript Number::toString
///
/// Shortest round-trip digits, positional between 1e-7 and 1e21 and in
/// exponent form outside.
pub fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x < 0.0 {
        return format!("-{}", number_to_string(-x));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e-7".
    let sci = format!("{:e}", x);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return sci;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k).unsigned_abs() as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n.unsigned_abs() as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat(n.unsigned_abs() as usize), digits)
    } else {
        let e = n - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, e.unsigned_abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, e.unsigned_abs())
        }
    }
}
