//! Textual number codec used by every XML member.
//!
//! Boxes and boundaries are written with a fixed precision of three decimal
//! digits. Other scalars (sizes, path coordinates, matrix entries) use the
//! shortest representation that parses back to the same `f64`.

use std::fmt::Write as FmtWrite;

/// Append `value` with exactly three decimal digits.
pub fn write_fixed(out: &mut String, value: f64) {
    let value = if value == 0.0 { 0.0 } else { value };
    let _ = write!(out, "{:.3}", value);
    if out.ends_with("-0.000") {
        let len = out.len();
        out.replace_range(len - 6..len, "0.000");
    }
}

/// Append the shortest round-trip representation of `value`.
///
/// Integral values are written without a fractional part and exponent
/// notation is never produced.
pub fn write_number(out: &mut String, value: f64) {
    if !value.is_finite() {
        out.push('0');
        return;
    }
    if value == value.trunc() && value.abs() < 1e15 {
        let mut buf = itoa::Buffer::new();
        out.push_str(buf.format(value as i64));
        return;
    }
    let mut buf = ryu::Buffer::new();
    let formatted = buf.format_finite(value);
    if formatted.contains('e') {
        let start = out.len();
        let _ = write!(out, "{:.9}", value);
        trim_fraction(out, start);
    } else {
        out.push_str(formatted);
    }
}

/// Shortest round-trip representation of `value` as an owned string.
pub fn format_number(value: f64) -> String {
    let mut out = String::new();
    write_number(&mut out, value);
    out
}

/// Append a space-separated list of numbers.
pub fn write_number_list(out: &mut String, values: &[f64]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_number(out, *value);
    }
}

fn trim_fraction(out: &mut String, start: usize) {
    if !out[start..].contains('.') {
        return;
    }
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
}

/// Parse a single floating-point token.
#[inline]
pub fn parse_f64(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    fast_float2::parse::<f64, _>(token)
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a whitespace-separated list of numbers. Returns `None` on the first
/// token that is not a number.
pub fn parse_number_list(text: &str) -> Option<Vec<f64>> {
    text.split_ascii_whitespace().map(parse_f64).collect()
}

/// Parse a list that may use the `g <count> <value>` repetition shorthand
/// (TextCode DeltaX/DeltaY).
pub fn parse_delta_list(text: &str) -> Option<Vec<f64>> {
    let mut values = Vec::new();
    let mut tokens = text.split_ascii_whitespace();
    while let Some(token) = tokens.next() {
        if token == "g" {
            let count = tokens.next()?.parse::<usize>().ok()?;
            let value = parse_f64(tokens.next()?)?;
            values.extend(std::iter::repeat_n(value, count));
        } else {
            values.push(parse_f64(token)?);
        }
    }
    Some(values)
}

/// Write a delta list, compressing runs of three or more equal values with
/// the `g` shorthand.
pub fn write_delta_list(out: &mut String, values: &[f64]) {
    let mut i = 0;
    let mut first = true;
    while i < values.len() {
        let value = values[i];
        let mut run = 1;
        while i + run < values.len() && values[i + run] == value {
            run += 1;
        }
        if !first {
            out.push(' ');
        }
        first = false;
        if run >= 3 {
            out.push_str("g ");
            let mut buf = itoa::Buffer::new();
            out.push_str(buf.format(run));
            out.push(' ');
            write_number(out, value);
            i += run;
        } else {
            write_number(out, value);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_precision() {
        let mut s = String::new();
        write_fixed(&mut s, 210.0);
        s.push(' ');
        write_fixed(&mut s, 0.35277);
        s.push(' ');
        write_fixed(&mut s, -0.0001);
        assert_eq!(s, "210.000 0.353 0.000");
    }

    #[test]
    fn test_shortest_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.353), "0.353");
        assert_eq!(format_number(1.0e-7), "0.0000001");
        assert_eq!(parse_f64(&format_number(0.1 + 0.2)), Some(0.1 + 0.2));
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(parse_number_list("1 2.5  -3"), Some(vec![1.0, 2.5, -3.0]));
        assert_eq!(parse_number_list("1 x"), None);
        assert_eq!(parse_f64("nan"), None);
    }

    #[test]
    fn test_delta_shorthand() {
        assert_eq!(
            parse_delta_list("g 3 1.5 2"),
            Some(vec![1.5, 1.5, 1.5, 2.0])
        );
        assert_eq!(parse_delta_list("g x 1"), None);

        let mut s = String::new();
        write_delta_list(&mut s, &[1.5, 1.5, 1.5, 2.0, 2.0]);
        assert_eq!(s, "g 3 1.5 2 2");
    }
}
