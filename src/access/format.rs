//! printf-style numeric formatting
//!
//! Numeric values are written through C-style format strings such as
//! `%g`, `%.6f` or `%5d`. Supported: flags `-+ 0#`, width, precision,
//! length modifiers (ignored) and the conversions `d i u x X o f F e E g G s`,
//! with literal text around a single conversion and `%%` escapes.

use crate::error::{Error, Result};

/// Widest field a conversion may request
pub const MAX_WIDTH: usize = 1024;

/// Argument for a single conversion
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Int(i64),
    Real(f64),
    Text(&'a str),
}

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
}

#[derive(Debug, Clone, Copy)]
struct Conversion {
    flags: Flags,
    width: usize,
    precision: Option<usize>,
    kind: char,
}

/// Render `arg` through `format`
pub fn render(format: &str, arg: Arg<'_>) -> Result<String> {
    let invalid = |reason: &str| Error::Failed(format!("invalid format `{format}`: {reason}"));

    let mut out = String::with_capacity(format.len() + 16);
    let mut chars = format.chars().peekable();
    let mut converted = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        if converted {
            return Err(invalid("more than one conversion"));
        }

        let mut flags = Flags::default();
        while let Some(&f) = chars.peek() {
            match f {
                '-' => flags.left = true,
                '+' => flags.plus = true,
                ' ' => flags.space = true,
                '0' => flags.zero = true,
                '#' => flags.alternate = true,
                _ => break,
            }
            chars.next();
        }

        let mut width = 0usize;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = width.saturating_mul(10).saturating_add(d as usize);
            chars.next();
        }
        if width > MAX_WIDTH {
            return Err(invalid("field width too large"));
        }

        let mut precision = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut p = 0usize;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                p = p.saturating_mul(10).saturating_add(d as usize);
                chars.next();
            }
            precision = Some(p.min(64));
        }

        while matches!(chars.peek(), Some('l' | 'h' | 'L' | 'q' | 'j' | 'z' | 't')) {
            chars.next();
        }

        let kind = chars.next().ok_or_else(|| invalid("missing conversion"))?;
        let conversion = Conversion {
            flags,
            width,
            precision,
            kind,
        };
        let body = convert(&conversion, arg).ok_or_else(|| invalid("unsupported conversion"))?;
        out.push_str(&body);
        converted = true;
    }

    if !converted {
        return Err(invalid("no conversion"));
    }
    Ok(out)
}

fn convert(conv: &Conversion, arg: Arg<'_>) -> Option<String> {
    match conv.kind {
        'd' | 'i' | 'u' => Some(integer(conv, as_int(arg), 10, false)),
        'x' => Some(integer(conv, as_int(arg), 16, false)),
        'X' => Some(integer(conv, as_int(arg), 16, true)),
        'o' => Some(integer(conv, as_int(arg), 8, false)),
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => Some(real(conv, as_real(arg))),
        's' => {
            let text = match arg {
                Arg::Text(t) => t.to_string(),
                Arg::Int(i) => i.to_string(),
                Arg::Real(r) => shortest(r),
            };
            let text = match conv.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text,
            };
            Some(pad(conv, String::new(), text, false))
        }
        _ => None,
    }
}

fn as_int(arg: Arg<'_>) -> i64 {
    match arg {
        Arg::Int(i) => i,
        Arg::Real(r) => r.trunc() as i64,
        Arg::Text(t) => t.trim().parse().unwrap_or(0),
    }
}

fn as_real(arg: Arg<'_>) -> f64 {
    match arg {
        Arg::Int(i) => i as f64,
        Arg::Real(r) => r,
        Arg::Text(t) => t.trim().parse().unwrap_or(0.0),
    }
}

fn sign(flags: &Flags, negative: bool) -> String {
    if negative {
        "-".to_string()
    } else if flags.plus {
        "+".to_string()
    } else if flags.space {
        " ".to_string()
    } else {
        String::new()
    }
}

/// Apply width: zero padding goes between sign and digits
fn pad(conv: &Conversion, sign: String, digits: String, numeric: bool) -> String {
    let len = sign.chars().count() + digits.chars().count();
    if len >= conv.width {
        return sign + &digits;
    }
    let fill = conv.width - len;
    if conv.flags.left {
        format!("{sign}{digits}{}", " ".repeat(fill))
    } else if conv.flags.zero && numeric {
        format!("{sign}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{sign}{digits}", " ".repeat(fill))
    }
}

fn integer(conv: &Conversion, value: i64, radix: u32, upper: bool) -> String {
    let magnitude = value.unsigned_abs();
    let mut digits = match radix {
        16 if upper => format!("{magnitude:X}"),
        16 => format!("{magnitude:x}"),
        8 => format!("{magnitude:o}"),
        _ => magnitude.to_string(),
    };
    if let Some(p) = conv.precision {
        if p == 0 && magnitude == 0 {
            digits.clear();
        } else if digits.len() < p {
            digits = "0".repeat(p - digits.len()) + &digits;
        }
    }
    if conv.flags.alternate && magnitude != 0 {
        match radix {
            16 if upper => digits.insert_str(0, "0X"),
            16 => digits.insert_str(0, "0x"),
            8 => digits.insert(0, '0'),
            _ => {}
        }
    }
    let sign = if radix == 10 {
        sign(&conv.flags, value < 0)
    } else {
        String::new()
    };
    let zero_ok = conv.precision.is_none();
    pad(conv, sign, digits, zero_ok)
}

fn real(conv: &Conversion, value: f64) -> String {
    let upper = conv.kind.is_ascii_uppercase();
    let negative = value.is_sign_negative() && !value.is_nan();
    let sign = sign(&conv.flags, negative);
    let magnitude = value.abs();

    if !magnitude.is_finite() {
        let text = if magnitude.is_nan() { "nan" } else { "inf" };
        let text = if upper { text.to_uppercase() } else { text.to_string() };
        return pad(conv, sign, text, false);
    }

    let precision = conv.precision.unwrap_or(6);
    let digits = match conv.kind.to_ascii_lowercase() {
        'f' => {
            let mut s = format!("{magnitude:.precision$}");
            if conv.flags.alternate && precision == 0 {
                s.push('.');
            }
            s
        }
        'e' => exponential(magnitude, precision, upper, conv.flags.alternate),
        _ => general(magnitude, precision, upper, conv.flags.alternate),
    };
    pad(conv, sign, digits, true)
}

/// C-style `%e`: mantissa, `e`, sign and at least two exponent digits
fn exponential(magnitude: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let rust = format!("{magnitude:.precision$e}");
    let (mantissa, exponent) = rust.split_once('e').unwrap_or((rust.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let mut mantissa = mantissa.to_string();
    if alternate && precision == 0 {
        mantissa.push('.');
    }
    let e = if upper { 'E' } else { 'e' };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{exp_sign}{:02}", exponent.unsigned_abs())
}

/// Decimal exponent after rounding to `significant` digits
fn decimal_exponent(magnitude: f64, significant: usize) -> i32 {
    if magnitude == 0.0 {
        return 0;
    }
    let precision = significant.saturating_sub(1);
    let rust = format!("{magnitude:.precision$e}");
    rust.split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0)
}

/// C-style `%g`
fn general(magnitude: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let significant = precision.max(1);
    let exponent = decimal_exponent(magnitude, significant);

    let mut text = if exponent < -4 || exponent >= significant as i32 {
        exponential(magnitude, significant - 1, upper, alternate)
    } else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        format!("{magnitude:.decimals$}")
    };

    if !alternate {
        text = strip_trailing_zeros(&text);
    }
    text
}

fn strip_trailing_zeros(text: &str) -> String {
    let (mantissa, suffix) = match text.find(['e', 'E']) {
        Some(i) => text.split_at(i),
        None => (text, ""),
    };
    if !mantissa.contains('.') {
        return text.to_string();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{suffix}")
}

/// Shortest decimal text that parses back to exactly `value`.
///
/// Very large and very small magnitudes switch to exponent notation.
pub fn shortest(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude.is_finite() && magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn real_fmt(format: &str, value: f64) -> String {
        render(format, Arg::Real(value)).unwrap()
    }

    fn int_fmt(format: &str, value: i64) -> String {
        render(format, Arg::Int(value)).unwrap()
    }

    #[test]
    fn test_general() {
        assert_eq!(real_fmt("%g", 0.0001), "0.0001");
        assert_eq!(real_fmt("%g", 0.00001), "1e-05");
        assert_eq!(real_fmt("%g", 123456789.0), "1.23457e+08");
        assert_eq!(real_fmt("%g", 100000.0), "100000");
        assert_eq!(real_fmt("%g", 1000000.0), "1e+06");
        assert_eq!(real_fmt("%g", 0.5), "0.5");
        assert_eq!(real_fmt("%g", 0.0), "0");
        assert_eq!(real_fmt("%g", -2.5), "-2.5");
        assert_eq!(real_fmt("%g", 999999.5), "1e+06");
        assert_eq!(real_fmt("%.3g", 3.14159), "3.14");
        assert_eq!(real_fmt("%G", 1.5e-10), "1.5E-10");
        assert_eq!(real_fmt("%#g", 1.0), "1.00000");
    }

    #[test]
    fn test_fixed_and_exponent() {
        assert_eq!(real_fmt("%.3f", 3.14159), "3.142");
        assert_eq!(real_fmt("%f", 1.0), "1.000000");
        assert_eq!(real_fmt("%8.2f", -1.5), "   -1.50");
        assert_eq!(real_fmt("%08.2f", -1.5), "-0001.50");
        assert_eq!(real_fmt("%e", 12345.678), "1.234568e+04");
        assert_eq!(real_fmt("%.2E", 0.000123), "1.23E-04");
    }

    #[test]
    fn test_integers() {
        assert_eq!(int_fmt("%d", 42), "42");
        assert_eq!(int_fmt("%5d", 42), "   42");
        assert_eq!(int_fmt("%-5d|", 42), "42   |");
        assert_eq!(int_fmt("%05d", -42), "-0042");
        assert_eq!(int_fmt("%+d", 5), "+5");
        assert_eq!(int_fmt("%.3d", 7), "007");
        assert_eq!(int_fmt("%x", 255), "ff");
        assert_eq!(int_fmt("%#X", 255), "0XFF");
        assert_eq!(int_fmt("%o", 8), "10");
        assert_eq!(int_fmt("%ld", 9), "9");
    }

    #[test]
    fn test_literal_text_and_percent() {
        assert_eq!(real_fmt("%g m", 1.5), "1.5 m");
        assert_eq!(int_fmt("%d%%", 50), "50%");
        assert_eq!(render("[%5s]", Arg::Text("ab")).unwrap(), "[   ab]");
    }

    #[test]
    fn test_width_limit() {
        let widest = format!("%{MAX_WIDTH}d");
        assert_eq!(int_fmt(&widest, 7).len(), MAX_WIDTH);
        assert!(matches!(
            render("%99999999999999999999999d", Arg::Int(1)),
            Err(Error::Failed(_))
        ));
        assert!(matches!(render("%1025.2f", Arg::Real(1.0)), Err(Error::Failed(_))));
    }

    #[test]
    fn test_special_values() {
        assert_eq!(real_fmt("%g", f64::INFINITY), "inf");
        assert_eq!(real_fmt("%G", f64::NEG_INFINITY), "-INF");
        assert_eq!(real_fmt("%f", f64::NAN), "nan");
    }

    #[test]
    fn test_shortest() {
        assert_eq!(shortest(0.1), "0.1");
        assert_eq!(shortest(2.0), "2");
        assert_eq!(shortest(-0.0), "-0");
        assert_eq!(shortest(1e300), "1e300");
        assert_eq!(shortest(1.5e-7), "1.5e-7");
        assert_eq!(shortest(12345.5), "12345.5");
    }

    #[test]
    fn test_invalid_formats() {
        assert!(render("plain", Arg::Int(1)).is_err());
        assert!(render("%d %d", Arg::Int(1)).is_err());
        assert!(render("%", Arg::Int(1)).is_err());
        assert!(render("%k", Arg::Int(1)).is_err());
    }

    proptest! {
        #[test]
        fn prop_shortest_round_trips(value in proptest::num::f64::NORMAL | proptest::num::f64::SUBNORMAL | proptest::num::f64::ZERO) {
            let text = shortest(value);
            prop_assert_eq!(text.parse::<f64>().unwrap(), value);
        }

        #[test]
        fn prop_integer_round_trips(value in any::<i64>()) {
            prop_assert_eq!(int_fmt("%d", value).parse::<i64>().unwrap(), value);
        }

        #[test]
        fn prop_general_within_precision(value in -1.0e12f64..1.0e12f64) {
            let parsed: f64 = real_fmt("%.15g", value).parse().unwrap();
            prop_assert!((parsed - value).abs() <= value.abs() * 1e-14);
        }
    }
}
