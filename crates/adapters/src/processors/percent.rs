//! printf-style `%` interpolation for positional log arguments.
//!
//! Supported conversions: `s r d i u f F e E g G x X o c %`, flags `-+ 0#`,
//! width and precision (including `*`), length modifiers `h l L` (ignored),
//! and `%(name)s` lookups when the single argument is a map.

use cwlog_domain::{FieldMap, FieldValue};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

const DEFAULT_FLOAT_PRECISION: usize = 6;
/// Largest width or precision accepted; `%g` adds a few digits on top and
/// the result must stay within the formatter's `u16` precision range.
pub const MAX_COUNT: usize = 10_000;

/// Why a template and its arguments did not fit together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PercentError {
    /// More specifiers than arguments.
    NotEnoughArguments,
    /// Arguments left over after the last specifier.
    NotAllConverted,
    /// `%(name)` lookup against a map without that key.
    MissingKey(String),
    /// `%(name)` used without a map argument, or a map mixed with `*`.
    MappingRequired,
    /// Unknown conversion character.
    UnsupportedConversion(char),
    /// Template ends inside a specifier.
    Incomplete,
    /// Width or precision above [`MAX_COUNT`].
    CountTooLarge,
    /// Argument kind does not fit the conversion.
    TypeMismatch {
        /// Conversion character.
        conversion: char,
        /// Kind of the offending argument.
        kind: &'static str,
    },
}

impl fmt::Display for PercentError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEnoughArguments => formatter.write_str("not enough arguments for format string"),
            Self::NotAllConverted => {
                formatter.write_str("not all arguments converted during string formatting")
            },
            Self::MissingKey(key) => write!(formatter, "format key {key:?} not found"),
            Self::MappingRequired => formatter.write_str("format requires a mapping"),
            Self::UnsupportedConversion(ch) => {
                write!(formatter, "unsupported format character {ch:?}")
            },
            Self::Incomplete => formatter.write_str("incomplete format"),
            Self::CountTooLarge => write!(formatter, "width or precision above {MAX_COUNT}"),
            Self::TypeMismatch { conversion, kind } => {
                write!(formatter, "%{conversion} format does not accept {kind}")
            },
        }
    }
}

impl std::error::Error for PercentError {}

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
}

#[derive(Debug, Clone, Copy)]
enum Count {
    Fixed(usize),
    Star,
}

#[derive(Debug)]
struct Spec {
    key: Option<String>,
    flags: Flags,
    width: Option<Count>,
    precision: Option<Count>,
    conversion: char,
}

/// Interpolate `args` into `template`.
///
/// A single non-empty map argument switches to keyed lookups when the
/// template contains `%(`; otherwise arguments are consumed in order and
/// every one of them must be used.
pub fn format_percent(template: &str, args: &[FieldValue]) -> Result<String, PercentError> {
    let mapping = match args {
        [FieldValue::Map(map)] if !map.is_empty() && template.contains("%(") => Some(map),
        _ => None,
    };
    let mut positional = args.iter();
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let spec = parse_spec(&mut chars)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }

        let mut flags = spec.flags;
        let width = match spec.width {
            None => 0,
            Some(Count::Fixed(width)) => bounded(width)?,
            Some(Count::Star) => {
                if mapping.is_some() {
                    return Err(PercentError::MappingRequired);
                }
                let requested = star_argument(positional.next())?;
                if requested < 0 {
                    flags.left = true;
                }
                bounded(usize::try_from(requested.unsigned_abs()).unwrap_or(usize::MAX))?
            },
        };
        let precision = match spec.precision {
            None => None,
            Some(Count::Fixed(precision)) => Some(bounded(precision)?),
            Some(Count::Star) => {
                if mapping.is_some() {
                    return Err(PercentError::MappingRequired);
                }
                let requested = star_argument(positional.next())?;
                Some(bounded(usize::try_from(requested.max(0)).unwrap_or(usize::MAX))?)
            },
        };

        let value = match (spec.key.as_deref(), mapping) {
            (Some(key), Some(map)) => lookup(map, key)?,
            (Some(_), None) => return Err(PercentError::MappingRequired),
            (None, Some(_)) => return Err(PercentError::NotEnoughArguments),
            (None, None) => positional.next().ok_or(PercentError::NotEnoughArguments)?,
        };

        let piece = convert(spec.conversion, flags, precision, value)?;
        out.push_str(&piece.pad(width, flags));
    }

    if mapping.is_none() && positional.next().is_some() {
        return Err(PercentError::NotAllConverted);
    }
    Ok(out)
}

const fn bounded(count: usize) -> Result<usize, PercentError> {
    if count > MAX_COUNT {
        Err(PercentError::CountTooLarge)
    } else {
        Ok(count)
    }
}

fn lookup<'a>(map: &'a FieldMap, key: &str) -> Result<&'a FieldValue, PercentError> {
    map.get(key)
        .ok_or_else(|| PercentError::MissingKey(key.to_string()))
}

fn star_argument(value: Option<&FieldValue>) -> Result<i64, PercentError> {
    match value {
        None => Err(PercentError::NotEnoughArguments),
        Some(FieldValue::Int(value)) => Ok(*value),
        Some(FieldValue::UInt(value)) => Ok(i64::try_from(*value).unwrap_or(i64::MAX)),
        Some(other) => Err(PercentError::TypeMismatch {
            conversion: '*',
            kind: other.kind(),
        }),
    }
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Result<Spec, PercentError> {
    let mut key = None;
    if chars.peek() == Some(&'(') {
        chars.next();
        let mut depth = 1_usize;
        let mut name = String::new();
        loop {
            match chars.next() {
                None => return Err(PercentError::Incomplete),
                Some('(') => {
                    depth += 1;
                    name.push('(');
                },
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    name.push(')');
                },
                Some(other) => name.push(other),
            }
        }
        key = Some(name);
    }

    let mut flags = Flags::default();
    while let Some(&ch) = chars.peek() {
        match ch {
            '-' => flags.left = true,
            '+' => flags.plus = true,
            ' ' => flags.space = true,
            '0' => flags.zero = true,
            '#' => flags.alternate = true,
            _ => break,
        }
        chars.next();
    }

    let width = parse_count(chars);
    let precision = if chars.peek() == Some(&'.') {
        chars.next();
        Some(parse_count(chars).unwrap_or(Count::Fixed(0)))
    } else {
        None
    };
    while matches!(chars.peek(), Some('h' | 'l' | 'L')) {
        chars.next();
    }
    let conversion = chars.next().ok_or(PercentError::Incomplete)?;

    Ok(Spec {
        key,
        flags,
        width,
        precision,
        conversion,
    })
}

fn parse_count(chars: &mut Peekable<Chars<'_>>) -> Option<Count> {
    if chars.peek() == Some(&'*') {
        chars.next();
        return Some(Count::Star);
    }
    let mut digits: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(10)) {
        chars.next();
        digits = Some(
            digits
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    digits.map(Count::Fixed)
}

/// Converted text split so padding can go between sign and digits.
struct Piece {
    sign: &'static str,
    prefix: &'static str,
    body: String,
    numeric: bool,
}

impl Piece {
    const fn text(body: String) -> Self {
        Self {
            sign: "",
            prefix: "",
            body,
            numeric: false,
        }
    }

    fn pad(self, width: usize, flags: Flags) -> String {
        let len = self.sign.len() + self.prefix.len() + self.body.chars().count();
        let fill = width.saturating_sub(len);
        let mut out = String::with_capacity(len + fill);
        if fill == 0 {
            out.push_str(self.sign);
            out.push_str(self.prefix);
            out.push_str(&self.body);
        } else if flags.left {
            out.push_str(self.sign);
            out.push_str(self.prefix);
            out.push_str(&self.body);
            out.extend(std::iter::repeat_n(' ', fill));
        } else if flags.zero && self.numeric {
            out.push_str(self.sign);
            out.push_str(self.prefix);
            out.extend(std::iter::repeat_n('0', fill));
            out.push_str(&self.body);
        } else {
            out.extend(std::iter::repeat_n(' ', fill));
            out.push_str(self.sign);
            out.push_str(self.prefix);
            out.push_str(&self.body);
        }
        out
    }
}

fn convert(
    conversion: char,
    flags: Flags,
    precision: Option<usize>,
    value: &FieldValue,
) -> Result<Piece, PercentError> {
    let mismatch = || PercentError::TypeMismatch {
        conversion,
        kind: value.kind(),
    };
    match conversion {
        's' => Ok(Piece::text(truncate(value.to_string(), precision))),
        'r' => Ok(Piece::text(truncate(value.repr(), precision))),
        'c' => as_char(value).map(|ch| Piece::text(ch.to_string())).ok_or_else(mismatch),
        'd' | 'i' | 'u' | 'x' | 'X' | 'o' => {
            let number = as_integer(value).ok_or_else(mismatch)?;
            let magnitude = number.unsigned_abs();
            let mut body = match conversion {
                'x' => format!("{magnitude:x}"),
                'X' => format!("{magnitude:X}"),
                'o' => format!("{magnitude:o}"),
                _ => magnitude.to_string(),
            };
            if let Some(precision) = precision {
                if body.len() < precision {
                    body.insert_str(0, &"0".repeat(precision - body.len()));
                }
            }
            let prefix = match (conversion, flags.alternate) {
                ('x', true) => "0x",
                ('X', true) => "0X",
                ('o', true) => "0o",
                _ => "",
            };
            Ok(Piece {
                sign: sign(number < 0, flags),
                prefix,
                body,
                numeric: true,
            })
        },
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let number = as_float(value).ok_or_else(mismatch)?;
            let upper = conversion.is_ascii_uppercase();
            let magnitude = number.abs();
            let body = if number.is_nan() {
                "nan".to_string()
            } else if number.is_infinite() {
                "inf".to_string()
            } else {
                let precision = precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                match conversion.to_ascii_lowercase() {
                    'f' => fixed(magnitude, precision, flags.alternate),
                    'e' => exponent(magnitude, precision, flags.alternate),
                    _ => general(magnitude, precision, flags.alternate),
                }
            };
            Ok(Piece {
                sign: sign(number.is_sign_negative() && !number.is_nan(), flags),
                prefix: "",
                body: if upper { body.to_ascii_uppercase() } else { body },
                numeric: true,
            })
        },
        other => Err(PercentError::UnsupportedConversion(other)),
    }
}

const fn sign(negative: bool, flags: Flags) -> &'static str {
    if negative {
        "-"
    } else if flags.plus {
        "+"
    } else if flags.space {
        " "
    } else {
        ""
    }
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(precision) if text.chars().count() > precision => text.chars().take(precision).collect(),
        _ => text,
    }
}

fn as_char(value: &FieldValue) -> Option<char> {
    match value {
        FieldValue::Int(code) => u32::try_from(*code).ok().and_then(char::from_u32),
        FieldValue::UInt(code) => u32::try_from(*code).ok().and_then(char::from_u32),
        FieldValue::Text(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(ch),
                _ => None,
            }
        },
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, reason = "finite floats are truncated toward zero like C printf")]
fn as_integer(value: &FieldValue) -> Option<i128> {
    match value {
        FieldValue::Int(value) => Some(i128::from(*value)),
        FieldValue::UInt(value) => Some(i128::from(*value)),
        FieldValue::Bool(value) => Some(i128::from(*value)),
        FieldValue::Float(value) if value.is_finite() => Some(value.trunc() as i128),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss, reason = "printf float conversions accept integers")]
fn as_float(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Float(value) => Some(*value),
        FieldValue::Int(value) => Some(*value as f64),
        FieldValue::UInt(value) => Some(*value as f64),
        FieldValue::Bool(value) => Some(f64::from(u8::from(*value))),
        _ => None,
    }
}

fn fixed(magnitude: f64, precision: usize, alternate: bool) -> String {
    let mut out = format!("{magnitude:.precision$}");
    if alternate && precision == 0 {
        out.push('.');
    }
    out
}

/// `d.ddde+XX` with at least two exponent digits.
fn exponent(magnitude: f64, precision: usize, alternate: bool) -> String {
    let raw = format!("{magnitude:.precision$e}");
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let mut out = mantissa.to_string();
    if alternate && precision == 0 {
        out.push('.');
    }
    out.push('e');
    out.push(if exp < 0 { '-' } else { '+' });
    out.push_str(&format!("{:02}", exp.unsigned_abs()));
    out
}

fn general(magnitude: f64, precision: usize, alternate: bool) -> String {
    let significant = precision.max(1);
    let exp = if magnitude == 0.0 {
        0
    } else {
        let raw = format!("{magnitude:.*e}", significant - 1);
        raw.split_once('e')
            .and_then(|(_, exp)| exp.parse::<i64>().ok())
            .unwrap_or(0)
    };
    let limit = i64::try_from(significant).unwrap_or(i64::MAX);

    if (-4..limit).contains(&exp) {
        let decimals = usize::try_from(limit - 1 - exp).unwrap_or(0);
        let out = format!("{magnitude:.decimals$}");
        if alternate { out } else { strip_zeros(&out).to_string() }
    } else {
        let out = exponent(magnitude, significant - 1, alternate);
        if alternate {
            return out;
        }
        match out.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", strip_zeros(mantissa)),
            None => out,
        }
    }
}

fn strip_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
