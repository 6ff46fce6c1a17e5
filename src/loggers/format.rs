//! # Conversion specs
//!
//! Both template styles reduce to a [`FormatSpec`]: `%-8.3f` on the
//! positional side, `{name:>8.3f}` on the named side. Rendering is shared.

use std::iter::Peekable;
use std::str::Chars;

use serde_json::Value;

use crate::core::error::LogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign/prefix and the digits (`=` / `0` flag).
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Only negatives carry a sign.
    Minus,
    Plus,
    Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: char,
    /// `None` means text aligns left and numbers align right.
    pub align: Option<Align>,
    pub sign: Sign,
    pub alternate: bool,
    pub zero: bool,
    pub width: usize,
    pub grouping: Option<char>,
    pub precision: Option<usize>,
    pub kind: Option<char>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            sign: Sign::Minus,
            alternate: false,
            zero: false,
            width: 0,
            grouping: None,
            precision: None,
            kind: None,
        }
    }
}

fn format_error(msg: impl Into<String>) -> LogError {
    LogError::FormatError(msg.into())
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(d) = chars.next_if(char::is_ascii_digit) {
        digits.push(d);
    }
    digits.parse().ok()
}

/// Parses a `%` conversion; `chars` sits just after the `%`.
///
/// Grammar: `[flags][width][.precision][length]type` with flags from
/// `-+ 0#`. Length modifiers (`h`, `l`, `L`) are accepted and ignored.
pub fn parse_percent(chars: &mut Peekable<Chars<'_>>) -> Result<FormatSpec, LogError> {
    let mut spec = FormatSpec { align: Some(Align::Right), ..FormatSpec::default() };

    while let Some(flag) = chars.next_if(|c| "-+ 0#".contains(*c)) {
        match flag {
            '-' => spec.align = Some(Align::Left),
            '+' => spec.sign = Sign::Plus,
            ' ' if spec.sign != Sign::Plus => spec.sign = Sign::Space,
            '0' => spec.zero = true,
            '#' => spec.alternate = true,
            _ => {}
        }
    }
    if chars.peek() == Some(&'(') {
        return Err(format_error("mapping keys are not supported in positional templates"));
    }
    if chars.peek() == Some(&'*') {
        return Err(format_error("'*' width or precision is not supported"));
    }
    spec.width = take_number(chars).unwrap_or(0);
    if chars.next_if_eq(&'.').is_some() {
        if chars.peek() == Some(&'*') {
            return Err(format_error("'*' width or precision is not supported"));
        }
        spec.precision = Some(take_number(chars).unwrap_or(0));
    }
    while chars.next_if(|c| matches!(c, 'h' | 'l' | 'L')).is_some() {}

    let kind = chars.next().ok_or_else(|| format_error("incomplete format"))?;
    spec.kind = Some(match kind {
        'i' | 'u' => 'd',
        's' | 'r' | 'd' | 'x' | 'X' | 'o' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G' => kind,
        other => return Err(format_error(format!("unsupported format character '{other}'"))),
    });
    Ok(spec)
}

fn parse_align(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

/// Parses the part after `:` in a named placeholder:
/// `[[fill]align][sign][#][0][width][grouping][.precision][type]`.
pub fn parse_named_spec(text: &str) -> Result<FormatSpec, LogError> {
    let mut spec = FormatSpec::default();
    let mut chars = text.chars().peekable();

    let mut lookahead = text.chars();
    match (lookahead.next(), lookahead.next()) {
        (Some(fill), Some(a)) if parse_align(a).is_some() => {
            spec.fill = fill;
            spec.align = parse_align(a);
            chars.next();
            chars.next();
        }
        (Some(a), _) if parse_align(a).is_some() => {
            spec.align = parse_align(a);
            chars.next();
        }
        _ => {}
    }

    if let Some(sign) = chars.next_if(|c| matches!(c, '+' | '-' | ' ')) {
        spec.sign = match sign {
            '+' => Sign::Plus,
            ' ' => Sign::Space,
            _ => Sign::Minus,
        };
    }
    spec.alternate = chars.next_if_eq(&'#').is_some();
    spec.zero = chars.next_if_eq(&'0').is_some();
    spec.width = take_number(&mut chars).unwrap_or(0);
    spec.grouping = chars.next_if(|c| matches!(c, ',' | '_'));
    if chars.next_if_eq(&'.').is_some() {
        spec.precision = Some(
            take_number(&mut chars).ok_or_else(|| format_error("format specifier missing precision"))?,
        );
    }
    spec.kind = chars.next();
    if chars.next().is_some() {
        return Err(format_error(format!("invalid format specifier '{text}'")));
    }
    if let Some(kind) = spec.kind {
        if !"sdxXobfFeEgG%".contains(kind) {
            return Err(format_error(format!("unknown format code '{kind}'")));
        }
    }
    Ok(spec)
}

/// Plain-text rendering: strings unquoted, everything else as compact JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders one argument according to its spec.
pub fn render(value: &Value, spec: &FormatSpec) -> Result<String, LogError> {
    let kind = match (spec.kind, value) {
        (Some(kind), _) => kind,
        (None, Value::Number(n)) if n.is_f64() && spec.precision.is_some() => 'g',
        (None, Value::Number(n)) if n.is_f64() => {
            return Ok(pad("", &value.to_string(), spec, Align::Right));
        }
        (None, Value::Number(_)) => 'd',
        (None, _) => 's',
    };

    match kind {
        's' => Ok(render_text(&display(value), spec)),
        'r' => Ok(render_text(&value.to_string(), spec)),
        'd' | 'x' | 'X' | 'o' | 'b' => render_integer(value, kind, spec),
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' | '%' => render_float(value, kind, spec),
        other => Err(format_error(format!("unsupported format character '{other}'"))),
    }
}

fn render_text(text: &str, spec: &FormatSpec) -> String {
    let text: String = match spec.precision {
        Some(p) => text.chars().take(p).collect(),
        None => text.to_string(),
    };
    pad("", &text, spec, Align::Left)
}

fn render_integer(value: &Value, kind: char, spec: &FormatSpec) -> Result<String, LogError> {
    let n = as_integer(value, kind)?;
    let mag = n.unsigned_abs();
    let mut digits = match kind {
        'x' => format!("{mag:x}"),
        'X' => format!("{mag:X}"),
        'o' => format!("{mag:o}"),
        'b' => format!("{mag:b}"),
        _ => mag.to_string(),
    };
    // Precision on an integer is a minimum digit count
    if let Some(p) = spec.precision {
        if digits.len() < p {
            digits.insert_str(0, &"0".repeat(p - digits.len()));
        }
    }
    if let (Some(sep), 'd') = (spec.grouping, kind) {
        digits = group(&digits, sep);
    }
    let prefix = match (spec.alternate, kind) {
        (true, 'x') => "0x",
        (true, 'X') => "0X",
        (true, 'o') => "0o",
        (true, 'b') => "0b",
        _ => "",
    };
    Ok(render_numeric(n < 0, prefix, &digits, spec))
}

fn render_float(value: &Value, kind: char, spec: &FormatSpec) -> Result<String, LogError> {
    let v = as_float(value, kind)?;
    let mag = v.abs();
    let p = spec.precision.unwrap_or(6);
    let mut body = match kind {
        'e' | 'E' => scientific(mag, p, kind == 'E'),
        'g' | 'G' => general(mag, p, kind == 'G', spec.alternate),
        '%' => format!("{:.*}%", p, mag * 100.0),
        _ => format!("{:.*}", p, mag),
    };
    if let Some(sep) = spec.grouping {
        let end = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
        body = format!("{}{}", group(&body[..end], sep), &body[end..]);
    }
    Ok(render_numeric(v < 0.0, "", &body, spec))
}

/// `1.5e3` style with Python's exponent shape: sign and at least two digits.
fn scientific(mag: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, mag);
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exp.abs())
}

fn general(mag: f64, precision: usize, upper: bool, keep_zeros: bool) -> String {
    let p = precision.max(1);
    let exp = if mag == 0.0 {
        0
    } else {
        let raw = format!("{:.*e}", p - 1, mag);
        raw.split_once('e').and_then(|(_, e)| e.parse::<i32>().ok()).unwrap_or(0)
    };
    let out = if (-4..p as i32).contains(&exp) {
        format!("{:.*}", (p as i32 - 1 - exp) as usize, mag)
    } else {
        scientific(mag, p - 1, upper)
    };
    if keep_zeros {
        return out;
    }
    let split = out.find(['e', 'E']).unwrap_or(out.len());
    let (mantissa, exp_part) = out.split_at(split);
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    format!("{mantissa}{exp_part}")
}

fn group(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, d) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(d);
    }
    out
}

fn render_numeric(negative: bool, prefix: &str, body: &str, spec: &FormatSpec) -> String {
    let sign = match (negative, spec.sign) {
        (true, _) => "-",
        (false, Sign::Plus) => "+",
        (false, Sign::Space) => " ",
        (false, Sign::Minus) => "",
    };
    let head = format!("{sign}{prefix}");
    if spec.zero && spec.align != Some(Align::Left) {
        let zeros = FormatSpec { fill: '0', align: Some(Align::AfterSign), ..spec.clone() };
        return pad(&head, body, &zeros, Align::AfterSign);
    }
    pad(&head, body, spec, Align::Right)
}

fn pad(head: &str, body: &str, spec: &FormatSpec, default: Align) -> String {
    let len = head.chars().count() + body.chars().count();
    if len >= spec.width {
        return format!("{head}{body}");
    }
    let fill = |n: usize| spec.fill.to_string().repeat(n);
    let n = spec.width - len;
    match spec.align.unwrap_or(default) {
        Align::Left => format!("{head}{body}{}", fill(n)),
        Align::Right => format!("{}{head}{body}", fill(n)),
        Align::Center => format!("{}{head}{body}{}", fill(n / 2), fill(n - n / 2)),
        Align::AfterSign => format!("{head}{}{body}", fill(n)),
    }
}

fn as_integer(arg: &Value, conv: char) -> Result<i64, LogError> {
    match arg {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| format_error(format!("%{conv} argument out of range: {n}"))),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(format_error(format!("%{conv} format: a number is required, not {other}"))),
    }
}

fn as_float(arg: &Value, conv: char) -> Result<f64, LogError> {
    match arg {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format_error(format!("%{conv} argument out of range: {n}"))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(format_error(format!("%{conv} format: a number is required, not {other}"))),
    }
}
