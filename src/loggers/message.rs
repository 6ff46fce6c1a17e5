//! # Call shapes and message resolution
//!
//! A log call is either a plain message, a positional template (`%s`-style)
//! or a named template (`{name}`-style), optionally preceded by call-site
//! fields. The shape is fixed when the [`Call`] is built, so a single call can
//! never mix the two interpolation modes.

use serde_json::Value;

use crate::core::error::LogError;
use crate::loggers::fields::Fields;
use crate::loggers::format::{self, display};

/// How the message text of a call is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Used verbatim.
    Text(String),
    /// `%[flags][width][.precision]type` conversions, consumed left to right.
    /// Types: `s r d i u x X o f F e E g G`, plus `%%`.
    Positional { template: String, args: Vec<Value> },
    /// `{name}`, `{name:spec}` and `{name!r}` placeholders; `{{` and `}}` are
    /// literal braces.
    Named { template: String, args: Fields },
}

impl Message {
    /// Produces the final message string.
    ///
    /// A template with no arguments is taken verbatim, so a lone `"100%"`
    /// is not an error.
    pub fn resolve(&self) -> Result<String, LogError> {
        match self {
            Message::Text(text) => Ok(text.clone()),
            Message::Positional { template, args } if args.is_empty() => Ok(template.clone()),
            Message::Named { template, args } if args.is_empty() => Ok(template.clone()),
            Message::Positional { template, args } => interpolate_positional(template, args),
            Message::Named { template, args } => interpolate_named(template, args),
        }
    }
}

/// A single log invocation: optional call-site fields plus a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub fields: Option<Fields>,
    pub message: Message,
}

impl Call {
    pub fn new(text: impl Into<String>) -> Self {
        Self { fields: None, message: Message::Text(text.into()) }
    }

    pub fn positional<I, V>(template: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            fields: None,
            message: Message::Positional {
                template: template.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn named(template: impl Into<String>, args: Fields) -> Self {
        Self {
            fields: None,
            message: Message::Named { template: template.into(), args },
        }
    }

    /// Attaches call-site fields; they override bound fields of the same name.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Builds a call from a loosely typed argument list.
    ///
    /// A leading JSON object is taken as call-site fields. Of what remains,
    /// more than one value means a positional template; otherwise a non-empty
    /// `kwargs` means a named template; otherwise the single value is the
    /// message. Positional arguments take priority over `kwargs`.
    pub fn from_args(args: Vec<Value>, kwargs: Fields) -> Result<Self, LogError> {
        let mut args = args.into_iter().peekable();
        let fields = match args.next_if(Value::is_object) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        };
        let rest: Vec<Value> = args.collect();

        let message = match rest.as_slice() {
            [] => return Err(LogError::FormatError("missing log message".into())),
            [text] if kwargs.is_empty() => Message::Text(display(text)),
            [template] => Message::Named {
                template: template_text(template)?,
                args: kwargs,
            },
            [template, extra @ ..] => Message::Positional {
                template: template_text(template)?,
                args: extra.to_vec(),
            },
        };
        Ok(Self { fields, message })
    }
}

impl From<&str> for Call {
    fn from(text: &str) -> Self {
        Call::new(text)
    }
}

impl From<String> for Call {
    fn from(text: String) -> Self {
        Call::new(text)
    }
}

impl From<Message> for Call {
    fn from(message: Message) -> Self {
        Self { fields: None, message }
    }
}

impl<S: Into<String>> From<(Fields, S)> for Call {
    fn from((fields, text): (Fields, S)) -> Self {
        Call::new(text).with_fields(fields)
    }
}

fn template_text(value: &Value) -> Result<String, LogError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(LogError::FormatError(format!(
            "message template must be a string, got {other}"
        ))),
    }
}

fn interpolate_positional(template: &str, args: &[Value]) -> Result<String, LogError> {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        if chars.next_if_eq(&'%').is_some() {
            out.push('%');
            continue;
        }
        let spec = format::parse_percent(&mut chars)?;
        let arg = args.next().ok_or_else(|| {
            LogError::FormatError("not enough arguments for format string".into())
        })?;
        out.push_str(&format::render(arg, &spec)?);
    }

    if args.next().is_some() {
        return Err(LogError::FormatError(
            "not all arguments converted during string formatting".into(),
        ));
    }
    Ok(out)
}

/// Renders one `{field!conv:spec}` placeholder body.
fn render_placeholder(body: &str, args: &Fields) -> Result<String, LogError> {
    let (head, spec) = body.split_once(':').unwrap_or((body, ""));
    let (name, conversion) = match head.split_once('!') {
        Some((name, conv)) => (name, Some(conv)),
        None => (head, None),
    };
    if name.is_empty() {
        return Err(LogError::FormatError(
            "positional placeholder '{}' in a named template".into(),
        ));
    }
    let value = args
        .get(name)
        .ok_or_else(|| LogError::FormatError(format!("missing named argument '{name}'")))?;
    let value = match conversion {
        None | Some("s") => value.clone(),
        Some("r") | Some("a") => Value::String(value.to_string()),
        Some(other) => {
            return Err(LogError::FormatError(format!(
                "unknown conversion specifier '{other}'"
            )));
        }
    };
    format::render(&value, &format::parse_named_spec(spec)?)
}

fn interpolate_named(template: &str, args: &Fields) -> Result<String, LogError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.next_if_eq(&'{').is_some() => out.push('{'),
            '}' if chars.next_if_eq(&'}').is_some() => out.push('}'),
            '{' => {
                let mut body = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => body.push(c),
                        None => {
                            return Err(LogError::FormatError(
                                "expected '}' before end of string".into(),
                            ));
                        }
                    }
                }
                out.push_str(&render_placeholder(&body, args)?);
            }
            '}' => {
                return Err(LogError::FormatError(
                    "single '}' encountered in format string".into(),
                ));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn positional_conversions() {
        let call = Call::positional("%s took %d ms (%f) %r 100%%", [json!("req"), json!(12.9), json!(0.5), json!("x")]);
        assert_eq!(call.message.resolve().unwrap(), "req took 12 ms (0.500000) \"x\" 100%");
    }

    #[test]
    fn positional_argument_count_mismatch() {
        let short = Call::positional("%s %s", [json!(1)]);
        assert!(matches!(short.message.resolve(), Err(LogError::FormatError(_))));

        let long = Call::positional("%s", [json!(1), json!(2)]);
        assert!(matches!(long.message.resolve(), Err(LogError::FormatError(_))));
    }

    #[test]
    fn named_placeholders_and_escapes() {
        let call = Call::named("{{user}} is {user}, {n} items", fields(json!({"user": "ada", "n": 3})));
        assert_eq!(call.message.resolve().unwrap(), "{user} is ada, 3 items");

        let missing = Call::named("{nope}", fields(json!({"user": "ada"})));
        assert!(matches!(missing.message.resolve(), Err(LogError::FormatError(_))));
    }

    #[test]
    fn template_without_arguments_is_verbatim() {
        let call = Call::positional("disk at 100%", Vec::<Value>::new());
        assert_eq!(call.message.resolve().unwrap(), "disk at 100%");
    }

    #[test]
    fn from_args_picks_one_mode() {
        let call = Call::from_args(vec![json!({"req_id": "abc"}), json!("started")], Fields::new()).unwrap();
        assert_eq!(call.fields, Some(fields(json!({"req_id": "abc"}))));
        assert_eq!(call.message, Message::Text("started".into()));

        let kwargs = fields(json!({"who": "bob"}));
        let positional = Call::from_args(vec![json!("%s"), json!("alice")], kwargs.clone()).unwrap();
        assert_eq!(positional.message.resolve().unwrap(), "alice");

        let named = Call::from_args(vec![json!("hi {who}")], kwargs).unwrap();
        assert_eq!(named.message.resolve().unwrap(), "hi bob");

        assert!(Call::from_args(vec![json!({"only": "fields"})], Fields::new()).is_err());
    }

    #[test]
    fn positional_width_precision_and_radix() {
        let call = Call::positional(
            "took %.2f s, [%5d] [%-4d] %x %#X %5.1e",
            [json!(3.14159), json!(42), json!(7), json!(255), json!(255), json!(1500.0)],
        );
        assert_eq!(call.message.resolve().unwrap(), "took 3.14 s, [   42] [7   ] ff 0XFF 1.5e+03");

        let bad = Call::positional("%q", [json!(1)]);
        assert!(matches!(bad.message.resolve(), Err(LogError::FormatError(_))));
    }

    #[test]
    fn named_format_specs() {
        let args = fields(json!({"n": 7, "ms": 12.3456, "who": "bob", "big": 1234567}));
        let call = Call::named("[{n:>3}] {ms:.1f}ms {who!r} [{who:^7}] {big:,}", args);
        assert_eq!(call.message.resolve().unwrap(), "[  7] 12.3ms \"bob\" [  bob  ] 1,234,567");

        let bad = Call::named("{who:d}", fields(json!({"who": "bob"})));
        assert!(matches!(bad.message.resolve(), Err(LogError::FormatError(_))));
    }
}
