//! Error cases: named, enumerable failure conditions with a code and a message template.

use super::{Context, Exception, ExceptionKind};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Identity of an error case, usable as a lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CaseId {
    pub group: &'static str,
    pub name: &'static str,
    pub code: i64,
}

impl CaseId {
    pub fn of(case: &dyn ErrorCase) -> Self {
        case.id()
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// A named error case
///
/// Implement this on a fieldless enum; `group` is usually the enum's name.
///
/// ```rust
/// use exceptable::{ErrorCase, ExceptionKind};
/// use serde_json::json;
///
/// #[derive(Debug, Clone, Copy)]
/// enum PaymentError {
///     Declined,
/// }
///
/// impl ErrorCase for PaymentError {
///     fn group(&self) -> &'static str {
///         "PaymentError"
///     }
///     fn name(&self) -> &'static str {
///         "Declined"
///     }
///     fn code(&self) -> i64 {
///         1
///     }
///     fn template(&self) -> &'static str {
///         "card ending {last4} was declined"
///     }
///     fn exception_kind(&self) -> ExceptionKind {
///         ExceptionKind::Domain
///     }
/// }
///
/// let e = PaymentError::Declined.exceptable(json!({"last4": "4242"}), None);
/// assert_eq!(e.message(), "PaymentError.Declined: card ending 4242 was declined");
/// assert!(e.is(&PaymentError::Declined));
/// ```
pub trait ErrorCase {
    fn group(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn code(&self) -> i64;

    /// Message template with `{token}` placeholders; empty by default
    fn template(&self) -> &'static str {
        ""
    }

    /// Kind of exception this case is raised as
    fn exception_kind(&self) -> ExceptionKind {
        ExceptionKind::Runtime
    }

    fn id(&self) -> CaseId {
        CaseId {
            group: self.group(),
            name: self.name(),
            code: self.code(),
        }
    }

    /// `Group.Name`
    fn error_name(&self) -> String {
        format!("{}.{}", self.group(), self.name())
    }

    /// Builds the message for this case from the given context
    ///
    /// Falls back to the bare error name when the template is empty or a placeholder
    /// has no usable value in `context`.
    fn message(&self, context: &Context) -> String {
        let name = self.error_name();
        match format_message(self.template(), context) {
            Some(message) if !message.is_empty() => format!("{name}: {message}"),
            _ => name,
        }
    }

    /// Creates an exception for this case, located at the caller
    #[track_caller]
    fn exceptable(&self, context: Value, previous: Option<Exception>) -> Exception
    where
        Self: Sized,
    {
        Exception::from_case(self, context, previous)
    }
}

/// Substitutes `{token}` placeholders from `context`
///
/// Returns `None` if any placeholder is missing or null. Strings, numbers and booleans
/// are inserted verbatim; arrays and objects as compact JSON.
pub fn format_message(template: &str, context: &Context) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let token_len = after
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if token_len == 0 || !after[token_len..].starts_with('}') {
            out.push('{');
            rest = after;
            continue;
        }

        let token = &after[..token_len];
        out.push_str(&render(context.get(token)?)?);
        rest = &after[token_len + 1..];
    }

    out.push_str(rest);
    Some(out)
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}
