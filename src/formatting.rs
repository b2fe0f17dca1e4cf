// src/formatting.rs

use crate::chat::{ChatMessage, Widget};
use crate::core::{Alert, EvalMatch};
use serde_json::Value;

/// Mention target placed in the top-level message text.
pub const MENTION_ALL: &str = "<users/all>";

/// Rule name prefix that marks an alert as dangerous.
pub const DANGER_PREFIX: &str = "[DANGER]";

/// A trait for turning an alert into a chat message document.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, alert: &Alert) -> ChatMessage;
}

/// Display severity of an alert, which picks the title color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Danger,
    Warn,
    Health,
}

impl Severity {
    /// Classifies an alert. The `ok` state always wins over the danger prefix.
    pub fn of(alert: &Alert) -> Self {
        if alert.is_ok() {
            Severity::Health
        } else if alert.rule_name.starts_with(DANGER_PREFIX) {
            Severity::Danger
        } else {
            Severity::Warn
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Severity::Danger => "#fc2f2f",
            Severity::Warn => "#ffcc14",
            Severity::Health => "#27d871",
        }
    }
}

/// The derived display fields of an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub mention: &'static str,
    pub severity: Severity,
    pub text: String,
}

impl Presentation {
    pub fn from_alert(alert: &Alert) -> Self {
        let severity = Severity::of(alert);
        // Danger alerts currently mention the same audience as every other alert.
        let mention = MENTION_ALL;
        let text = format!(
            "<font color=\"{}\">{}</font>\n{}",
            severity.color(),
            alert.title,
            eval_detail(&alert.eval_matches)
        );

        Self {
            mention,
            severity,
            text,
        }
    }
}

/// Renders the detail line of the last evaluation match.
///
/// The line prints the match's `value` after the `metric:` label and its
/// `metric` after the `value:` label. Earlier matches are not rendered.
pub fn eval_detail(matches: &[EvalMatch]) -> String {
    matches
        .last()
        .map(|eval| {
            format!(
                "metric: {}, value: {}\n",
                format_float(eval.get("value")),
                format_string(eval.get("metric"))
            )
        })
        .unwrap_or_default()
}

/// Fixed six-decimal rendering, with a `%!f(...)` marker for non-numbers.
fn format_float(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format!("{:.6}", f),
            None => format!("%!f({})", n),
        },
        Some(Value::String(s)) => format!("%!f(string={})", s),
        Some(Value::Bool(b)) => format!("%!f(bool={})", b),
        Some(Value::Null) | None => "%!f(<nil>)".to_string(),
        Some(other) => format!("%!f({})", other),
    }
}

/// Verbatim rendering for strings, with a `%!s(...)` marker for the rest.
fn format_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format!("%!s(float64={})", format_shortest(f)),
            None => format!("%!s({})", n),
        },
        Some(Value::Bool(b)) => format!("%!s(bool={})", b),
        Some(Value::Null) | None => "%!s(<nil>)".to_string(),
        Some(other) => format!("%!s({})", other),
    }
}

/// Shortest round-trip digits, switching to `d.ddde±XX` outside
/// `1e-4 <= |f| < 1e21`.
fn format_shortest(f: f64) -> String {
    let scientific = format!("{:e}", f);
    if let Some((mantissa, exp)) = scientific.split_once('e') {
        if let Ok(exp) = exp.parse::<i32>() {
            if f != 0.0 && !(-4..21).contains(&exp) {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exp.abs());
            }
        }
    }
    format!("{}", f)
}

/// A formatter producing a Google Chat card: a head section with the colored
/// summary, a link button and the panel image, then a detail section with the
/// state and message.
pub struct GoogleChatFormatter;

impl MessageFormatter for GoogleChatFormatter {
    fn format(&self, alert: &Alert) -> ChatMessage {
        let presentation = Presentation::from_alert(alert);

        let head = vec![
            Widget::text_paragraph(presentation.text),
            Widget::link_button("URL", alert.rule_url.as_str()),
            Widget::image(alert.image_url.as_str()),
        ];
        let detail = vec![
            Widget::multiline_key_value("State", alert.state.as_str()),
            Widget::multiline_key_value("Message", alert.message.as_str()),
        ];

        ChatMessage::single_card(presentation.mention, vec![head, detail])
    }
}
