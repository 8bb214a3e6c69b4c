//! HTML views for the three verification steps.
//!
//! Templates are compiled in with `include_str!` and filled in a single left to
//! right pass, so a bound value can never be re-expanded as a placeholder.
//! Every bound value is HTML-escaped.

const LAYOUT: &str = include_str!("templates/layout.html");
const STEP1: &str = include_str!("templates/step1.html");
const STEP2: &str = include_str!("templates/step2.html");
const STEP3: &str = include_str!("templates/step3.html");

pub const DEFAULT_TITLE: &str = "Verify your phone number";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// Entry form asking for the phone number.
    Step1 { error: Option<String> },
    /// Code form carrying the verification id in a hidden field.
    Step2 { id: String, error: Option<String> },
    /// Confirmation.
    Step3,
}

impl View {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Step1 { .. } => "step1",
            Self::Step2 { .. } => "step2",
            Self::Step3 => "step3",
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Step1 { error } | Self::Step2 { error, .. } => error.as_deref(),
            Self::Step3 => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Templates {
    title: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl Templates {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Render `view` into a complete HTML document.
    #[must_use]
    pub fn render(&self, view: &View) -> String {
        let error = view.error().map(error_block).unwrap_or_default();

        let content = match view {
            View::Step1 { .. } => fill(STEP1, &[("error", Value::Html(&error))]),
            View::Step2 { id, .. } => fill(
                STEP2,
                &[("id", Value::Text(id)), ("error", Value::Html(&error))],
            ),
            View::Step3 => STEP3.to_string(),
        };

        fill(
            LAYOUT,
            &[
                ("title", Value::Text(&self.title)),
                ("content", Value::Html(content.trim_end())),
            ],
        )
    }
}

enum Value<'a> {
    Text(&'a str),
    Html(&'a str),
}

fn error_block(message: &str) -> String {
    format!("    <p class=\"error\">{}</p>", escape(message))
}

// Unknown placeholders are left as-is.
fn fill(template: &str, values: &[(&str, Value<'_>)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = after[..end].trim();
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, Value::Text(text))) => out.push_str(&escape(text)),
            Some((_, Value::Html(html))) => out.push_str(html),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Escape text for use in HTML element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
