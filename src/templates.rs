use std::collections::HashMap;

use tera::Tera;

use crate::config::REDIRECT_TEMPLATE_NAME;

/// Source of the redirect page, compiled into the binary.
const REDIRECT_TEMPLATE: &str = include_str!("../templates/force_browser.html");

/// Initialize the Tera template engine
///
/// Autoescaping is disabled: every interpolated value must go through the
/// filter matching its embedding context (`html_attr` or `js_string`).
pub fn init_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);

    tera.register_filter("html_attr", html_attr_filter);
    tera.register_filter("js_string", js_string_filter);

    tera.add_raw_template(REDIRECT_TEMPLATE_NAME, REDIRECT_TEMPLATE)?;

    Ok(tera)
}

/// Escape a value for a double- or single-quoted HTML attribute
fn html_attr_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("html_attr filter expects a string"))?;
    Ok(tera::Value::String(escape_html_attr(s)))
}

/// Render a value as a quoted JavaScript string literal safe inside `<script>`
fn js_string_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("js_string filter expects a string"))?;
    Ok(tera::Value::String(escape_js_string(s)))
}

pub fn escape_html_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_js_string(s: &str) -> String {
    // JSON handles quotes, backslashes and control characters. The rest can
    // terminate the script element or the line when left raw.
    let quoted = serde_json::Value::String(s.to_string()).to_string();
    let mut out = String::with_capacity(quoted.len());
    for c in quoted.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}
