//! HTML rendering for the prediction form

use crate::types::features::{RawFeatures, RawValue, FEATURE_NAMES};
use std::fmt::Write;

pub const TITLE: &str = "Diabetes Prediction (XGBoost)";
pub const DESCRIPTION: &str = "Enter numeric patient features and click Predict. \
Make sure your model expects these features in the shown order.";

/// Form defaults, in feature order
pub const DEFAULT_VALUES: [&str; 8] = ["0", "120", "70", "20", "79", "30.0", "0.5", "33"];

/// Example inputs offered as one-click presets
pub const PRESETS: [[&str; 8]; 2] = [
    ["2", "120", "70", "20", "79", "30.0", "0.5", "33"],
    ["6", "140", "90", "30", "130", "35.5", "0.65", "48"],
];

/// Values to show in the form inputs: whatever the user sent, else the defaults
pub fn form_values(raw: &RawFeatures) -> [String; 8] {
    std::array::from_fn(|i| match raw.get(FEATURE_NAMES[i]) {
        Some(RawValue::Text(s)) => s.clone(),
        Some(RawValue::Number(n)) => n.to_string(),
        Some(RawValue::Flag(b)) => b.to_string(),
        Some(RawValue::Other(v)) => v.to_string(),
        None => DEFAULT_VALUES[i].to_string(),
    })
}

/// Query string that pre-fills the form with a preset
pub fn preset_query(values: &[&str; 8]) -> String {
    FEATURE_NAMES
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Render the full page
pub fn render_page(values: &[String; 8], result: Option<&str>, model_loaded: bool) -> String {
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
.row {{ display: flex; gap: 2rem; }}
.col {{ flex: 1; }}
label {{ display: block; margin-top: .6rem; }}
input, textarea {{ width: 100%; box-sizing: border-box; }}
.warn {{ color: #b00; }}
</style>
</head>
<body>
<h2>{title}</h2>
<p>{description}</p>
"#,
        title = escape_html(TITLE),
        description = escape_html(DESCRIPTION),
    );

    if !model_loaded {
        html.push_str("<p class=\"warn\">No model is loaded; predictions are unavailable.</p>\n");
    }

    html.push_str("<div class=\"row\">\n<div class=\"col\">\n<form method=\"post\" action=\"/predict\">\n");
    for (name, value) in FEATURE_NAMES.iter().zip(values) {
        let _ = writeln!(
            html,
            r#"<label for="{name}">{name}</label><input type="number" step="any" id="{name}" name="{name}" value="{value}">"#,
            name = name,
            value = escape_html(value),
        );
    }
    html.push_str("<p><button type=\"submit\">Predict</button></p>\n</form>\n</div>\n");

    let _ = write!(
        html,
        r#"<div class="col">
<label for="result">Prediction Result</label>
<textarea id="result" rows="6" readonly>{}</textarea>
</div>
</div>
"#,
        escape_html(result.unwrap_or(""))
    );

    html.push_str("<h3>Examples</h3>\n<ul>\n");
    for preset in &PRESETS {
        let label = preset.join(", ");
        let _ = writeln!(
            html,
            r#"<li><a href="/?{}">[{}]</a></li>"#,
            escape_html(&preset_query(preset)),
            label
        );
    }
    html.push_str("</ul>\n</body>\n</html>\n");

    html
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
