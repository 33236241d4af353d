//! HTML pages for browser form submissions.
//!
//! Templates live in `templates/` and are compiled in with `rust-embed`.
//! Substitution is plain `{{name}}` replacement; every dynamic value is
//! escaped first.

use std::fmt::Write as _;

use axum::response::Html;
use rust_embed::Embed;

use crate::types::{ResultRecord, FEATURE_NAMES, NUM_FEATURES, NUM_TARGETS};
use crate::validation::RANGES;

#[derive(Embed)]
#[folder = "templates/"]
struct Templates;

/// Display label and unit per feature, canonical order.
const FEATURE_LABELS: [(&str, &str); NUM_FEATURES] = [
    ("Young's modulus", "GPa"),
    ("Density", "kg/m³"),
    ("Poisson's ratio", "-"),
    ("Thickness", "mm"),
    ("Length", "m"),
    ("Pressure", "Pa"),
    ("Frequency", "Hz"),
];

/// Display label and unit per target, canonical order.
const TARGET_LABELS: [(&str, &str); NUM_TARGETS] = [
    ("Deformation", "mm"),
    ("Stress", "MPa"),
    ("Strain", "-"),
    ("Factor of safety", "-"),
    ("Fatigue life", "cycles"),
    ("Damage", "-"),
];

fn template(name: &str) -> String {
    Templates::get(name)
        .map(|file| String::from_utf8_lossy(&file.data).into_owned())
        .unwrap_or_else(|| {
            tracing::error!(template = name, "Template missing from build");
            "{{body}}{{fields}}{{rows}}{{message}}".to_string()
        })
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(
        template("layout.html")
            .replace("{{title}}", &escape_html(title))
            .replace("{{body}}", body),
    )
}

/// `GET /` input form.
pub fn index_page() -> Html<String> {
    let mut fields = String::new();
    for ((name, (label, unit)), range) in FEATURE_NAMES.iter().zip(FEATURE_LABELS).zip(RANGES) {
        let _ = writeln!(
            fields,
            "  <label for=\"{name}\">{label} <span class=\"hint\">({unit}, {} to {})</span></label>\n  \
             <input id=\"{name}\" name=\"{name}\" type=\"number\" step=\"any\" min=\"{}\" max=\"{}\" required>",
            range.low, range.high, range.low, range.high,
        );
    }
    page(
        "Input",
        &template("index.html").replace("{{fields}}", &fields),
    )
}

/// Result table for a successful form prediction.
pub fn result_page(record: &ResultRecord) -> Html<String> {
    let mut rows = String::new();
    for ((_, value), (label, unit)) in record.iter().zip(TARGET_LABELS) {
        let _ = writeln!(
            rows,
            "    <tr><td>{label}</td><td>{} <span class=\"hint\">{unit}</span></td></tr>",
            format_value(value)
        );
    }
    page(
        "Prediction Results",
        &template("result.html").replace("{{rows}}", &rows),
    )
}

/// Error page; `message` is escaped.
pub fn error_page(message: &str) -> Html<String> {
    page(
        "Error",
        &template("error.html").replace("{{message}}", &escape_html(message)),
    )
}

/// Six significant digits, switching to scientific notation for very large
/// or very small magnitudes.
fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e6).contains(&magnitude) {
        format!("{value:.5e}")
    } else {
        format!("{value:.6}")
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
