//! Server-rendered HTML: the built-in landing page and the diagnostics dashboard.

use std::fmt::Write as _;

use coderelay_core::registry::BotRegistry;
use coderelay_types::diagnostics::{DiagnosticsReport, ProbeStatus};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#1f2328}\
table{border-collapse:collapse;width:100%}th,td{text-align:left;padding:.4rem .6rem;border-bottom:1px solid #d0d7de}\
.ok{color:#1a7f37}.fail{color:#cf222e}code{background:#f6f8fa;padding:0 .2rem}";

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>\n",
        escape(title)
    )
}

/// Landing page used when the web directory has no `index.html`.
pub fn landing_page(registry: &BotRegistry) -> String {
    let mut body = String::from(
        "<h1>coderelay</h1><p>Chat backend for hosted code models.</p>\
<h2>Endpoints</h2><ul>\
<li><code>POST /api/init-chat</code></li>\
<li><code>POST /api/chat</code></li>\
<li><code>GET /api/chat/{chatId}/history</code></li>\
<li><code>DELETE /api/chat/{chatId}</code></li>\
<li><code>GET /api/bots</code>, <code>GET /api/stats</code>, <code>GET /api/health</code></li>\
<li><a href=\"/test\">GET /test</a> (model diagnostics)</li></ul>\
<h2>Bots</h2><table><tr><th>Id</th><th>Name</th><th>Category</th><th>Model</th></tr>",
    );
    for bot in registry.all() {
        let _ = write!(
            body,
            "<tr><td><a href=\"/test?bot={id}\">{id}</a></td><td>{}</td><td>{}</td><td><code>{}</code></td></tr>",
            escape(&bot.name),
            bot.category,
            escape(&bot.model),
            id = escape(&bot.id),
        );
    }
    body.push_str("</table>");
    page("coderelay", &body)
}

/// Diagnostics dashboard for a finished sweep.
pub fn diagnostics_page(report: &DiagnosticsReport) -> String {
    let summary = &report.summary;
    let average = summary
        .average_latency_ms
        .map(|ms| format!("{ms} ms"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut body = format!(
        "<h1>Model diagnostics</h1><p>{} tested, <span class=\"ok\">{} passed</span>, \
<span class=\"fail\">{} failed</span>, average latency {average}. Run at {}.</p>\
<table><tr><th>Bot</th><th>Model</th><th>Status</th><th>Latency</th><th>Details</th></tr>",
        summary.total,
        summary.passed,
        summary.failed,
        report.timestamp.to_rfc3339(),
    );

    for result in &report.results {
        let (class, label, details) = match result.status {
            ProbeStatus::Success => ("ok", "success", result.response.as_deref().unwrap_or("")),
            ProbeStatus::Failed => ("fail", "failed", result.error.as_deref().unwrap_or("")),
        };
        let _ = write!(
            body,
            "<tr><td>{}</td><td><code>{}</code></td><td class=\"{class}\">{label}</td><td>{} ms</td><td>{}</td></tr>",
            escape(&result.name),
            escape(&result.model),
            result.latency_ms,
            escape(details),
        );
    }
    body.push_str("</table><p><a href=\"/\">Back</a></p>");
    page("coderelay diagnostics", &body)
}
