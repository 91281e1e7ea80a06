//! Static HTML pages for the price panel and the run health dashboard.

use crate::domain::entities::run_report::RunReport;
use crate::domain::ports::report_sink::PanelRow;
use std::fmt::Write;

const STYLE: &str = "body{font-family:Arial,sans-serif;padding:20px;max-width:1100px;margin:auto}\
table{border-collapse:collapse;width:100%;margin-top:10px}\
th,td{border:1px solid #ddd;padding:8px;font-size:14px}\
th{background:#f5f5f5;text-align:left}\
.badge{display:inline-block;padding:2px 8px;border-radius:12px;background:#eee;margin-right:6px}\
.small{color:#666;font-size:13px}";

pub fn escape(s: &str) -> String {
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

fn money(p: Option<f64>) -> String {
    match p {
        Some(v) => format!("${v:.2}"),
        None => "—".to_string(),
    }
}

fn pct(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

fn flag(on: bool, mark: &str) -> &str {
    if on {
        mark
    } else {
        "—"
    }
}

fn page_head(title: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>\n",
        escape(title)
    )
}

pub fn render_health_page(report: &RunReport) -> String {
    let mut html = page_head("Health — cardwatch");
    html.push_str("<h1>Health Dashboard</h1>\n");
    let _ = writeln!(
        html,
        "<div class=\"small\">Started: {} UTC · Duration: {:.1}s · Batch: {} · Processed: {}/{} · Skipped: {}</div>",
        escape(&report.started.format("%Y-%m-%d %H:%M:%S").to_string()),
        report.duration_sec,
        report.batch_size,
        report.processed,
        report.cards_total,
        report.skipped,
    );
    html.push_str("<p><a href=\"index.html\">Price panel</a></p>\n<h2>Summary</h2>\n<div>\n");
    for (label, value) in [
        ("timeouts", report.timeouts),
        ("net_errors", report.net_errors),
        ("parse_errors", report.parse_errors),
        ("other_errors", report.other_errors),
        ("alerts_sent", report.alerts_sent),
    ] {
        let _ = writeln!(html, "  <span class=\"badge\">{label}: {value}</span>");
    }
    html.push_str("</div>\n<h2>Processed cards</h2>\n<table>\n");
    html.push_str(
        "<thead><tr><th>Card</th><th>Entries</th><th>Price</th><th>Δ24h</th><th>Δ7d</th>\
         <th>Breakout</th><th>Alerted</th><th>Note</th></tr></thead>\n<tbody>\n",
    );
    for item in &report.items {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&item.name),
            item.entries,
            money(item.price_now),
            pct(item.pct_24h),
            pct(item.pct_7d),
            flag(item.breakout, "✅"),
            flag(item.alerted, "📣"),
            escape(&item.note),
        );
    }
    html.push_str("</tbody>\n</table>\n</body></html>\n");
    html
}

pub fn render_panel_page(rows: &[PanelRow]) -> String {
    let mut html = page_head("Price Panel — cardwatch");
    html.push_str("<h1>Price Panel</h1>\n<p><a href=\"health.html\">Health dashboard</a></p>\n");
    html.push_str(
        "<table><thead><tr><th>Card</th><th>Now</th><th>Market</th><th>Δ24h</th><th>Δ7d</th>\
         <th>Breakout</th></tr></thead><tbody>\n",
    );
    for r in rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&r.name),
            money(Some(r.price_now)),
            money(r.market_now),
            pct(r.pct_24h),
            pct(r.pct_7d),
            flag(r.breakout, "✅"),
        );
    }
    html.push_str("</tbody></table>\n</body></html>\n");
    html
}
