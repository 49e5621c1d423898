//! Static HTML summary: headline figures plus the per-scenario table.

use super::{format_count, scenarios_in_order};
use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::ingest::ParsedRun;
use crate::stats;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 20px; background: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #333; border-bottom: 3px solid #667eea; padding-bottom: 10px; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th { background: #667eea; color: white; padding: 12px; text-align: left; }
        td { padding: 10px; border-bottom: 1px solid #ddd; }
        .metric { display: inline-block; margin: 10px 20px 10px 0; padding: 15px 20px; background: #f0f0f0; border-radius: 5px; }
        .metric-label { font-size: 12px; color: #666; }
        .metric-value { font-size: 24px; font-weight: bold; color: #333; }
"#;

/// Render the HTML report into a string.
pub fn render_html(run: &ParsedRun, config: &AnalyzeConfig) -> String {
    let durations = stats::stats(&run.metrics.values(&config.metrics.duration));
    let (avg, p95) = durations.map(|s| (s.avg, s.p95)).unwrap_or((0.0, 0.0));
    let total_requests = run.metrics.points(&config.metrics.requests).len();
    let title = html_escape(&config.report.title);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("    <title>{title}</title>\n"));
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n");
    html.push_str("    <div class=\"container\">\n");
    html.push_str(&format!("        <h1>{title}</h1>\n\n"));

    html.push_str("        <div>\n");
    push_metric(&mut html, "Total requests", &format_count(total_requests));
    push_metric(&mut html, "Avg response time", &format!("{avg:.2}ms"));
    push_metric(&mut html, "P95 response time", &format!("{p95:.2}ms"));
    html.push_str("        </div>\n\n");

    html.push_str("        <h2>Performance by scenario</h2>\n");
    html.push_str("        <table>\n            <thead>\n                <tr>\n");
    for header in ["Scenario", "Requests", "Avg (ms)", "P95 (ms)", "P99 (ms)"] {
        html.push_str(&format!("                    <th>{header}</th>\n"));
    }
    html.push_str("                </tr>\n            </thead>\n            <tbody>\n");

    for (scenario, group) in scenarios_in_order(&run.scenarios) {
        let Some(s) = stats::stats(&group.durations) else {
            continue;
        };
        html.push_str("                <tr>\n");
        html.push_str(&format!(
            "                    <td>{}</td>\n",
            html_escape(scenario)
        ));
        html.push_str(&format!(
            "                    <td>{}</td>\n",
            format_count(s.count)
        ));
        html.push_str(&format!("                    <td>{:.2}</td>\n", s.avg));
        html.push_str(&format!("                    <td>{:.2}</td>\n", s.p95));
        html.push_str(&format!("                    <td>{:.2}</td>\n", s.p99));
        html.push_str("                </tr>\n");
    }

    html.push_str("            </tbody>\n        </table>\n    </div>\n</body>\n</html>\n");
    html
}

fn push_metric(html: &mut String, label: &str, value: &str) {
    html.push_str("            <div class=\"metric\">\n");
    html.push_str(&format!(
        "                <div class=\"metric-label\">{label}</div>\n"
    ));
    html.push_str(&format!(
        "                <div class=\"metric-value\">{value}</div>\n"
    ));
    html.push_str("            </div>\n");
}

/// Write the HTML report to `path`, replacing any existing file.
pub fn write_html_file(
    path: &Path,
    run: &ParsedRun,
    config: &AnalyzeConfig,
) -> Result<(), AnalyzeError> {
    let write_err = |e: io::Error| AnalyzeError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    let html = render_html(run, config);
    let file = std::fs::File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    out.write_all(html.as_bytes()).map_err(write_err)?;
    out.flush().map_err(write_err)?;

    tracing::info!(path = %path.display(), bytes = html.len(), "wrote HTML report");
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_reader;
    use tempfile::TempDir;

    fn parse(lines: &[&str]) -> ParsedRun {
        parse_reader(lines.join("\n").as_bytes(), &AnalyzeConfig::default()).unwrap()
    }

    fn sample_run() -> ParsedRun {
        parse(&[
            r#"{"type":"Point","metric":"http_reqs","data":{"value":1,"tags":{}}}"#,
            r#"{"type":"Point","metric":"http_reqs","data":{"value":1,"tags":{}}}"#,
            r#"{"type":"Point","metric":"http_req_duration","data":{"value":100,"tags":{"scenario":"spike"}}}"#,
            r#"{"type":"Point","metric":"http_req_duration","data":{"value":50,"tags":{"scenario":"browse <b>"}}}"#,
        ])
    }

    #[test]
    fn headline_figures() {
        let html = render_html(&sample_run(), &AnalyzeConfig::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"metric-value\">2</div>"));
        assert!(html.contains("<div class=\"metric-value\">75.00ms</div>"));
        // floor(2 * 0.95) = 1 -> the larger sample
        assert!(html.contains("<div class=\"metric-value\">100.00ms</div>"));
    }

    #[test]
    fn scenario_rows_sorted_and_escaped() {
        let html = render_html(&sample_run(), &AnalyzeConfig::default());
        let browse = html.find("<td>browse &lt;b&gt;</td>").unwrap();
        let spike = html.find("<td>spike</td>").unwrap();
        assert!(browse < spike);
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn empty_run_renders_zeroes() {
        let html = render_html(&ParsedRun::default(), &AnalyzeConfig::default());
        assert!(html.contains("<div class=\"metric-value\">0</div>"));
        assert!(html.contains("<div class=\"metric-value\">0.00ms</div>"));
        assert!(!html.contains("<td>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn title_comes_from_config() {
        let mut config = AnalyzeConfig::default();
        config.report.title = "Stock & Orders".to_string();
        let html = render_html(&ParsedRun::default(), &config);
        assert!(html.contains("<title>Stock &amp; Orders</title>"));
        assert!(html.contains("<h1>Stock &amp; Orders</h1>"));
    }

    #[test]
    fn write_file_creates_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.html");
        write_html_file(&path, &sample_run(), &AnalyzeConfig::default()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, render_html(&sample_run(), &AnalyzeConfig::default()));
    }
}
