use clap::{CommandFactory, Parser};
use k6_analyze::error::AnalyzeError;
use k6_analyze::{config, ingest, report};
use std::path::PathBuf;
use std::process::ExitCode;

/// Summarize k6 JSON output (`k6 run --out json=results.json`) into a
/// console report, with optional CSV and HTML files written next to the
/// input.
#[derive(Parser, Debug)]
#[command(name = "analyze", version, about)]
pub struct Cli {
    /// k6 JSON lines results file
    #[arg(value_name = "JSON_FILE")]
    json_file: PathBuf,

    /// Write every metric point to <JSON_FILE>.csv
    #[arg(long)]
    csv: bool,

    /// Write an HTML summary to <JSON_FILE>.html
    #[arg(long)]
    html: bool,

    /// Config file path; without it, analyze.toml is used when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "analyze=debug,k6_analyze=debug"
    } else {
        "analyze=info,k6_analyze=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(usage) = validate(&cli) {
        eprintln!("{usage}");
        return ExitCode::FAILURE;
    }

    tracing::debug!(?cli, "parsed CLI arguments");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Reject arguments clap accepts but the run cannot use, returning the
/// usage text to print.
fn validate(cli: &Cli) -> Result<(), String> {
    if cli.json_file.as_os_str().is_empty() {
        return Err(Cli::command().render_usage().to_string());
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), AnalyzeError> {
    let config = config::load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "resolved config");

    let run = ingest::parse_file(&cli.json_file, &config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::console::write_report(&mut out, &run, &config).map_err(AnalyzeError::Console)?;
    drop(out);

    if cli.csv {
        let path = report::output_path(&cli.json_file, "csv");
        report::csv::write_csv_file(&path, &run, &config)?;
        println!("CSV file written: {}", path.display());
    }

    if cli.html {
        let path = report::output_path(&cli.json_file, "html");
        report::html::write_html_file(&path, &run, &config)?;
        println!("HTML report written: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_flags_default_off() {
        let cli = Cli::try_parse_from(["analyze", "results.json"]).unwrap();
        assert_eq!(cli.json_file, PathBuf::from("results.json"));
        assert!(!cli.csv);
        assert!(!cli.html);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn cli_flags_in_any_order() {
        let cli = Cli::try_parse_from(["analyze", "--html", "results.json", "--csv"]).unwrap();
        assert!(cli.csv);
        assert!(cli.html);
    }

    #[test]
    fn cli_requires_file_argument() {
        assert!(Cli::try_parse_from(["analyze", "--csv"]).is_err());
    }

    #[test]
    fn cli_rejects_empty_file_argument() {
        let err = Cli::try_parse_from(["analyze", ""]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
        assert!(err.to_string().contains("<JSON_FILE>"));
    }

    #[test]
    fn validate_empty_file_returns_usage() {
        let cli = Cli {
            json_file: PathBuf::new(),
            csv: false,
            html: false,
            config: None,
            verbose: false,
        };
        let usage = validate(&cli).unwrap_err();
        assert!(usage.contains("Usage: analyze"));
        assert!(usage.contains("<JSON_FILE>"));
    }

    #[test]
    fn validate_accepts_file_argument() {
        let cli = Cli::try_parse_from(["analyze", "results.json", "-c", "k6.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("k6.toml")));
        assert!(validate(&cli).is_ok());
    }
}
