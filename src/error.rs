use std::path::PathBuf;

/// Errors that abort a run. Malformed input lines are not errors; the
/// parser skips them.
#[derive(Debug)]
pub enum AnalyzeError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    Console(std::io::Error),
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            AnalyzeError::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            AnalyzeError::Config { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
            AnalyzeError::Console(e) => write!(f, "failed to print report: {e}"),
        }
    }
}

impl std::error::Error for AnalyzeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyzeError::Read { source, .. } => Some(source),
            AnalyzeError::Write { source, .. } => Some(source),
            AnalyzeError::Config { source, .. } => Some(source),
            AnalyzeError::Console(e) => Some(e),
        }
    }
}
