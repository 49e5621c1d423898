use crate::error::AnalyzeError;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from analyze.toml.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct AnalyzeConfig {
    pub metrics: MetricNames,
    pub tags: TagKeys,
    pub report: ReportConfig,
}

/// Metric names the reports know how to interpret.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricNames {
    pub duration: String,
    pub waiting: String,
    pub requests: String,
    pub failed: String,
    pub errors: String,
}

/// Tag keys used to group request durations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TagKeys {
    pub scenario: String,
    pub product: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
}

// --- Default implementations ---

impl Default for MetricNames {
    fn default() -> Self {
        Self {
            duration: "http_req_duration".to_string(),
            waiting: "http_req_waiting".to_string(),
            requests: "http_reqs".to_string(),
            failed: "http_req_failed".to_string(),
            errors: "errors".to_string(),
        }
    }
}

impl Default for TagKeys {
    fn default() -> Self {
        Self {
            scenario: "scenario".to_string(),
            product: "productId".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "k6 Performance Test Results".to_string(),
        }
    }
}

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "analyze.toml";

/// Load config from an explicit path, or from [`DEFAULT_CONFIG_FILE`] when
/// `path` is `None`. Only the default file may be absent, in which case the
/// defaults apply; an explicit path must exist and parse.
pub fn load_config(path: Option<&Path>) -> Result<AnalyzeConfig, AnalyzeError> {
    match path {
        Some(path) => read_config(path, true),
        None => read_config(Path::new(DEFAULT_CONFIG_FILE), false),
    }
}

fn read_config(path: &Path, required: bool) -> Result<AnalyzeConfig, AnalyzeError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(AnalyzeConfig::default());
        }
        Err(e) => {
            return Err(AnalyzeError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    toml::from_str(&contents).map_err(|e| AnalyzeError::Config {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_default_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = read_config(&dir.path().join(DEFAULT_CONFIG_FILE), false).unwrap();
        assert_eq!(cfg.metrics.duration, "http_req_duration");
        assert_eq!(cfg.metrics.requests, "http_reqs");
        assert_eq!(cfg.tags.product, "productId");
        assert_eq!(cfg.report.title, "k6 Performance Test Results");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analyze.toml");
        std::fs::write(
            &path,
            "[metrics]\nduration = \"grpc_req_duration\"\n\n[report]\ntitle = \"Checkout\"\n",
        )
        .unwrap();

        let cfg = load_config(Some(path.as_path())).unwrap();
        assert_eq!(cfg.metrics.duration, "grpc_req_duration");
        assert_eq!(cfg.metrics.waiting, "http_req_waiting");
        assert_eq!(cfg.tags.scenario, "scenario");
        assert_eq!(cfg.report.title, "Checkout");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analyze.toml");
        std::fs::write(&path, "[metrics\nduration = 3").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, AnalyzeError::Config { .. }));
        assert!(err.to_string().contains("analyze.toml"));
    }

    #[test]
    fn missing_explicit_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typo.toml");

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, AnalyzeError::Read { .. }));
        assert!(err.to_string().contains("typo.toml"));
    }
}
