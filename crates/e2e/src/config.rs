//! Process-wide suite configuration.
//!
//! Defaults match the recorded test environment; everything can be
//! overridden through `CIVIPORT_*` environment variables or the suite
//! entry point's CLI flags. Settings are static for the life of the
//! process.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Browser engine driven through Playwright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(format!("unknown browser: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Static configuration for one suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Base URL of the console under test.
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub viewport: Viewport,
    /// Default timeout for element waits, in milliseconds.
    pub default_timeout_ms: u64,
    /// Bounded retries for page navigation.
    pub nav_retries: usize,
    /// CSV with `TC ID`/`Test Data`/`Expected Result`/`Status`/`Remarks`.
    pub data_file: PathBuf,
    /// Failure screenshots land here.
    pub artifacts_dir: PathBuf,
    /// Suite summary JSON lands here.
    pub reports_dir: PathBuf,
    /// Root for upload fixtures (hierarchy CSVs, geojson/kml, media).
    pub uploads_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5173".to_string(),
            browser: Browser::default(),
            headless: true,
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            default_timeout_ms: 10_000,
            nav_retries: 3,
            data_file: PathBuf::from("data/testdata.csv"),
            artifacts_dir: PathBuf::from("artifacts"),
            reports_dir: PathBuf::from("reports"),
            uploads_dir: PathBuf::from("data/uploads"),
        }
    }
}

impl SuiteConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("CIVIPORT_BASE_URL") {
            cfg.base_url = v;
        }
        if let Ok(v) = std::env::var("CIVIPORT_BROWSER") {
            if let Ok(b) = v.parse() {
                cfg.browser = b;
            }
        }
        if let Ok(v) = std::env::var("CIVIPORT_HEADLESS") {
            cfg.headless = v != "0";
        }
        if let Ok(v) = std::env::var("CIVIPORT_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                cfg.default_timeout_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("CIVIPORT_DATA_FILE") {
            cfg.data_file = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CIVIPORT_ARTIFACTS_DIR") {
            cfg.artifacts_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CIVIPORT_REPORTS_DIR") {
            cfg.reports_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CIVIPORT_UPLOADS_DIR") {
            cfg.uploads_dir = PathBuf::from(v);
        }
        cfg
    }

    /// Join a page path onto the base URL.
    pub fn page_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_joins_without_doubled_slash() {
        let cfg = SuiteConfig {
            base_url: "http://192.168.1.8:5173/".into(),
            ..Default::default()
        };
        assert_eq!(cfg.page_url("/login"), "http://192.168.1.8:5173/login");
        assert_eq!(cfg.page_url("login"), "http://192.168.1.8:5173/login");
        assert_eq!(cfg.page_url(""), "http://192.168.1.8:5173/");
    }

    #[test]
    fn browser_round_trips_from_str() {
        assert_eq!("webkit".parse::<Browser>().unwrap(), Browser::Webkit);
        assert_eq!("Firefox".parse::<Browser>().unwrap(), Browser::Firefox);
        assert!("safari".parse::<Browser>().is_err());
    }
}
