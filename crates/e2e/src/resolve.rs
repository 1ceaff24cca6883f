//! Upload fixture resolution and attachment fallback chains.
//!
//! Fixture paths come with a preferred location plus fallbacks; the
//! first existing path wins and a full miss enumerates every candidate.
//! Attaching goes through a ranked list of upload-input locators because
//! several screens hide the real `<input type="file">` behind a styled
//! control.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::driver::Driver;
use crate::error::{SuiteError, SuiteResult, UploadAttempt};
use crate::locator::Locator;

/// What kind of file an upload step feeds in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Csv,
    GeoJson,
    Kml,
    Image,
    Video,
}

impl UploadKind {
    /// CSS for a file input accepting this kind.
    pub fn accept_css(&self) -> &'static str {
        match self {
            UploadKind::Csv => "input[type='file'][accept='.csv']",
            UploadKind::GeoJson => "input[type='file'][accept='.geojson']",
            UploadKind::Kml => "input[type='file'][accept='.kml']",
            UploadKind::Image => "input[type='file'][accept*='image']",
            UploadKind::Video => "input[type='file'][accept*='video']",
        }
    }
}

/// First existing candidate path, in the given order.
///
/// The preferred path is returned untouched when it exists; fallbacks
/// are only consulted after a miss. A total miss lists every candidate
/// so the error names exactly what was looked for.
pub fn resolve_with_fallback(preferred: &Path, fallbacks: &[PathBuf]) -> SuiteResult<PathBuf> {
    if preferred.exists() {
        return Ok(preferred.to_path_buf());
    }
    for candidate in fallbacks {
        if candidate.exists() {
            debug!(
                "fixture {} missing, using {}",
                preferred.display(),
                candidate.display()
            );
            return Ok(candidate.clone());
        }
    }
    let mut candidates = vec![preferred.display().to_string()];
    candidates.extend(fallbacks.iter().map(|p| p.display().to_string()));
    Err(SuiteError::UploadSourceNotFound { candidates })
}

/// Ranked upload-input candidates for the CSV wizard steps.
///
/// `#csv-upload` is the styled control's real input and is tried first;
/// the generic file inputs cover screens that render a plain input.
pub fn csv_upload_candidates() -> Vec<Locator> {
    vec![
        Locator::css("#csv-upload"),
        Locator::css(UploadKind::Csv.accept_css()),
        Locator::css("input[type='file']"),
        Locator::css("input[type='file']").first(),
    ]
}

/// Unhide the styled upload control's input so Playwright can reach it.
pub const REVEAL_UPLOAD_INPUT: &str = r#"(() => {
  const el = document.querySelector('#csv-upload');
  if (el) {
    el.style.display = 'block';
    el.style.visibility = 'visible';
    el.style.opacity = '1';
    el.removeAttribute('hidden');
  }
  return el !== null;
})()"#;

/// Attach `path` through the first candidate input that accepts it.
///
/// Candidates are tried in rank order and the chain short-circuits on
/// the first success. When every candidate fails, the error carries one
/// `(selector, reason)` entry per attempt.
pub async fn attach_with_fallback(
    driver: &mut dyn Driver,
    candidates: &[Locator],
    path: &Path,
) -> SuiteResult<()> {
    if !path.exists() {
        return Err(SuiteError::UploadSourceNotFound {
            candidates: vec![path.display().to_string()],
        });
    }
    // Best effort: screens keep the real input hidden until revealed.
    let _ = driver.evaluate(REVEAL_UPLOAD_INPUT).await;

    let mut attempts = Vec::new();
    for candidate in candidates {
        match driver.set_input_files(candidate, path).await {
            Ok(()) => {
                debug!("attached {} via {candidate}", path.display());
                return Ok(());
            }
            Err(err) => attempts.push(UploadAttempt {
                selector: candidate.to_string(),
                reason: err.to_string(),
            }),
        }
    }
    Err(SuiteError::UploadFailed {
        path: path.to_path_buf(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;

    #[test]
    fn preferred_path_returned_unchanged_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let preferred = dir.path().join("hierarchy.csv");
        std::fs::write(&preferred, "a,b\n").unwrap();
        let fallback = dir.path().join("other.csv");
        let resolved = resolve_with_fallback(&preferred, &[fallback]).unwrap();
        assert_eq!(resolved, preferred);
    }

    #[test]
    fn fallback_used_only_after_preferred_misses() {
        let dir = tempfile::tempdir().unwrap();
        let preferred = dir.path().join("missing.csv");
        let fallback = dir.path().join("present.csv");
        std::fs::write(&fallback, "a,b\n").unwrap();
        let resolved = resolve_with_fallback(&preferred, &[fallback.clone()]).unwrap();
        assert_eq!(resolved, fallback);
    }

    #[test]
    fn total_miss_enumerates_every_candidate() {
        let err = resolve_with_fallback(
            Path::new("/nowhere/a.csv"),
            &[PathBuf::from("/nowhere/b.csv"), PathBuf::from("/nowhere/c.csv")],
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/nowhere/a.csv"));
        assert!(msg.contains("/nowhere/b.csv"));
        assert!(msg.contains("/nowhere/c.csv"));
    }

    #[tokio::test]
    async fn chain_short_circuits_on_first_attachable_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("state.csv");
        std::fs::write(&file, "a,b\n").unwrap();

        let mut driver = MockDriver::new().allow_attach("#csv-upload");
        attach_with_fallback(&mut driver, &csv_upload_candidates(), &file)
            .await
            .unwrap();
        assert_eq!(driver.calls_for("set_input_files").len(), 1);
        assert_eq!(driver.attached, vec![file]);
    }

    #[tokio::test]
    async fn later_candidate_used_when_primary_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("district.csv");
        std::fs::write(&file, "a,b\n").unwrap();

        let mut driver = MockDriver::new().allow_attach("accept='.csv'");
        attach_with_fallback(&mut driver, &csv_upload_candidates(), &file)
            .await
            .unwrap();
        assert_eq!(driver.calls_for("set_input_files").len(), 2);
    }

    #[tokio::test]
    async fn exhausted_chain_reports_every_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("city.csv");
        std::fs::write(&file, "a,b\n").unwrap();

        let mut driver = MockDriver::new().allow_attach("no-such-input");
        let err = attach_with_fallback(&mut driver, &csv_upload_candidates(), &file)
            .await
            .unwrap_err();
        match err {
            SuiteError::UploadFailed { attempts, .. } => assert_eq!(attempts.len(), 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_source_fails_before_any_attach() {
        let mut driver = MockDriver::new();
        let err = attach_with_fallback(
            &mut driver,
            &csv_upload_candidates(),
            Path::new("/nowhere/x.csv"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SuiteError::UploadSourceNotFound { .. }));
        assert!(driver.calls_for("set_input_files").is_empty());
    }
}
