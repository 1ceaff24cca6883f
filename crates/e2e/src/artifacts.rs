//! Failure evidence.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::driver::Driver;
use crate::error::SuiteResult;

/// Writes failure screenshots under a configured directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Save a screenshot as `{tc_id}_{YYYYmmdd_HHMMSS}.png`.
    pub async fn capture(&self, driver: &mut dyn Driver, tc_id: &str) -> SuiteResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.dir.join(format!("{tc_id}_{stamp}.png"));
        let bytes = driver.screenshot().await?;
        std::fs::write(&path, bytes)?;
        info!("saved failure screenshot {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;

    #[tokio::test]
    async fn capture_writes_png_named_after_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(&dir.path().join("shots"));
        let mut driver = MockDriver::new();
        let path = store.capture(&mut driver, "COUNTRY10").await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("COUNTRY10_"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), driver.screenshot_bytes);
    }
}
