//! Browser capability seam.
//!
//! Page objects and workflows only ever see `&mut dyn Driver`. The real
//! implementation is [`PlaywrightSession`]; unit tests script a
//! [`mock::MockDriver`] instead.
//!
//! [`PlaywrightSession`]: crate::session::PlaywrightSession

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SuiteResult;
use crate::locator::Locator;

/// Element state to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    Visible,
    Hidden,
    Attached,
}

#[async_trait]
pub trait Driver: Send {
    async fn goto(&mut self, url: &str) -> SuiteResult<()>;

    async fn click(&mut self, locator: &Locator) -> SuiteResult<()>;

    /// Click without waiting for actionability checks.
    async fn force_click(&mut self, locator: &Locator) -> SuiteResult<()>;

    async fn fill(&mut self, locator: &Locator, value: &str) -> SuiteResult<()>;

    /// Key-by-key typing, for inputs with per-keystroke handlers.
    async fn type_text(&mut self, locator: &Locator, value: &str) -> SuiteResult<()>;

    async fn press(&mut self, locator: &Locator, key: &str) -> SuiteResult<()>;

    /// Key press without a target element (Escape, Tab).
    async fn press_page_key(&mut self, key: &str) -> SuiteResult<()>;

    /// Raw click at viewport coordinates, for backdrop clicks.
    async fn mouse_click(&mut self, x: f64, y: f64) -> SuiteResult<()>;

    async fn inner_text(&mut self, locator: &Locator) -> SuiteResult<String>;

    async fn input_value(&mut self, locator: &Locator) -> SuiteResult<String>;

    async fn get_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
    ) -> SuiteResult<Option<String>>;

    async fn wait_for(
        &mut self,
        locator: &Locator,
        state: WaitState,
        timeout_ms: u64,
    ) -> SuiteResult<()>;

    async fn is_enabled(&mut self, locator: &Locator) -> SuiteResult<bool>;

    async fn count(&mut self, locator: &Locator) -> SuiteResult<usize>;

    async fn set_input_files(&mut self, locator: &Locator, path: &Path) -> SuiteResult<()>;

    /// Run a script in page context, returning its JSON result.
    async fn evaluate(&mut self, script: &str) -> SuiteResult<Value>;

    /// Click `trigger` and wait for the download it starts to finish.
    async fn download_via(&mut self, trigger: &Locator) -> SuiteResult<()>;

    /// Full-page screenshot, PNG bytes.
    async fn screenshot(&mut self) -> SuiteResult<Vec<u8>>;
}
