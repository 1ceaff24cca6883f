//! Page objects, one module per screen of the console.
//!
//! Each page struct borrows the driver for its lifetime and exposes the
//! screen's actions under their UI names. Locators are built once in
//! the constructor so a renamed control is a one-line fix.

pub mod country;
pub mod forgot_password;
pub mod governance;
pub mod login;
pub mod party;
pub mod personnel;

use std::time::Duration;

use tracing::warn;

use crate::driver::Driver;
use crate::error::{SuiteError, SuiteResult};
use crate::locator::Locator;

const ENABLED_POLL_MS: u64 = 250;

/// Navigate with bounded retries and a 2 second backoff.
pub async fn navigate(driver: &mut dyn Driver, url: &str, retries: usize) -> SuiteResult<()> {
    let mut last = String::new();
    for attempt in 1..=retries {
        match driver.goto(url).await {
            Ok(()) => return Ok(()),
            Err(err) => {
                warn!("navigation to {url} failed ({attempt}/{retries}): {err}");
                last = err.to_string();
            }
        }
        if attempt < retries {
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }
    Err(SuiteError::Navigation {
        url: url.to_string(),
        attempts: retries,
        last,
    })
}

/// Poll until the element reports enabled.
pub async fn wait_enabled(
    driver: &mut dyn Driver,
    locator: &Locator,
    timeout_ms: u64,
) -> SuiteResult<()> {
    let polls = (timeout_ms / ENABLED_POLL_MS).max(1);
    for _ in 0..polls {
        if driver.is_enabled(locator).await? {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(ENABLED_POLL_MS)).await;
    }
    Err(SuiteError::Interaction {
        action: "wait_enabled",
        locator: locator.to_string(),
        reason: format!("still disabled after {timeout_ms} ms"),
    })
}

/// Wait for the element to be enabled, then click it.
pub async fn click_when_enabled(
    driver: &mut dyn Driver,
    locator: &Locator,
    timeout_ms: u64,
) -> SuiteResult<()> {
    wait_enabled(driver, locator, timeout_ms).await?;
    driver.click(locator).await
}

/// Pick an option from the Material combobox at `index`.
pub async fn select_combobox(
    driver: &mut dyn Driver,
    index: usize,
    option: &str,
) -> SuiteResult<()> {
    driver.click(&Locator::role_any("combobox").nth(index)).await?;
    driver.click(&Locator::role("option", option)).await
}

/// Find a table row by name, paging forward up to `max_pages` times.
pub async fn find_row(
    driver: &mut dyn Driver,
    name: &str,
    max_pages: usize,
) -> SuiteResult<Locator> {
    let row = Locator::role("row", name).first();
    let next_page = Locator::role("button", "Go to next page");
    for _ in 0..max_pages {
        if driver.count(&row).await? > 0 {
            return Ok(row);
        }
        if !driver.is_enabled(&next_page).await? {
            break;
        }
        driver.click(&next_page).await?;
    }
    Err(SuiteError::Assertion(format!(
        "row {name:?} not found within {max_pages} page(s)"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;

    #[tokio::test(start_paused = true)]
    async fn navigate_surfaces_last_error_after_bounded_retries() {
        let mut driver = MockDriver::new().fail("goto", "http://down.local");
        let err = navigate(&mut driver, "http://down.local/login", 3)
            .await
            .unwrap_err();
        match err {
            SuiteError::Navigation { attempts, url, .. } => {
                assert_eq!(attempts, 3);
                assert_eq!(url, "http://down.local/login");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(driver.calls_for("goto").len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_enabled_times_out_on_disabled_element() {
        let mut driver = MockDriver::new();
        driver.disabled.push("Next".to_string());
        let err = wait_enabled(&mut driver, &Locator::role("button", "Next"), 1_000)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("still disabled"));
    }

    #[tokio::test]
    async fn find_row_pages_forward_until_match() {
        let mut driver = MockDriver::new();
        // Row absent on the first page, present after one page turn.
        driver.counts.insert("role=row".to_string(), 0);
        let err = find_row(&mut driver, "Sweden-24", 2).await.unwrap_err();
        assert!(matches!(err, SuiteError::Assertion(_)));
        assert_eq!(driver.calls_for("click").len(), 2);
    }
}
