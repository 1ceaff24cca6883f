//! Governance body screen: location scoping, governance-data uploads
//! and role-to-personnel mapping.

use std::path::Path;

use tracing::debug;

use crate::driver::{Driver, WaitState};
use crate::error::SuiteResult;
use crate::locator::Locator;
use crate::resolve::{attach_with_fallback, csv_upload_candidates};

pub struct GovernancePage<'d> {
    driver: &'d mut dyn Driver,
    timeout_ms: u64,
    btn_get_started: Locator,
    btn_governance: Locator,
    // Location comboboxes, excluding the table's rows-per-page control.
    comboboxes: Locator,
    btn_upload_data: Locator,
    btn_download: Locator,
    btn_next: Locator,
    btn_submit: Locator,
    btn_apply: Locator,
    btn_edit_icon: Locator,
    btn_view_icon: Locator,
    btn_close: Locator,
    // Autocomplete popup indicators: role at even index, person at odd.
    dropdowns: Locator,
    file_input: Locator,
}

impl<'d> GovernancePage<'d> {
    pub fn new(driver: &'d mut dyn Driver, timeout_ms: u64) -> Self {
        Self {
            driver,
            timeout_ms,
            btn_get_started: Locator::role("button", "Get Started"),
            btn_governance: Locator::role("button", "Governance"),
            comboboxes: Locator::css(
                "div[role='combobox']:not([aria-labelledby='rows-per-page-label'])",
            ),
            btn_upload_data: Locator::role("button", "+ Upload Governance Data"),
            btn_download: Locator::role("button", "Download"),
            btn_next: Locator::role("button", "Next"),
            btn_submit: Locator::role("button", "Submit"),
            btn_apply: Locator::role("button", "Apply"),
            btn_edit_icon: Locator::role("button", "primaryEditIcon").first(),
            btn_view_icon: Locator::role("button", "primaryEyeIcon").first(),
            btn_close: Locator::role("button", "Close"),
            dropdowns: Locator::css(".MuiAutocomplete-root .MuiAutocomplete-popupIndicator"),
            file_input: Locator::css("input[type='file']"),
        }
    }

    pub async fn navigate(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_get_started).await?;
        self.driver.click(&self.btn_governance).await
    }

    /// Scope the screen down to country/state/district/city.
    pub async fn select_location(
        &mut self,
        country: &str,
        state: &str,
        district: &str,
        city: &str,
    ) -> SuiteResult<()> {
        for (index, option) in [country, state, district, city].iter().enumerate() {
            self.driver
                .click(&self.comboboxes.clone().nth(index))
                .await?;
            self.driver
                .click(&Locator::role("option", option))
                .await?;
        }
        Ok(())
    }

    pub async fn open_upload_wizard(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_upload_data).await
    }

    /// One wizard step: download the template, feed the CSV back, Next.
    /// Ministry, roles and officers all go through this shape.
    pub async fn upload_step(&mut self, path: &Path) -> SuiteResult<()> {
        self.driver.download_via(&self.btn_download).await?;
        attach_with_fallback(self.driver, &csv_upload_candidates(), path).await?;
        self.driver.click(&self.btn_next).await
    }

    /// Map `Role|Person;Role|Person;...` pairs onto the autocomplete
    /// grid, then Next and Submit.
    pub async fn map_roles_to_personnel(&mut self, assignments: &str) -> SuiteResult<()> {
        let pairs = parse_role_assignments(assignments);
        if pairs.is_empty() {
            return Ok(());
        }
        for (idx, (role, person)) in pairs.iter().enumerate() {
            debug!("mapping {role} -> {person}");
            self.driver
                .click(&self.dropdowns.clone().nth(idx * 2))
                .await?;
            self.driver
                .click(&Locator::role("option", role).exact())
                .await?;
            self.driver
                .click(&self.dropdowns.clone().nth(idx * 2 + 1))
                .await?;
            self.driver
                .click(&Locator::role("option", person).exact())
                .await?;
        }
        self.driver.click(&self.btn_next).await?;
        self.driver.click(&self.btn_submit).await
    }

    /// Edit path: Apply the location filter, open the edit icon, swap
    /// in an updated ministry file.
    pub async fn update_body(&mut self, updated_ministry: &Path) -> SuiteResult<()> {
        self.driver.click(&self.btn_apply).await?;
        self.driver.click(&self.btn_edit_icon).await?;
        self.driver
            .set_input_files(&self.file_input, updated_ministry)
            .await?;
        self.driver.click(&self.btn_next).await
    }

    /// Continue the edit wizard with an updated roles file: three Next
    /// steps, then Submit once it shows up.
    pub async fn update_roles(&mut self, updated_roles: &Path) -> SuiteResult<()> {
        self.driver
            .set_input_files(&self.file_input, updated_roles)
            .await?;
        for _ in 0..3 {
            self.driver
                .wait_for(&self.btn_next, WaitState::Visible, self.timeout_ms)
                .await?;
            self.driver.click(&self.btn_next).await?;
        }
        self.driver
            .wait_for(&self.btn_submit, WaitState::Visible, 30_000)
            .await?;
        self.driver.click(&self.btn_submit).await
    }

    /// Apply, open the eye icon, Close.
    pub async fn view(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_apply).await?;
        self.driver.click(&self.btn_view_icon).await?;
        self.driver.click(&self.btn_close).await
    }
}

/// Split a `Role|Person;Role|Person` string into pairs. Entries
/// without a `|` are dropped, matching how the sheet is hand-written.
pub fn parse_role_assignments(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (role, person) = entry.split_once('|')?;
            Some((role.trim().to_string(), person.trim().to_string()))
        })
        .collect()
}
