//! Country dashboard and the Add Country wizard.
//!
//! The wizard walks name/code, cascading CSV uploads (hierarchy, state,
//! district, city), geofence attachments, media and a summary Submit.
//! The Next button is rendered differently on some steps, so the three
//! variants the UI needs are exposed separately; workflows choose which
//! one each step takes.

use std::path::Path;

use crate::driver::{Driver, WaitState};
use crate::error::SuiteResult;
use crate::locator::Locator;
use crate::resolve::{attach_with_fallback, csv_upload_candidates};

use super::find_row;

pub struct CountryPage<'d> {
    driver: &'d mut dyn Driver,
    timeout_ms: u64,
    btn_get_started: Locator,
    btn_active: Locator,
    btn_inactive: Locator,
    btn_draft: Locator,
    btn_archive: Locator,
    btn_add_country: Locator,
    input_name: Locator,
    input_code: Locator,
    btn_next: Locator,
    btn_download: Locator,
    btn_submit: Locator,
    btn_view: Locator,
    btn_close: Locator,
    media_panel_icon: Locator,
    image_inputs: Locator,
    video_inputs: Locator,
    last_file_input: Locator,
}

impl<'d> CountryPage<'d> {
    pub fn new(driver: &'d mut dyn Driver, timeout_ms: u64) -> Self {
        Self {
            driver,
            timeout_ms,
            btn_get_started: Locator::role("button", "Get Started"),
            // Tab labels carry counts, so match on the prefix.
            btn_active: Locator::role_matching("button", "^Active"),
            btn_inactive: Locator::role_matching("button", "^In-?Active"),
            btn_draft: Locator::role_matching("button", "^Draft"),
            btn_archive: Locator::role_matching("button", "^Archive"),
            btn_add_country: Locator::role("button", "+ Add Country"),
            input_name: Locator::role("textbox", "Enter Country Name"),
            input_code: Locator::role("textbox", "Enter Country Code"),
            btn_next: Locator::role("button", "Next"),
            btn_download: Locator::role("button", "Download"),
            btn_submit: Locator::role("button", "Submit"),
            btn_view: Locator::role("button", "View"),
            btn_close: Locator::role("button", "Close"),
            media_panel_icon: Locator::css(".MuiSvgIcon-root.MuiSvgIcon-fontSizeLarge").first(),
            image_inputs: Locator::css("input[type='file'][accept*='image']"),
            video_inputs: Locator::css("input[type='file'][accept*='video']"),
            last_file_input: Locator::css("input[type='file']").last(),
        }
    }

    /// Land on the country dashboard from the post-login home.
    pub async fn open_dashboard(&mut self) -> SuiteResult<()> {
        if self.driver.count(&self.btn_get_started).await? > 0 {
            self.driver.click(&self.btn_get_started).await?;
        }
        self.driver
            .wait_for(&self.btn_active, WaitState::Visible, self.timeout_ms)
            .await
    }

    pub async fn filter_active(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_active).await
    }

    pub async fn filter_inactive(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_inactive).await
    }

    pub async fn filter_draft(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_draft).await
    }

    pub async fn filter_archive(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_archive).await
    }

    pub async fn click_add_country(&mut self) -> SuiteResult<()> {
        self.driver
            .wait_for(&self.btn_add_country, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver.click(&self.btn_add_country).await
    }

    /// Open the wizard and complete the name/code step.
    pub async fn start_add_country(&mut self, name: &str, code: &str) -> SuiteResult<()> {
        self.click_add_country().await?;
        self.driver
            .wait_for(&self.input_name, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver.fill(&self.input_name, name).await?;
        self.driver.fill(&self.input_code, code).await?;
        self.next().await
    }

    /// Download the step's template, then feed the CSV back in.
    pub async fn download_and_upload_csv(&mut self, path: &Path) -> SuiteResult<()> {
        self.driver.download_via(&self.btn_download).await?;
        attach_with_fallback(self.driver, &csv_upload_candidates(), path).await
    }

    pub async fn next(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_next).await
    }

    /// The state step wraps its Next in a bare div.
    pub async fn next_in_div(&mut self) -> SuiteResult<()> {
        let wrapped = Locator::css("div")
            .has_text("Next")
            .within(Locator::role_any("button"));
        self.driver.click(&wrapped).await
    }

    /// Later steps render a second disabled Next; take the first.
    pub async fn next_first(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_next.clone().first()).await
    }

    /// The edit wizard's geofence step needs the second Next.
    pub async fn next_nth(&mut self, index: usize) -> SuiteResult<()> {
        self.driver.click(&self.btn_next.clone().nth(index)).await
    }

    /// Attach a geofence file on the row named `start_row`, confirm on
    /// the renamed `done_row`, then open View and Close it.
    pub async fn attach_geofence(
        &mut self,
        start_row: &str,
        done_row: &str,
        path: &Path,
    ) -> SuiteResult<()> {
        let open_btn = Locator::role("row", start_row)
            .within(Locator::role_any("button"))
            .first();
        self.driver.click(&open_btn).await?;

        self.driver
            .wait_for(&self.last_file_input, WaitState::Attached, self.timeout_ms)
            .await?;
        self.driver
            .set_input_files(&self.last_file_input, path)
            .await?;

        let confirm_btn = Locator::role("row", done_row).within(Locator::role_any("button").nth(2));
        self.driver.click(&confirm_btn).await?;
        self.driver.click(&self.btn_view).await?;
        self.driver.click(&self.btn_close).await
    }

    /// Fill every image input, cycling through the fixture list, then
    /// every video input with the one video fixture.
    pub async fn upload_media(
        &mut self,
        images: &[std::path::PathBuf],
        video: &Path,
    ) -> SuiteResult<()> {
        self.driver.click(&self.media_panel_icon).await?;

        let image_count = self.driver.count(&self.image_inputs).await?;
        for i in 0..image_count {
            let input = self.image_inputs.clone().nth(i);
            self.driver
                .set_input_files(&input, &images[i % images.len()])
                .await?;
        }

        let video_count = self.driver.count(&self.video_inputs).await?;
        for i in 0..video_count {
            let input = self.video_inputs.clone().nth(i);
            self.driver.set_input_files(&input, video).await?;
        }
        Ok(())
    }

    /// Submit can stay disabled for a while after media processing.
    pub async fn submit_when_ready(&mut self, timeout_ms: u64) -> SuiteResult<()> {
        self.driver
            .wait_for(&self.btn_submit, WaitState::Visible, timeout_ms)
            .await?;
        super::click_when_enabled(self.driver, &self.btn_submit, timeout_ms).await
    }

    /// Open the edit wizard for a dashboard row, paging to find it.
    pub async fn open_row_for_edit(&mut self, row_name: &str) -> SuiteResult<()> {
        let row = find_row(self.driver, row_name, 10).await?;
        self.driver
            .click(&row.within(Locator::role_any("button").nth(1)))
            .await
    }

    /// Replace the two country-level images in the edit media step.
    pub async fn replace_edit_images(&mut self, first: &Path, second: &Path) -> SuiteResult<()> {
        self.driver
            .set_input_files(&self.image_inputs.clone().nth(0), first)
            .await?;
        self.driver
            .set_input_files(&self.image_inputs.clone().nth(1), second)
            .await
    }

    /// Open a draft row in view mode.
    pub async fn view_draft(&mut self, row_name: &str) -> SuiteResult<()> {
        let row = Locator::role("row", row_name);
        self.driver
            .wait_for(&row, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver
            .click(&row.within(Locator::role_any("button")).first())
            .await?;
        if self.driver.count(&self.btn_view).await? > 0 {
            self.driver.click(&self.btn_view).await?;
        }
        Ok(())
    }
}
