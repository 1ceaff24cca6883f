//! Party section: add with logo and location, edit via search, view.

use std::path::Path;

use crate::driver::Driver;
use crate::error::SuiteResult;
use crate::locator::Locator;

pub struct PartyPage<'d> {
    driver: &'d mut dyn Driver,
    btn_get_started: Locator,
    btn_party: Locator,
    btn_add_party: Locator,
    logo_input: Locator,
    input_name: Locator,
    input_code: Locator,
    btn_next: Locator,
    btn_back_to_home: Locator,
    input_search: Locator,
    btn_edit_icon: Locator,
    btn_edit_party: Locator,
    btn_apply: Locator,
    btn_view_icon: Locator,
    btn_close: Locator,
}

impl<'d> PartyPage<'d> {
    pub fn new(driver: &'d mut dyn Driver) -> Self {
        Self {
            driver,
            btn_get_started: Locator::role("button", "Get Started"),
            btn_party: Locator::role("button", "Party"),
            btn_add_party: Locator::role("button", "+ Add Party"),
            logo_input: Locator::css("input[type='file']"),
            // The add form labels neither textbox; position is stable.
            input_name: Locator::role_any("textbox").first(),
            input_code: Locator::role_any("textbox").nth(1),
            btn_next: Locator::role("button", "Next"),
            btn_back_to_home: Locator::role("button", "Back to Home"),
            input_search: Locator::role("textbox", "Search Party"),
            btn_edit_icon: Locator::role("button", "primaryEditIcon").first(),
            btn_edit_party: Locator::role("button", "Edit Party"),
            btn_apply: Locator::role("button", "Apply"),
            btn_view_icon: Locator::role("button", "primaryEyeIcon").first(),
            btn_close: Locator::role("button", "Close"),
        }
    }

    pub async fn navigate(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_get_started).await?;
        self.driver.click(&self.btn_party).await
    }

    /// Navigate and scope to a location, then Apply.
    pub async fn navigate_scoped(
        &mut self,
        country: &str,
        state: &str,
        district: &str,
    ) -> SuiteResult<()> {
        self.navigate().await?;
        for (index, option) in [country, state, district].iter().enumerate() {
            self.driver
                .click(&Locator::role_any("combobox").nth(index))
                .await?;
            self.driver.click(&Locator::role("option", option)).await?;
        }
        self.driver.click(&self.btn_apply).await
    }

    /// Full add flow: logo, name/code, three-level location, finish.
    pub async fn add_party(
        &mut self,
        logo: &Path,
        name: &str,
        code: &str,
        country: &str,
        state: &str,
        district: &str,
    ) -> SuiteResult<()> {
        self.driver.click(&self.btn_add_party).await?;
        self.driver.set_input_files(&self.logo_input, logo).await?;
        self.driver.fill(&self.input_name, name).await?;
        self.driver.fill(&self.input_code, code).await?;
        self.driver.click(&self.btn_next).await?;

        for (index, option) in [country, state, district].iter().enumerate() {
            self.driver
                .click(&Locator::role_any("combobox").nth(index))
                .await?;
            self.driver.click(&Locator::role("option", option)).await?;
        }

        self.driver.click(&self.btn_next).await?;
        self.driver.click(&self.btn_next).await?;
        self.driver.click(&self.btn_back_to_home).await
    }

    pub async fn edit_party(&mut self, search: &str, updated_name: &str) -> SuiteResult<()> {
        self.driver.click(&self.input_search).await?;
        self.driver.fill(&self.input_search, search).await?;
        self.driver.click(&self.btn_edit_icon).await?;
        self.driver.click(&self.input_name).await?;
        self.driver.press(&self.input_name, "ArrowRight").await?;
        self.driver.fill(&self.input_name, updated_name).await?;
        self.driver.click(&self.btn_edit_party).await
    }

    pub async fn view_party(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_view_icon).await?;
        self.driver.click(&self.btn_close).await
    }
}
