//! Personnel section: staged add wizard, edit via search, view.

use crate::driver::{Driver, WaitState};
use crate::error::SuiteResult;
use crate::locator::Locator;

/// Details for the add-personnel form.
#[derive(Debug, Clone)]
pub struct PersonnelDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub emp_id: String,
    pub address: String,
}

pub struct PersonnelPage<'d> {
    driver: &'d mut dyn Driver,
    timeout_ms: u64,
    btn_get_started: Locator,
    btn_personnel: Locator,
    btn_add_personnel: Locator,
    dropdown_org_type: Locator,
    input_first_name: Locator,
    input_last_name: Locator,
    input_phone: Locator,
    input_email: Locator,
    input_emp_id: Locator,
    input_address: Locator,
    btn_next: Locator,
    btn_done: Locator,
    profile_admin: Locator,
    input_search: Locator,
    btn_edit_icon: Locator,
    edit_header: Locator,
    input_last_name_edit: Locator,
    btn_edit_submit: Locator,
    btn_view_icon: Locator,
    btn_close: Locator,
}

impl<'d> PersonnelPage<'d> {
    pub fn new(driver: &'d mut dyn Driver, timeout_ms: u64) -> Self {
        Self {
            driver,
            timeout_ms,
            btn_get_started: Locator::role("button", "Get Started"),
            btn_personnel: Locator::role("button", "Personnel"),
            btn_add_personnel: Locator::role("button", "+ Add Personnel"),
            // The org-type select renders with an empty label.
            dropdown_org_type: Locator::label(""),
            input_first_name: Locator::placeholder("Enter First Name"),
            input_last_name: Locator::placeholder("Enter Last Name"),
            input_phone: Locator::css("input[type='tel']"),
            input_email: Locator::role("textbox", "Enter Email"),
            input_emp_id: Locator::role("textbox", "Enter Emp-id"),
            input_address: Locator::role("textbox", "Enter Address"),
            btn_next: Locator::role("button", "Next"),
            btn_done: Locator::role("button", "Done"),
            profile_admin: Locator::text("ProfileAdministrator"),
            input_search: Locator::role("textbox", "Search Personnel"),
            btn_edit_icon: Locator::role("button", "primaryEditIcon"),
            edit_header: Locator::text("Edit PersonnelAuto Saved To"),
            input_last_name_edit: Locator::role_any("textbox").nth(1),
            btn_edit_submit: Locator::role("button", "Edit Personnel"),
            btn_view_icon: Locator::role("button", "primaryEyeIcon"),
            btn_close: Locator::role("button", "Close"),
        }
    }

    pub async fn open_add_wizard(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_get_started).await?;
        self.driver.click(&self.btn_personnel).await?;
        self.driver.click(&self.btn_add_personnel).await
    }

    pub async fn select_org_type(&mut self, org_type: &str) -> SuiteResult<()> {
        self.driver.click(&self.dropdown_org_type).await?;
        self.driver
            .click(&Locator::role("option", org_type))
            .await
    }

    /// Four-level location step, then Next.
    pub async fn select_location(
        &mut self,
        country: &str,
        state: &str,
        city: &str,
        area: &str,
    ) -> SuiteResult<()> {
        for (index, option) in [country, state, city, area].iter().enumerate() {
            self.driver
                .click(&Locator::role_any("combobox").nth(index))
                .await?;
            self.driver.click(&Locator::role("option", option)).await?;
        }
        self.driver.click(&self.btn_next).await
    }

    /// Details form, then Next, Next, Done.
    pub async fn fill_details(&mut self, details: &PersonnelDetails) -> SuiteResult<()> {
        self.driver
            .fill(&self.input_first_name, &details.first_name)
            .await?;
        self.driver
            .fill(&self.input_last_name, &details.last_name)
            .await?;
        self.driver.fill(&self.input_phone, &details.phone).await?;
        self.driver.fill(&self.input_email, &details.email).await?;
        self.driver.fill(&self.input_emp_id, &details.emp_id).await?;
        self.driver
            .fill(&self.input_address, &details.address)
            .await?;
        self.driver.click(&self.btn_next).await?;
        self.driver.click(&self.btn_next).await?;
        self.driver.click(&self.btn_done).await
    }

    /// Full add flow with the Governance organization type.
    pub async fn add_personnel(
        &mut self,
        details: &PersonnelDetails,
        location: (&str, &str, &str, &str),
    ) -> SuiteResult<()> {
        self.open_add_wizard().await?;
        self.select_org_type("Governance").await?;
        self.driver.click(&self.btn_next).await?;
        self.select_location(location.0, location.1, location.2, location.3)
            .await?;
        self.fill_details(details).await
    }

    /// Org-type variant flows stop after the location step.
    pub async fn start_with_org_type(
        &mut self,
        org_type: &str,
        location: (&str, &str, &str, &str),
    ) -> SuiteResult<()> {
        self.open_add_wizard().await?;
        self.select_org_type(org_type).await?;
        self.driver.click(&self.btn_next).await?;
        for (index, option) in [location.0, location.1, location.2, location.3]
            .iter()
            .enumerate()
        {
            self.driver
                .click(&Locator::role_any("combobox").nth(index))
                .await?;
            self.driver.click(&Locator::role("option", option)).await?;
        }
        Ok(())
    }

    /// Administrator path picking an institution to administer.
    pub async fn assign_institution_admin(&mut self, institution: &str) -> SuiteResult<()> {
        self.open_add_wizard().await?;
        self.select_org_type("Administrator").await?;
        self.driver.click(&self.profile_admin).await?;
        self.driver.click(&self.btn_next).await?;
        self.driver
            .click(&Locator::role_any("combobox"))
            .await?;
        self.driver
            .click(&Locator::role("option", institution))
            .await
    }

    pub async fn edit_personnel(&mut self, search: &str, new_last_name: &str) -> SuiteResult<()> {
        self.driver.click(&self.btn_get_started).await?;
        self.driver.click(&self.btn_personnel).await?;
        self.driver.click(&self.input_search).await?;
        self.driver.fill(&self.input_search, search).await?;
        self.driver.click(&self.btn_edit_icon).await?;
        self.driver
            .wait_for(&self.edit_header, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver.click(&self.input_last_name_edit).await?;
        self.driver
            .fill(&self.input_last_name_edit, new_last_name)
            .await?;
        self.driver.click(&self.btn_edit_submit).await
    }

    pub async fn view_personnel(&mut self, search: &str) -> SuiteResult<()> {
        self.driver.click(&self.btn_get_started).await?;
        self.driver.click(&self.btn_personnel).await?;
        self.driver.click(&self.input_search).await?;
        self.driver.fill(&self.input_search, search).await?;
        self.driver.click(&self.btn_view_icon).await?;
        self.driver.click(&self.btn_close).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;

    fn details() -> PersonnelDetails {
        PersonnelDetails {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            phone: "+919876543210".into(),
            email: "asha1724000000@example.com".into(),
            emp_id: "rao1724000000".into(),
            address: "12 Tank Bund Rd".into(),
        }
    }

    #[tokio::test]
    async fn add_walks_org_type_location_then_details() {
        let mut driver = MockDriver::new();
        PersonnelPage::new(&mut driver, 5_000)
            .add_personnel(&details(), ("India", "Telangana", "Hyderabad", "HyderabadCity"))
            .await
            .unwrap();

        let clicks = driver.calls_for("click");
        assert!(clicks[2].contains("+ Add Personnel"));
        assert!(clicks[4].contains("Governance"));
        assert!(clicks.last().unwrap().contains("Done"));

        let fills = driver.calls_for("fill");
        assert_eq!(fills.len(), 6);
        assert!(fills[2].contains("input[type='tel']"));
    }

    #[tokio::test]
    async fn edit_waits_for_the_autosave_header() {
        let mut driver = MockDriver::new();
        PersonnelPage::new(&mut driver, 5_000)
            .edit_personnel("Asha", "Reddy")
            .await
            .unwrap();
        assert_eq!(
            driver.calls_for("wait_for"),
            vec!["text=\"Edit PersonnelAuto Saved To\""]
        );
        assert!(driver
            .calls_for("click")
            .last()
            .unwrap()
            .contains("Edit Personnel"));
    }
}
