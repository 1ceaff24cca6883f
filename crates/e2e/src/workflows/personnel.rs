//! PERS family: the staged Add Personnel wizard, edit and view.
//!
//! Contact details are generated per run so repeated executions never
//! collide on the console's uniqueness checks; only the names and the
//! address come from the row data.

use crate::error::{SuiteError, SuiteResult};
use crate::pages::personnel::{PersonnelDetails, PersonnelPage};

use super::{
    generated_email, generated_emp_id, generated_phone, login_from_data, or_default, CaseContext,
};

const DEFAULT_LOCATION: (&str, &str, &str, &str) =
    ("India", "Telangana", "Hyderabad", "HyderabadCity");

pub async fn run(tc_id: &str, ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    login_from_data(ctx).await?;

    let first_name = ctx.data.get("firstname").to_string();
    let last_name = ctx.data.get("lastname").to_string();
    let address = ctx.data.get("address").to_string();
    let org_type = or_default(ctx.data.get("profiletype"), "Governance");
    let institution = ctx.data.get("institution").to_string();
    let search_name = ctx.data.get("search_name").to_string();
    let updated_last_name = or_default(ctx.data.get("name"), "Updated Name");

    let mut page = PersonnelPage::new(ctx.driver, ctx.config.default_timeout_ms);
    match tc_id {
        "PERS02" => {
            let details = PersonnelDetails {
                phone: generated_phone(),
                email: generated_email(&first_name),
                emp_id: generated_emp_id(&last_name),
                first_name,
                last_name,
                address,
            };
            page.add_personnel(&details, DEFAULT_LOCATION).await
        }
        "PERS03" => {
            page.open_add_wizard().await?;
            page.select_org_type(&org_type).await
        }
        "PERS04" => page.start_with_org_type(&org_type, DEFAULT_LOCATION).await,
        "PERS05" => page.assign_institution_admin(&institution).await,
        "PERS06" => page.edit_personnel(&search_name, &updated_last_name).await,
        "PERS07" => page.view_personnel(&search_name).await,
        other => Err(SuiteError::UnknownCase(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::data::TestData;
    use crate::driver::mock::MockDriver;

    #[tokio::test]
    async fn pers02_generates_contact_details_from_the_names() {
        let config = SuiteConfig::default();
        let data = TestData::parse(
            "Email: a@b.com, password: pw, firstname: Asha, lastname: Rao, address: 12 Tank Bund Rd",
        );
        let mut driver = MockDriver::new().with_text("OTP:", "OTP: 1234");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("PERS02", &mut ctx).await.unwrap();
        let fills = driver.calls_for("fill");
        // Email, password, four code boxes, six detail fields.
        assert_eq!(fills.len(), 12);
        let details: Vec<_> = fills
            .iter()
            .filter(|l| !l.contains("maxlength='1'"))
            .collect();
        assert_eq!(details.len(), 8);
        assert!(driver.calls_for("click").last().unwrap().contains("Done"));
    }

    #[tokio::test]
    async fn pers03_stops_after_the_org_type_selection() {
        let config = SuiteConfig::default();
        let data = TestData::parse("Email: a@b.com, password: pw, profileType: Administrator");
        let mut driver = MockDriver::new().with_text("OTP:", "OTP: 1234");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("PERS03", &mut ctx).await.unwrap();
        assert!(driver
            .calls_for("click")
            .last()
            .unwrap()
            .contains("Administrator"));
    }

    #[tokio::test]
    async fn unknown_pers_id_is_rejected() {
        let config = SuiteConfig::default();
        let data = TestData::parse("Email: a@b.com, password: pw");
        let mut driver = MockDriver::new().with_text("OTP:", "OTP: 1234");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        let err = run("PERS99", &mut ctx).await.unwrap_err();
        assert!(matches!(err, SuiteError::UnknownCase(_)));
    }
}
