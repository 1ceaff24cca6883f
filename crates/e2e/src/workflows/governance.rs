//! GOV family: governance bodies, roles and officer mapping.
//!
//! Every case logs in, opens the Governance screen and scopes it to the
//! row's country/state/district/city. File paths come straight from the
//! row data; a row may also name a `RolesAssignments` string of
//! `Role|Person` pairs for the mapping step.

use std::path::PathBuf;

use crate::error::{SuiteError, SuiteResult};
use crate::pages::governance::GovernancePage;

use super::{login_from_data, CaseContext};

pub async fn run(tc_id: &str, ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    login_from_data(ctx).await?;

    let ministry = data_path(ctx, "ministryfile");
    let roles = data_path(ctx, "rolesfile");
    let officers = data_path(ctx, "officersfile");
    let updated_ministry = data_path(ctx, "updatedministryfile");
    let assignments = ctx.data.get("rolesassignments").to_string();

    let mut page = GovernancePage::new(ctx.driver, ctx.config.default_timeout_ms);
    page.navigate().await?;
    page.select_location(
        ctx.data.get("country"),
        ctx.data.get("state"),
        ctx.data.get("district"),
        ctx.data.get("city"),
    )
    .await?;

    match tc_id {
        "GOV01" => {
            page.open_upload_wizard().await?;
            page.upload_step(&ministry).await
        }
        "GOV02" => {
            page.open_upload_wizard().await?;
            page.upload_step(&ministry).await?;
            page.upload_step(&roles).await
        }
        "GOV03" => {
            page.open_upload_wizard().await?;
            page.upload_step(&ministry).await?;
            page.upload_step(&roles).await?;
            if !officers.as_os_str().is_empty() {
                page.upload_step(&officers).await?;
            }
            Ok(())
        }
        "GOV04" => {
            page.open_upload_wizard().await?;
            page.upload_step(&ministry).await?;
            page.upload_step(&roles).await?;
            page.upload_step(&officers).await?;
            page.map_roles_to_personnel(&assignments).await
        }
        "GOV05" => page.update_body(&updated_ministry).await,
        "GOV06" => {
            page.update_body(&updated_ministry).await?;
            page.update_roles(&roles).await
        }
        "GOV07" => page.view().await,
        other => Err(SuiteError::UnknownCase(other.to_string())),
    }
}

/// Row-relative file paths resolve against the uploads directory;
/// absolute paths pass through.
fn data_path(ctx: &CaseContext<'_>, key: &str) -> PathBuf {
    let raw = ctx.data.get(key);
    if raw.is_empty() {
        return PathBuf::new();
    }
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        ctx.config.uploads_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::data::TestData;
    use crate::driver::mock::MockDriver;

    fn gov_data(extra: &str) -> TestData {
        TestData::parse(&format!(
            "email: gov@example.com, password: pw, country: India, state: Telangana, \
             district: Hyderabad, city: GHMC{extra}"
        ))
    }

    #[tokio::test]
    async fn gov01_scopes_location_then_uploads_the_ministry_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ministry.csv"), "a,b\n").unwrap();
        let config = SuiteConfig {
            uploads_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let data = gov_data(", MinistryFile: ministry.csv");
        let mut driver = MockDriver::new()
            .with_text("OTP:", "OTP: 1234")
            .allow_attach("#csv-upload");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("GOV01", &mut ctx).await.unwrap();
        assert_eq!(driver.attached, vec![dir.path().join("ministry.csv")]);
        assert!(driver
            .calls_for("click")
            .iter()
            .any(|l| l.contains("+ Upload Governance Data")));
    }

    #[tokio::test]
    async fn gov07_goes_through_apply_eye_close() {
        let config = SuiteConfig::default();
        let data = gov_data("");
        let mut driver = MockDriver::new().with_text("OTP:", "OTP: 1234");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("GOV07", &mut ctx).await.unwrap();
        let clicks = driver.calls_for("click");
        assert!(clicks.iter().any(|l| l.contains("Apply")));
        assert!(clicks.iter().any(|l| l.contains("primaryEyeIcon")));
        assert!(clicks.last().unwrap().contains("Close"));
    }

    #[test]
    fn relative_data_paths_resolve_under_the_uploads_dir() {
        let config = SuiteConfig {
            uploads_dir: PathBuf::from("/fixtures"),
            ..Default::default()
        };
        let data = TestData::parse("MinistryFile: governance/ministry.csv");
        let mut driver = MockDriver::new();
        let ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        assert_eq!(
            data_path(&ctx, "ministryfile"),
            PathBuf::from("/fixtures/governance/ministry.csv")
        );
        assert!(data_path(&ctx, "officersfile").as_os_str().is_empty());
    }
}
