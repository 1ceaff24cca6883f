//! COUNTRY family: dashboard tabs and the Add Country wizard.
//!
//! Every case logs in and lands on the country dashboard first. The
//! wizard cases each start a fresh country and walk one step further
//! than the previous one, so the later ids replay the whole cascade of
//! CSV uploads before exercising their own step.

use std::path::PathBuf;

use crate::data::TestData;
use crate::error::{SuiteError, SuiteResult};
use crate::pages;
use crate::pages::country::CountryPage;
use crate::pages::login::LoginPage;
use crate::resolve::resolve_with_fallback;

use super::{or_default, CaseContext};

const EDIT_SUBMIT_TIMEOUT_MS: u64 = 60_000;

pub async fn run(tc_id: &str, ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    let fixtures = Fixtures::resolve_lazy(ctx);

    let url = ctx.config.page_url("login");
    let timeout = ctx.config.default_timeout_ms;
    pages::navigate(ctx.driver, &url, ctx.config.nav_retries).await?;
    let email = or_default(ctx.data.get("email"), "admin@email.com");
    let password = or_default(ctx.data.get("password"), "password");
    LoginPage::new(ctx.driver, timeout)
        .login(&email, &password)
        .await?;

    let mut page = CountryPage::new(ctx.driver, timeout);
    page.open_dashboard().await?;

    match tc_id {
        "COUNTRY02" => page.filter_active().await,
        "COUNTRY03" => page.filter_inactive().await,
        "COUNTRY04" => page.filter_draft().await,
        "COUNTRY05" => page.filter_archive().await,
        "COUNTRY07" => page.click_add_country().await,
        "COUNTRY08" => {
            let (name, code) = country_identity(ctx.data, "Sweden-24", "SWE");
            page.start_add_country(&name, &code).await
        }
        "COUNTRY09" => {
            let (name, code) = country_identity(ctx.data, "Romania-24", "ROM");
            page.start_add_country(&name, &code).await?;
            page.download_and_upload_csv(&fixtures.hierarchy()?).await?;
            page.next().await
        }
        "COUNTRY10" => {
            let (name, code) = country_identity(ctx.data, "Tajikistan-24", "TJK");
            page.start_add_country(&name, &code).await?;
            jurisdiction_cascade(&mut page, &fixtures).await
        }
        "COUNTRY11" => {
            let (name, code) = country_identity(ctx.data, "Thailand-24", "THA");
            page.start_add_country(&name, &code).await?;
            jurisdiction_cascade(&mut page, &fixtures).await?;

            page.attach_geofence(
                &format!("{name} Add GeoFence Draw on Map"),
                &format!("{name} JAMMU &"),
                &fixtures.state_geojson()?,
            )
            .await?;
            page.attach_geofence(
                &format!("AndhraPradesh {name}"),
                &format!("AndhraPradesh {name}"),
                &fixtures.state_kml()?,
            )
            .await?;
            page.attach_geofence(
                "NelloreCity Nellore Add",
                "NelloreCity Nellore AP.kml Re",
                &fixtures.city_kml()?,
            )
            .await?;
            page.next().await
        }
        "COUNTRY12" => {
            let (name, code) = country_identity(ctx.data, "Turkey-24", "TUR");
            page.start_add_country(&name, &code).await?;
            jurisdiction_cascade(&mut page, &fixtures).await?;
            geofence_then_media(&mut page, &name, &fixtures).await
        }
        "COUNTRY13" => {
            let (name, code) = country_identity(ctx.data, "Ukraine-24", "UKR");
            page.start_add_country(&name, &code).await?;
            jurisdiction_cascade(&mut page, &fixtures).await?;
            geofence_then_media(&mut page, &name, &fixtures).await?;
            page.submit_when_ready(timeout).await
        }
        "COUNTRY15" => {
            let row = or_default(ctx.data.get("row"), "ACTIVE India IND 08/08/");
            page.open_row_for_edit(&row).await
        }
        "COUNTRY16" => {
            let row = or_default(ctx.data.get("row"), "ACTIVE India IND 08/08/");
            page.open_row_for_edit(&row).await?;
            // Page through the edit wizard to the media step. The
            // geofence step renders two Next buttons; the second is live.
            page.next().await?;
            page.next().await?;
            page.next_nth(1).await?;
            page.next().await?;
            page.replace_edit_images(&fixtures.image(2)?, &fixtures.image(0)?)
                .await?;
            page.next().await?;
            page.submit_when_ready(EDIT_SUBMIT_TIMEOUT_MS).await
        }
        "COUNTRY17" => {
            let row = or_default(ctx.data.get("row"), "DRAFT Belgium BEL 05/09/");
            page.view_draft(&row).await
        }
        other => Err(SuiteError::UnknownCase(other.to_string())),
    }
}

/// Hierarchy, state, district and city uploads, each behind the step's
/// own flavour of the Next button.
async fn jurisdiction_cascade(
    page: &mut CountryPage<'_>,
    fixtures: &Fixtures,
) -> SuiteResult<()> {
    page.download_and_upload_csv(&fixtures.hierarchy()?).await?;
    page.next().await?;
    page.download_and_upload_csv(&fixtures.state()?).await?;
    page.next_in_div().await?;
    page.download_and_upload_csv(&fixtures.district()?).await?;
    page.next_first().await?;
    page.download_and_upload_csv(&fixtures.city()?).await?;
    page.next_first().await
}

async fn geofence_then_media(
    page: &mut CountryPage<'_>,
    name: &str,
    fixtures: &Fixtures,
) -> SuiteResult<()> {
    page.attach_geofence(
        &format!("{name} Add GeoFence Draw on Map"),
        &format!("{name} india_district."),
        &fixtures.district_geojson()?,
    )
    .await?;
    page.next().await?;
    page.upload_media(&fixtures.images()?, &fixtures.video()?)
        .await?;
    page.next().await
}

fn country_identity(data: &TestData, name: &str, code: &str) -> (String, String) {
    (
        or_default(data.get("country"), name),
        or_default(data.get("code"), code),
    )
}

/// Upload fixtures rooted at the configured uploads directory. Each
/// accessor resolves on demand so a case only requires the files its
/// steps feed in.
struct Fixtures {
    uploads_dir: PathBuf,
    data_file: PathBuf,
}

impl Fixtures {
    fn resolve_lazy(ctx: &CaseContext<'_>) -> Self {
        Self {
            uploads_dir: ctx.config.uploads_dir.clone(),
            data_file: ctx.config.data_file.clone(),
        }
    }

    fn named(&self, name: &str, fallbacks: &[PathBuf]) -> SuiteResult<PathBuf> {
        resolve_with_fallback(&self.uploads_dir.join(name), fallbacks)
    }

    fn hierarchy(&self) -> SuiteResult<PathBuf> {
        // The hierarchy template is also shipped next to the data file.
        self.named("hierarchy.csv", &[self.data_file.clone()])
    }

    fn state(&self) -> SuiteResult<PathBuf> {
        self.named("state.csv", &[])
    }

    fn district(&self) -> SuiteResult<PathBuf> {
        self.named("district.csv", &[])
    }

    fn city(&self) -> SuiteResult<PathBuf> {
        self.named("city.csv", &[])
    }

    fn state_geojson(&self) -> SuiteResult<PathBuf> {
        self.named("state.geojson", &[])
    }

    fn district_geojson(&self) -> SuiteResult<PathBuf> {
        self.named("district.geojson", &[])
    }

    fn state_kml(&self) -> SuiteResult<PathBuf> {
        self.named("state.kml", &[])
    }

    fn city_kml(&self) -> SuiteResult<PathBuf> {
        self.named("city.kml", &[])
    }

    fn images(&self) -> SuiteResult<Vec<PathBuf>> {
        ["party_symbol.png", "municipal_logo.png", "police_logo.png"]
            .iter()
            .map(|name| self.named(name, &[]))
            .collect()
    }

    fn image(&self, index: usize) -> SuiteResult<PathBuf> {
        let images = self.images()?;
        Ok(images[index % images.len()].clone())
    }

    fn video(&self) -> SuiteResult<PathBuf> {
        self.named("walkthrough.mp4", &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::data::TestData;
    use crate::driver::mock::MockDriver;

    fn config_with_uploads(dir: &std::path::Path) -> SuiteConfig {
        SuiteConfig {
            uploads_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn country02_logs_in_then_clicks_the_active_tab() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_uploads(dir.path());
        let data = TestData::default();
        let mut driver = MockDriver::new().with_text("OTP:", "OTP: 1234");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("COUNTRY02", &mut ctx).await.unwrap();
        assert!(driver
            .calls_for("click")
            .iter()
            .any(|l| l.contains("^Active")));
    }

    #[tokio::test]
    async fn country09_uploads_the_hierarchy_then_advances() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hierarchy.csv"), "a,b\n").unwrap();
        let config = config_with_uploads(dir.path());
        let data = TestData::default();
        let mut driver = MockDriver::new()
            .with_text("OTP:", "OTP: 1234")
            .allow_attach("#csv-upload");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("COUNTRY09", &mut ctx).await.unwrap();
        assert_eq!(driver.calls_for("download_via").len(), 1);
        assert_eq!(driver.attached, vec![dir.path().join("hierarchy.csv")]);
    }

    #[tokio::test]
    async fn country10_runs_all_four_csv_steps() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["hierarchy.csv", "state.csv", "district.csv", "city.csv"] {
            std::fs::write(dir.path().join(name), "a,b\n").unwrap();
        }
        let config = config_with_uploads(dir.path());
        let data = TestData::default();
        let mut driver = MockDriver::new()
            .with_text("OTP:", "OTP: 1234")
            .allow_attach("#csv-upload");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("COUNTRY10", &mut ctx).await.unwrap();
        assert_eq!(driver.calls_for("download_via").len(), 4);
        assert_eq!(driver.calls_for("set_input_files").len(), 4);
    }

    #[test]
    fn country_identity_prefers_row_values_over_defaults() {
        let data = TestData::parse("Country: Norway-24, Code: NOR");
        assert_eq!(
            country_identity(&data, "Sweden-24", "SWE"),
            ("Norway-24".to_string(), "NOR".to_string())
        );
        assert_eq!(
            country_identity(&TestData::default(), "Sweden-24", "SWE"),
            ("Sweden-24".to_string(), "SWE".to_string())
        );
    }

    #[tokio::test]
    async fn missing_fixture_fails_with_the_candidate_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_uploads(dir.path());
        let data = TestData::default();
        let mut driver = MockDriver::new().with_text("OTP:", "OTP: 1234");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        let err = run("COUNTRY09", &mut ctx).await.unwrap_err();
        assert!(matches!(err, SuiteError::UploadSourceNotFound { .. }));
    }
}
