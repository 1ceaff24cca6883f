//! AUTH family: login attempts and the login-screen chrome.
//!
//! `AUTH01..06` drive the full login with per-row credentials; the row
//! data decides whether the attempt should get through, the workflow
//! just reports what happened. `AUTH07..09` cover the tab, the Forgot
//! Password entry point and the password visibility toggle.

use crate::error::{SuiteError, SuiteResult};
use crate::pages;
use crate::pages::login::LoginPage;

use super::{login_from_data, CaseContext};

pub async fn run(tc_id: &str, ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    match tc_id {
        "AUTH01" | "AUTH02" | "AUTH03" | "AUTH04" | "AUTH05" | "AUTH06" => {
            login_from_data(ctx).await
        }
        "AUTH07" => {
            navigate_login(ctx).await?;
            LoginPage::new(ctx.driver, ctx.config.default_timeout_ms)
                .open_login_tab()
                .await
        }
        "AUTH08" => {
            navigate_login(ctx).await?;
            let mut page = LoginPage::new(ctx.driver, ctx.config.default_timeout_ms);
            page.open_login_tab().await?;
            page.open_forgot_password().await
        }
        "AUTH09" => {
            navigate_login(ctx).await?;
            let password = ctx.data.get("password").to_string();
            LoginPage::new(ctx.driver, ctx.config.default_timeout_ms)
                .toggle_password_visibility(&password)
                .await
        }
        other => Err(SuiteError::UnknownCase(other.to_string())),
    }
}

async fn navigate_login(ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    let url = ctx.config.page_url("login");
    pages::navigate(ctx.driver, &url, ctx.config.nav_retries).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::data::TestData;
    use crate::driver::mock::MockDriver;

    #[tokio::test]
    async fn auth01_uses_credentials_from_the_row() {
        let mut driver = MockDriver::new().with_text("OTP:", "OTP: 1234");
        let config = SuiteConfig::default();
        let data = TestData::parse("Email: a@b.com Password: secret");
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("AUTH01", &mut ctx).await.unwrap();
        assert!(driver.calls_for("goto")[0].ends_with("/login"));
        assert!(driver
            .calls_for("click")
            .iter()
            .any(|l| l.contains("Log-in")));
    }

    #[tokio::test]
    async fn unknown_auth_id_is_rejected() {
        let mut driver = MockDriver::new();
        let config = SuiteConfig::default();
        let data = TestData::default();
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        let err = run("AUTH99", &mut ctx).await.unwrap_err();
        assert!(matches!(err, SuiteError::UnknownCase(id) if id == "AUTH99"));
    }
}
