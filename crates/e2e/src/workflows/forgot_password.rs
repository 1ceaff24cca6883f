//! FPASS family: the Forgot Password modal end to end.
//!
//! The modal has three tabs (recovery input, OTP, new password) plus the
//! dismissal affordances. Cases `FPASS01..09` cover the first tab,
//! `10..16` the OTP tab, `17..26` the password tab, and `27..28` the
//! ways the modal refuses to close.

use std::time::Duration;

use crate::error::{SuiteError, SuiteResult};
use crate::pages;
use crate::pages::forgot_password::ForgotPasswordPage;

use super::CaseContext;

const OTP_BOX_COUNT: usize = 4;
const RESEND_COUNTDOWN_SECS: u64 = 20;

pub async fn run(tc_id: &str, ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    let mobile = unquoted(ctx.data.get("mobile")).to_string();
    let email = unquoted(ctx.data.get("email")).to_string();
    let masked_email = ctx.data.get("masked_email").to_string();
    let otp = ctx.data.get("otp").to_string();
    let password = unquoted(ctx.data.get("password")).to_string();
    let confirm = unquoted(ctx.data.get("confirmpassword")).to_string();

    let mut page = open_modal(ctx).await?;

    match tc_id {
        "FPASS01" => Ok(()),
        "FPASS02" => page.is_heading_visible().await.map(|_| ()),
        "FPASS03" => {
            page.is_mobile_input_visible().await?;
            page.is_email_input_visible().await?;
            page.is_or_separator_visible().await.map(|_| ())
        }
        "FPASS04" => {
            page.enter_mobile(&mobile).await?;
            page.click_next().await
        }
        "FPASS05" => {
            page.enter_email(&email).await?;
            page.click_next().await
        }
        "FPASS06" => {
            if !mobile.is_empty() {
                page.enter_mobile(&mobile).await?;
            }
            if !email.is_empty() {
                page.enter_email(&email).await?;
            }
            page.click_next().await
        }
        "FPASS07" => {
            page.enter_mobile(&mobile).await?;
            page.enter_email(&email).await?;
            if page.is_next_disabled().await? {
                Ok(())
            } else {
                Err(SuiteError::Assertion(
                    "Next enabled without recovery input".to_string(),
                ))
            }
        }
        "FPASS08" => {
            if !mobile.is_empty() {
                page.enter_mobile(&mobile).await?;
            }
            if !email.is_empty() {
                page.enter_email(&email).await?;
            }
            page.click_next().await?;
            expect_otp_boxes(&mut page).await
        }
        "FPASS09" => {
            page.enter_email(&email).await?;
            page.click_next().await?;
            page.is_masked_otp_message_visible(&masked_email)
                .await
                .map(|_| ())
        }
        "FPASS10" => {
            to_otp_tab(&mut page, &email).await?;
            for (i, ch) in otp.chars().enumerate() {
                page.clear_otp_box(i).await?;
                page.type_otp_char(i, &ch.to_string()).await?;
            }
            for i in 0..otp.chars().count() {
                let entered = page.otp_box_value(i).await?;
                if !entered.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(SuiteError::Assertion(format!(
                        "OTP box {} accepted non-alphanumeric input {entered:?}",
                        i + 1
                    )));
                }
            }
            Ok(())
        }
        "FPASS11" => {
            to_otp_tab(&mut page, &email).await?;
            let digits: Vec<char> = otp.chars().collect();
            for i in 0..digits.len() {
                page.clear_otp_box(i).await?;
            }
            for (i, ch) in digits.iter().enumerate() {
                page.type_otp_char(i, &ch.to_string()).await?;
                let entered = page.otp_box_value(i).await?;
                if !entered.eq_ignore_ascii_case(&ch.to_string()) {
                    return Err(SuiteError::Assertion(format!(
                        "OTP box {} holds {entered:?}, typed {ch:?}",
                        i + 1
                    )));
                }
                if i + 1 < digits.len() {
                    let focused = page.focused_otp_index().await?;
                    if focused != (i + 1) as i64 {
                        return Err(SuiteError::Assertion(format!(
                            "focus stayed on box {} instead of advancing",
                            i + 1
                        )));
                    }
                }
            }
            Ok(())
        }
        "FPASS12" => {
            to_otp_tab(&mut page, &email).await?;
            let digits: Vec<char> = otp.chars().collect();
            for i in 0..digits.len() {
                page.type_otp_digit(i, "").await?;
            }
            for (i, ch) in digits.iter().enumerate() {
                page.type_otp_char(i, &ch.to_string()).await?;
            }
            for i in (1..digits.len()).rev() {
                page.clear_otp_box(i).await?;
                page.press_otp_key(i, "Backspace").await?;
                let focused = page.focused_otp_index().await?;
                if focused != (i - 1) as i64 {
                    return Err(SuiteError::Assertion(format!(
                        "Backspace on box {} left focus at {focused}",
                        i + 1
                    )));
                }
            }
            Ok(())
        }
        "FPASS13" => {
            to_otp_tab(&mut page, &email).await?;
            for i in 0..OTP_BOX_COUNT {
                page.clear_otp_box(i).await?;
            }
            let digits: Vec<char> = otp.chars().collect();
            for i in 0..OTP_BOX_COUNT - 1 {
                if let Some(ch) = digits.get(i) {
                    page.type_otp_char(i, &ch.to_string()).await?;
                }
            }
            if page.is_next_disabled().await? {
                Ok(())
            } else {
                Err(SuiteError::Assertion(
                    "Next enabled with an incomplete OTP".to_string(),
                ))
            }
        }
        "FPASS14" => {
            to_otp_tab(&mut page, &email).await?;
            for second in 0..RESEND_COUNTDOWN_SECS {
                if page.is_resend_enabled().await? {
                    return Err(SuiteError::Assertion(format!(
                        "Resend OTP enabled after {second} s, before the countdown ended"
                    )));
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Ok(())
        }
        "FPASS15" => {
            to_otp_tab(&mut page, &email).await?;
            page.wait_resend_enabled((RESEND_COUNTDOWN_SECS + 5) * 1_000)
                .await
        }
        "FPASS16" | "FPASS23" => {
            to_password_tab(&mut page, &email).await?;
            page.click_back().await?;
            expect_otp_boxes(&mut page).await
        }
        "FPASS17" => {
            to_password_tab(&mut page, &email).await?;
            page.is_new_password_tab_visible().await.map(|_| ())
        }
        "FPASS18" => {
            to_password_tab(&mut page, &email).await?;
            page.enter_new_password(&password).await?;
            page.toggle_visibility_icon().await?;
            expect_input_type(page.new_password_input_type().await?, "text", "new password")
        }
        "FPASS19" => {
            to_password_tab(&mut page, &email).await?;
            page.enter_new_password(&password).await?;
            page.enter_confirm_password(&confirm).await?;
            let entered = page.confirm_password_value().await?;
            if entered == confirm {
                Ok(())
            } else {
                Err(SuiteError::Assertion(format!(
                    "confirm password holds {entered:?}, entered {confirm:?}"
                )))
            }
        }
        "FPASS20" => {
            to_password_tab(&mut page, &email).await?;
            page.enter_new_password(&password).await?;
            page.enter_confirm_password(&confirm).await?;
            if page.is_register_enabled().await? {
                Err(SuiteError::Assertion(
                    "Register enabled with mismatched passwords".to_string(),
                ))
            } else {
                Ok(())
            }
        }
        "FPASS21" => {
            to_password_tab(&mut page, &email).await?;
            page.enter_new_password(&password).await?;
            page.enter_confirm_password(&password).await?;
            page.toggle_new_password_eye().await?;
            page.toggle_confirm_password_eye().await?;
            expect_input_type(page.new_password_input_type().await?, "text", "new password")?;
            expect_input_type(
                page.confirm_password_input_type().await?,
                "text",
                "confirm password",
            )
        }
        "FPASS22" => {
            to_password_tab(&mut page, &email).await?;
            page.enter_new_password("").await?;
            page.enter_confirm_password("").await?;
            if !password.is_empty() {
                page.enter_new_password(&password).await?;
            }
            if !confirm.is_empty() {
                page.enter_confirm_password(&confirm).await?;
            }
            if page.is_register_enabled().await? {
                Err(SuiteError::Assertion(
                    "Register enabled with empty passwords".to_string(),
                ))
            } else {
                Ok(())
            }
        }
        "FPASS24" => page.click_cross().await,
        "FPASS25" | "FPASS26" => {
            to_password_tab(&mut page, &email).await?;
            page.enter_new_password(&password).await?;
            page.enter_confirm_password(&password).await?;
            page.click_register().await?;
            if tc_id == "FPASS26" {
                page.click_back_to_home().await?;
            }
            Ok(())
        }
        "FPASS27" => {
            page.press_escape().await?;
            tokio::time::sleep(Duration::from_secs(2)).await;
            page.is_heading_visible().await.map(|_| ())
        }
        "FPASS28" => {
            page.click_backdrop().await?;
            tokio::time::sleep(Duration::from_secs(2)).await;
            page.is_heading_visible().await.map(|_| ())
        }
        other => Err(SuiteError::UnknownCase(other.to_string())),
    }
}

/// Open the login screen and land inside the Forgot Password modal.
async fn open_modal<'c>(ctx: &'c mut CaseContext<'_>) -> SuiteResult<ForgotPasswordPage<'c>> {
    let url = ctx.config.page_url("login");
    let timeout = ctx.config.default_timeout_ms;
    pages::navigate(ctx.driver, &url, ctx.config.nav_retries).await?;
    let mut page = ForgotPasswordPage::new(ctx.driver, timeout);
    page.open().await?;
    Ok(page)
}

async fn to_otp_tab(page: &mut ForgotPasswordPage<'_>, email: &str) -> SuiteResult<()> {
    page.enter_email(email).await?;
    page.click_next().await
}

async fn to_password_tab(page: &mut ForgotPasswordPage<'_>, email: &str) -> SuiteResult<()> {
    to_otp_tab(page, email).await?;
    page.click_next().await
}

async fn expect_otp_boxes(page: &mut ForgotPasswordPage<'_>) -> SuiteResult<()> {
    let count = page.otp_box_count().await?;
    if count == OTP_BOX_COUNT {
        Ok(())
    } else {
        Err(SuiteError::Assertion(format!(
            "expected {OTP_BOX_COUNT} OTP boxes, found {count}"
        )))
    }
}

fn expect_input_type(actual: Option<String>, wanted: &str, field: &str) -> SuiteResult<()> {
    match actual {
        Some(ref t) if t == wanted => Ok(()),
        other => Err(SuiteError::Assertion(format!(
            "{field} input type is {other:?} after toggle, wanted {wanted:?}"
        ))),
    }
}

/// Sheet cells carry literal `''`/`""` for deliberately empty values.
fn unquoted(value: &str) -> &str {
    value.trim_matches(|c| c == '\'' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::data::TestData;
    use crate::driver::mock::MockDriver;

    fn ctx_parts() -> (SuiteConfig, TestData) {
        (
            SuiteConfig::default(),
            TestData::parse("email: user@example.com, otp: 1234, masked_email: u***@e***.com"),
        )
    }

    #[tokio::test]
    async fn fpass05_enters_email_then_advances() {
        let (config, data) = ctx_parts();
        let mut driver = MockDriver::new();
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("FPASS05", &mut ctx).await.unwrap();
        assert!(driver
            .calls_for("fill")
            .iter()
            .any(|l| l.contains("Enter Registered Email Address")));
        assert!(driver.calls_for("click").iter().any(|l| l.contains("Next")));
    }

    #[tokio::test]
    async fn fpass20_fails_when_register_stays_enabled() {
        let (config, data) = ctx_parts();
        let mut driver = MockDriver::new();
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        // Mock reports every element enabled, so the mismatch check trips.
        let err = run("FPASS20", &mut ctx).await.unwrap_err();
        assert!(matches!(err, SuiteError::Assertion(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn fpass28_clicks_outside_the_modal() {
        let (config, data) = ctx_parts();
        let mut driver = MockDriver::new();
        let mut ctx = CaseContext {
            driver: &mut driver,
            config: &config,
            data: &data,
        };
        run("FPASS28", &mut ctx).await.unwrap();
        assert_eq!(driver.calls_for("mouse_click").len(), 1);
    }

    #[test]
    fn quoted_empty_cells_read_as_empty() {
        assert_eq!(unquoted("''"), "");
        assert_eq!(unquoted("\"\""), "");
        assert_eq!(unquoted("secret"), "secret");
    }
}
