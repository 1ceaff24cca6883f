//! Login screen: email/password, two Next steps, on-page OTP, Log-in.

use crate::driver::{Driver, WaitState};
use crate::error::SuiteResult;
use crate::locator::Locator;
use crate::otp;

use super::click_when_enabled;

pub struct LoginPage<'d> {
    driver: &'d mut dyn Driver,
    timeout_ms: u64,
    tab_login: Locator,
    input_email: Locator,
    input_password: Locator,
    btn_next: Locator,
    otp_boxes: Locator,
    otp_message: Locator,
    btn_login: Locator,
    btn_toggle_password: Locator,
    btn_forgot_password: Locator,
}

impl<'d> LoginPage<'d> {
    pub fn new(driver: &'d mut dyn Driver, timeout_ms: u64) -> Self {
        Self {
            driver,
            timeout_ms,
            tab_login: Locator::role("tab", "Login/Signin"),
            input_email: Locator::role("textbox", "Enter Email Address"),
            input_password: Locator::role("textbox", "Enter Password"),
            btn_next: Locator::role("button", "Next"),
            otp_boxes: Locator::css("input[type='text'][maxlength='1']"),
            otp_message: Locator::css("p.MuiTypography-body1").has_text("OTP:"),
            btn_login: Locator::role("button", "Log-in"),
            btn_toggle_password: Locator::role("button", "toggle password visibility"),
            btn_forgot_password: Locator::role("button", "Forgot Password?"),
        }
    }

    /// Full login: credentials, Next twice, OTP off the page, Log-in.
    pub async fn login(&mut self, email: &str, password: &str) -> SuiteResult<()> {
        self.driver.click(&self.tab_login).await?;
        self.driver.fill(&self.input_email, email).await?;
        self.driver.fill(&self.input_password, password).await?;

        self.driver.click(&self.btn_next).await?;
        // The second step re-enables Next once the OTP is issued.
        click_when_enabled(self.driver, &self.btn_next, self.timeout_ms).await?;

        otp::read_and_fill(
            self.driver,
            &self.otp_message,
            &self.otp_boxes,
            self.timeout_ms,
        )
        .await?;

        self.driver
            .wait_for(&self.btn_login, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver.click(&self.btn_login).await
    }

    pub async fn open_login_tab(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.tab_login).await
    }

    pub async fn open_forgot_password(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_forgot_password).await
    }

    /// Type a password and flip the visibility toggle show/hide.
    pub async fn toggle_password_visibility(&mut self, password: &str) -> SuiteResult<()> {
        self.driver.click(&self.tab_login).await?;
        self.driver.fill(&self.input_password, password).await?;
        self.driver.click(&self.btn_toggle_password).await?;
        self.driver.click(&self.btn_toggle_password).await
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;
    use crate::error::SuiteError;

    #[tokio::test]
    async fn login_reads_otp_off_the_page_and_logs_in() {
        let mut driver = MockDriver::new().with_text("has-text=\"OTP:\"", "OTP: 9QXZ");
        LoginPage::new(&mut driver, 5_000)
            .login("a@b.com", "secret")
            .await
            .unwrap();

        let fills = driver.calls_for("fill");
        // email + password + 4 OTP boxes
        assert_eq!(fills.len(), 6);
        assert!(fills[0].contains("Enter Email Address"));
        assert!(fills[1].contains("Enter Password"));
        assert!(fills[2].contains("maxlength='1'"));

        let clicks = driver.calls_for("click");
        assert!(clicks.last().unwrap().contains("Log-in"));
    }

    #[tokio::test]
    async fn login_fails_when_otp_never_appears() {
        let mut driver = MockDriver::new().fail("wait_for", "OTP:");
        let err = LoginPage::new(&mut driver, 3_000)
            .login("a@b.com", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, SuiteError::OtpNotDisplayed { .. }));
        // No Log-in click after the OTP step fails.
        assert!(!driver
            .calls_for("click")
            .iter()
            .any(|l| l.contains("Log-in")));
    }

    #[tokio::test]
    async fn toggle_flips_visibility_twice() {
        let mut driver = MockDriver::new();
        LoginPage::new(&mut driver, 5_000)
            .toggle_password_visibility("secret")
            .await
            .unwrap();
        let toggles = driver
            .calls_for("click")
            .iter()
            .filter(|l| l.contains("toggle password visibility"))
            .count();
        assert_eq!(toggles, 2);
    }
}
