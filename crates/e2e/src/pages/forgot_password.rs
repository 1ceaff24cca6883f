//! Forgot Password modal: recovery by mobile or email, OTP, new password.

use crate::driver::{Driver, WaitState};
use crate::error::SuiteResult;
use crate::locator::Locator;

use super::wait_enabled;

pub struct ForgotPasswordPage<'d> {
    driver: &'d mut dyn Driver,
    timeout_ms: u64,
    tab_login: Locator,
    btn_forgot_password: Locator,
    heading: Locator,
    input_mobile: Locator,
    input_email: Locator,
    or_separator: Locator,
    btn_next: Locator,
    btn_resend_otp: Locator,
    btn_back: Locator,
    otp_boxes: Locator,
    input_new_password: Locator,
    input_confirm_password: Locator,
    eye_new_password: Locator,
    eye_confirm_password: Locator,
    visibility_icon: Locator,
    new_password_tab_text: Locator,
    btn_register: Locator,
    btn_cross: Locator,
    btn_back_to_home: Locator,
}

impl<'d> ForgotPasswordPage<'d> {
    pub fn new(driver: &'d mut dyn Driver, timeout_ms: u64) -> Self {
        Self {
            driver,
            timeout_ms,
            tab_login: Locator::role("tab", "Login/Signin"),
            btn_forgot_password: Locator::role("button", "Forgot Password?"),
            heading: Locator::text("Forgot Password").exact(),
            input_mobile: Locator::placeholder("1 (702) 123-4567"),
            input_email: Locator::placeholder("Enter Registered Email Address"),
            or_separator: Locator::text("Or").exact(),
            btn_next: Locator::css("button").has_text("Next"),
            btn_resend_otp: Locator::css("button").has_text("Resend OTP"),
            btn_back: Locator::css("button").has_text("Back"),
            otp_boxes: Locator::css("input[type='text'][maxlength='1']"),
            input_new_password: Locator::placeholder("Enter New Password"),
            input_confirm_password: Locator::placeholder("Re-Enter Password"),
            // MUI renders the two eye toggles as the first two icon buttons.
            eye_new_password: Locator::css("button.MuiIconButton-root").nth(0),
            eye_confirm_password: Locator::css("button.MuiIconButton-root").nth(1),
            visibility_icon: Locator::css("svg[data-testid='VisibilityIcon']").first(),
            new_password_tab_text: Locator::text("Enter New Password"),
            btn_register: Locator::css("button").has_text("Register"),
            btn_cross: Locator::css("button:has(svg[data-testid='CloseIcon'])"),
            btn_back_to_home: Locator::css("button").has_text("Back to Home"),
        }
    }

    pub async fn open(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.tab_login).await?;
        self.driver.click(&self.btn_forgot_password).await
    }

    pub async fn is_heading_visible(&mut self) -> SuiteResult<bool> {
        self.driver
            .wait_for(&self.heading, WaitState::Visible, self.timeout_ms)
            .await
            .map(|()| true)
    }

    pub async fn is_mobile_input_visible(&mut self) -> SuiteResult<bool> {
        self.driver
            .wait_for(&self.input_mobile, WaitState::Visible, self.timeout_ms)
            .await
            .map(|()| true)
    }

    pub async fn is_email_input_visible(&mut self) -> SuiteResult<bool> {
        self.driver
            .wait_for(&self.input_email, WaitState::Visible, self.timeout_ms)
            .await
            .map(|()| true)
    }

    pub async fn is_or_separator_visible(&mut self) -> SuiteResult<bool> {
        self.driver
            .wait_for(&self.or_separator, WaitState::Visible, self.timeout_ms)
            .await
            .map(|()| true)
    }

    pub async fn enter_mobile(&mut self, mobile: &str) -> SuiteResult<()> {
        self.driver
            .wait_for(&self.input_mobile, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver.fill(&self.input_mobile, mobile).await
    }

    pub async fn enter_email(&mut self, email: &str) -> SuiteResult<()> {
        self.driver
            .wait_for(&self.input_email, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver.fill(&self.input_email, email).await
    }

    pub async fn is_next_disabled(&mut self) -> SuiteResult<bool> {
        Ok(!self.driver.is_enabled(&self.btn_next).await?)
    }

    pub async fn click_next(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_next).await
    }

    pub async fn otp_box_count(&mut self) -> SuiteResult<usize> {
        self.driver.count(&self.otp_boxes).await
    }

    /// Character typed in box `index`; `press` covers backspace paths.
    pub async fn type_otp_digit(&mut self, index: usize, ch: &str) -> SuiteResult<()> {
        self.driver
            .fill(&self.otp_boxes.clone().nth(index), ch)
            .await
    }

    pub async fn press_otp_key(&mut self, index: usize, key: &str) -> SuiteResult<()> {
        self.driver
            .press(&self.otp_boxes.clone().nth(index), key)
            .await
    }

    /// Index of the OTP box currently holding focus.
    pub async fn focused_otp_index(&mut self) -> SuiteResult<i64> {
        let value = self
            .driver
            .evaluate(
                "(() => { const boxes = [...document.querySelectorAll(\"input[maxlength='1']\")]; \
                 return boxes.indexOf(document.activeElement); })()",
            )
            .await?;
        Ok(value.as_i64().unwrap_or(-1))
    }

    pub async fn is_resend_enabled(&mut self) -> SuiteResult<bool> {
        self.driver.is_enabled(&self.btn_resend_otp).await
    }

    /// Countdown screens re-enable Resend after roughly 20 seconds.
    pub async fn wait_resend_enabled(&mut self, timeout_ms: u64) -> SuiteResult<()> {
        wait_enabled(self.driver, &self.btn_resend_otp, timeout_ms).await
    }

    pub async fn click_back(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_back).await
    }

    pub async fn enter_new_password(&mut self, password: &str) -> SuiteResult<()> {
        self.driver.fill(&self.input_new_password, password).await
    }

    pub async fn enter_confirm_password(&mut self, password: &str) -> SuiteResult<()> {
        self.driver
            .fill(&self.input_confirm_password, password)
            .await
    }

    pub async fn confirm_password_value(&mut self) -> SuiteResult<String> {
        self.driver.input_value(&self.input_confirm_password).await
    }

    /// Eye toggles sit under the input adornment, so force the click.
    pub async fn toggle_new_password_eye(&mut self) -> SuiteResult<()> {
        self.driver.force_click(&self.eye_new_password).await
    }

    pub async fn toggle_confirm_password_eye(&mut self) -> SuiteResult<()> {
        self.driver.force_click(&self.eye_confirm_password).await
    }

    pub async fn is_register_enabled(&mut self) -> SuiteResult<bool> {
        self.driver.is_enabled(&self.btn_register).await
    }

    pub async fn click_register(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_register).await
    }

    /// `Enter OTP sent to r****@e****.com` banner on the OTP tab.
    pub async fn is_masked_otp_message_visible(&mut self, masked_email: &str) -> SuiteResult<bool> {
        let banner =
            Locator::css("div.field-lbl").has_text(&format!("Enter OTP sent to {masked_email}"));
        self.driver
            .wait_for(&banner, WaitState::Visible, self.timeout_ms)
            .await
            .map(|()| true)
    }

    /// Clear a box before typing; the UI pre-fills the issued code.
    pub async fn clear_otp_box(&mut self, index: usize) -> SuiteResult<()> {
        let boxed = self.otp_boxes.clone().nth(index);
        self.driver.fill(&boxed, "").await?;
        self.driver.press(&boxed, "Backspace").await
    }

    /// Key-by-key entry so per-keystroke focus handlers fire.
    pub async fn type_otp_char(&mut self, index: usize, ch: &str) -> SuiteResult<()> {
        self.driver
            .type_text(&self.otp_boxes.clone().nth(index), ch)
            .await
    }

    pub async fn otp_box_value(&mut self, index: usize) -> SuiteResult<String> {
        self.driver
            .input_value(&self.otp_boxes.clone().nth(index))
            .await
    }

    pub async fn is_new_password_tab_visible(&mut self) -> SuiteResult<bool> {
        self.driver
            .wait_for(&self.new_password_tab_text, WaitState::Visible, self.timeout_ms)
            .await
            .map(|()| true)
    }

    /// `type` attribute of the new-password input (`password`/`text`).
    pub async fn new_password_input_type(&mut self) -> SuiteResult<Option<String>> {
        self.driver
            .get_attribute(&self.input_new_password, "type")
            .await
    }

    pub async fn confirm_password_input_type(&mut self) -> SuiteResult<Option<String>> {
        self.driver
            .get_attribute(&self.input_confirm_password, "type")
            .await
    }

    /// Eye icon on the new-password field, forced past the adornment.
    pub async fn toggle_visibility_icon(&mut self) -> SuiteResult<()> {
        self.driver.force_click(&self.visibility_icon).await
    }

    pub async fn click_cross(&mut self) -> SuiteResult<()> {
        self.driver
            .wait_for(&self.btn_cross, WaitState::Visible, self.timeout_ms)
            .await?;
        self.driver.click(&self.btn_cross).await
    }

    pub async fn click_back_to_home(&mut self) -> SuiteResult<()> {
        self.driver.click(&self.btn_back_to_home).await
    }

    pub async fn press_escape(&mut self) -> SuiteResult<()> {
        self.driver.press_page_key("Escape").await
    }

    /// Click the top-left corner, outside the modal.
    pub async fn click_backdrop(&mut self) -> SuiteResult<()> {
        self.driver.mouse_click(10.0, 10.0).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;

    #[tokio::test]
    async fn open_goes_through_the_login_tab() {
        let mut driver = MockDriver::new();
        ForgotPasswordPage::new(&mut driver, 5_000).open().await.unwrap();
        let clicks = driver.calls_for("click");
        assert!(clicks[0].contains("Login/Signin"));
        assert!(clicks[1].contains("Forgot Password?"));
    }

    #[tokio::test]
    async fn next_disabled_is_inverted_is_enabled() {
        let mut driver = MockDriver::new();
        driver.disabled.push("has-text=\"Next\"".to_string());
        let mut page = ForgotPasswordPage::new(&mut driver, 5_000);
        assert!(page.is_next_disabled().await.unwrap());
    }

    #[tokio::test]
    async fn eye_toggles_use_force_clicks() {
        let mut driver = MockDriver::new();
        let mut page = ForgotPasswordPage::new(&mut driver, 5_000);
        page.toggle_new_password_eye().await.unwrap();
        page.toggle_confirm_password_eye().await.unwrap();
        let forced = driver.calls_for("force_click");
        assert_eq!(forced.len(), 2);
        assert!(forced[0].contains("nth(0)"));
        assert!(forced[1].contains("nth(1)"));
    }
}
