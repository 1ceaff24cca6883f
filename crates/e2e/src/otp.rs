//! One-time-passcode handling.
//!
//! The console under test shows the OTP on-page as `OTP: XXXX` next to
//! the input boxes. The code is read off that display and typed one
//! character per box. A missing display or an empty code is an error;
//! the login flow never proceeds without a code.

use tracing::debug;

use crate::driver::{Driver, WaitState};
use crate::error::{SuiteError, SuiteResult};
use crate::locator::Locator;

/// `"OTP: BLFJ"` -> `"BLFJ"`. Text after the last colon, trimmed.
pub fn extract_code(text: &str) -> SuiteResult<String> {
    let code = match text.rsplit_once(':') {
        Some((_, tail)) => tail.trim(),
        None => text.trim(),
    };
    if code.is_empty() {
        return Err(SuiteError::OtpEmpty {
            text: text.to_string(),
        });
    }
    Ok(code.to_string())
}

/// Fill `code` one character per box, left to right.
pub async fn fill(driver: &mut dyn Driver, boxes: &Locator, code: &str) -> SuiteResult<()> {
    for (i, ch) in code.chars().enumerate() {
        driver
            .fill(&boxes.clone().nth(i), &ch.to_string())
            .await?;
    }
    Ok(())
}

/// Wait for the OTP display, extract its code and type it into `boxes`.
pub async fn read_and_fill(
    driver: &mut dyn Driver,
    display: &Locator,
    boxes: &Locator,
    timeout_ms: u64,
) -> SuiteResult<String> {
    driver
        .wait_for(display, WaitState::Visible, timeout_ms)
        .await
        .map_err(|_| SuiteError::OtpNotDisplayed { timeout_ms })?;
    let text = driver.inner_text(display).await?;
    let code = extract_code(&text)?;
    debug!("filling {}-character one-time code", code.len());
    fill(driver, boxes, &code).await?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;
    use test_case::test_case;

    #[test_case("OTP: BLFJ", "BLFJ")]
    #[test_case("OTP:1234", "1234")]
    #[test_case("Your code is OTP: 9QX2  ", "9QX2"; "trailing whitespace trimmed")]
    #[test_case("7731", "7731"; "bare code without label")]
    fn extracts_code_after_last_colon(text: &str, expected: &str) {
        assert_eq!(extract_code(text).unwrap(), expected);
    }

    #[test_case("OTP:"; "label only")]
    #[test_case("OTP:   "; "label with whitespace")]
    #[test_case(""; "blank display")]
    fn empty_code_is_an_error(text: &str) {
        assert!(matches!(
            extract_code(text),
            Err(SuiteError::OtpEmpty { .. })
        ));
    }

    #[tokio::test]
    async fn fills_exactly_one_box_per_character() {
        let mut driver = MockDriver::new();
        let boxes = Locator::css("input.otp-box");
        fill(&mut driver, &boxes, "BLFJ").await.unwrap();
        let fills = driver.calls_for("fill");
        assert_eq!(
            fills,
            vec![
                "css=input.otp-box.nth(0)",
                "css=input.otp-box.nth(1)",
                "css=input.otp-box.nth(2)",
                "css=input.otp-box.nth(3)",
            ]
        );
    }

    #[tokio::test]
    async fn missing_display_is_otp_not_displayed() {
        let mut driver = MockDriver::new().fail("wait_for", "otp-display");
        let err = read_and_fill(
            &mut driver,
            &Locator::css(".otp-display"),
            &Locator::css("input.otp-box"),
            5_000,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            SuiteError::OtpNotDisplayed { timeout_ms: 5_000 }
        ));
    }

    #[tokio::test]
    async fn read_and_fill_uses_displayed_code() {
        let mut driver = MockDriver::new().with_text("otp-display", "OTP: 42QX");
        let code = read_and_fill(
            &mut driver,
            &Locator::css(".otp-display"),
            &Locator::css("input.otp-box"),
            5_000,
        )
        .await
        .unwrap();
        assert_eq!(code, "42QX");
        assert_eq!(driver.calls_for("fill").len(), 4);
    }
}
