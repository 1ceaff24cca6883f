//! Scripted case sequences, one module per TC-id family.
//!
//! The runner hands each case here with its parsed `Test Data`; the
//! family module drives the page objects through the steps that case
//! covers. An id outside every known family is the caller's problem
//! (the runner skips it); an unknown id inside a known family is an
//! `UnknownCase` failure.

pub mod auth;
pub mod country;
pub mod forgot_password;
pub mod governance;
pub mod party;
pub mod personnel;

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::config::SuiteConfig;
use crate::data::TestData;
use crate::driver::Driver;
use crate::error::SuiteResult;
use crate::pages;
use crate::pages::login::LoginPage;

/// Everything a workflow needs for one case.
pub struct CaseContext<'a> {
    pub driver: &'a mut dyn Driver,
    pub config: &'a SuiteConfig,
    pub data: &'a TestData,
}

const FAMILIES: &[&str] = &["AUTH", "FPASS", "COUNTRY", "GOV", "PARTY", "PERS"];

/// Does this id belong to a family the suite implements?
pub fn known_family(tc_id: &str) -> bool {
    FAMILIES.iter().any(|f| tc_id.starts_with(f))
}

/// Run one case by id. The id must belong to a known family.
pub async fn run_case(tc_id: &str, ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    if tc_id.starts_with("FPASS") {
        forgot_password::run(tc_id, ctx).await
    } else if tc_id.starts_with("AUTH") {
        auth::run(tc_id, ctx).await
    } else if tc_id.starts_with("COUNTRY") {
        country::run(tc_id, ctx).await
    } else if tc_id.starts_with("GOV") {
        governance::run(tc_id, ctx).await
    } else if tc_id.starts_with("PARTY") {
        party::run(tc_id, ctx).await
    } else {
        personnel::run(tc_id, ctx).await
    }
}

/// Open the login screen and log in with the case's credentials.
pub async fn login_from_data(ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    let url = ctx.config.page_url("login");
    pages::navigate(ctx.driver, &url, ctx.config.nav_retries).await?;
    let email = ctx.data.get("email").to_string();
    let password = ctx.data.get("password").to_string();
    LoginPage::new(ctx.driver, ctx.config.default_timeout_ms)
        .login(&email, &password)
        .await
}

/// Row value, or the recorded default when the cell is blank.
fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Fresh party code: three random digits plus a time suffix.
pub fn generated_party_code() -> String {
    let prefix: u32 = rand::thread_rng().gen_range(100..1000);
    format!("{prefix}{}", unix_time() % 1000)
}

/// Unique email derived from the first name.
pub fn generated_email(first_name: &str) -> String {
    format!("{}{}@example.com", first_name.to_lowercase(), unix_time())
}

/// Unique employee id derived from the last name.
pub fn generated_emp_id(last_name: &str) -> String {
    format!("{}{}", last_name.to_lowercase(), unix_time())
}

/// Random ten-digit Indian mobile number.
pub fn generated_phone() -> String {
    let digits: u64 = rand::thread_rng().gen_range(1_000_000_000..10_000_000_000);
    format!("+91{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("AUTH01", true)]
    #[test_case("FPASS28", true)]
    #[test_case("COUNTRY10", true)]
    #[test_case("GOV04", true)]
    #[test_case("PARTY02", true)]
    #[test_case("PERS07", true)]
    #[test_case("MISC01", false)]
    #[test_case("", false)]
    fn family_membership(id: &str, expected: bool) {
        assert_eq!(known_family(id), expected);
    }

    #[test]
    fn generated_values_have_the_expected_shape() {
        let code = generated_party_code();
        assert!(code.len() >= 4 && code.len() <= 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let phone = generated_phone();
        assert!(phone.starts_with("+91"));
        assert_eq!(phone.len(), 13);

        assert!(generated_email("Asha").starts_with("asha"));
        assert!(generated_email("Asha").ends_with("@example.com"));
        assert!(generated_emp_id("Rao").starts_with("rao"));
    }
}
