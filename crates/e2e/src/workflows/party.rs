//! PARTY family: add a party with a generated code, edit, view.

use std::path::{Path, PathBuf};

use crate::data::TestData;
use crate::error::{SuiteError, SuiteResult};
use crate::pages::party::PartyPage;

use super::{generated_party_code, login_from_data, CaseContext};

pub async fn run(tc_id: &str, ctx: &mut CaseContext<'_>) -> SuiteResult<()> {
    login_from_data(ctx).await?;

    let mut page = PartyPage::new(ctx.driver);
    match tc_id {
        "PARTY01" => {
            let logo = logo_path(ctx.data, &ctx.config.uploads_dir);
            let code = generated_party_code();
            page.navigate().await?;
            page.add_party(
                &logo,
                ctx.data.get("party_name"),
                &code,
                ctx.data.get("country"),
                ctx.data.get("state"),
                ctx.data.get("district"),
            )
            .await
        }
        "PARTY02" => {
            page.navigate().await?;
            page.edit_party("telugu", ctx.data.get("party_name")).await
        }
        "PARTY03" => {
            page.navigate_scoped(
                ctx.data.get("country"),
                ctx.data.get("state"),
                ctx.data.get("district"),
            )
            .await?;
            page.view_party().await
        }
        other => Err(SuiteError::UnknownCase(other.to_string())),
    }
}

fn logo_path(data: &TestData, uploads_dir: &Path) -> PathBuf {
    let raw = data.get("partylogo");
    if raw.is_empty() {
        return uploads_dir.join("partylogos/tdp.jpg");
    }
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        uploads_dir.join(path)
    }
}
