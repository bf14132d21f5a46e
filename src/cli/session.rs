//! Session selection commands

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::{json, table};

#[derive(Tabled, Serialize)]
struct SessionDisplay {
    #[tabled(rename = "ACCOUNT")]
    account: String,

    #[tabled(rename = "REGION")]
    region: String,

    #[tabled(rename = "PROFILE")]
    profile: String,

    #[tabled(rename = "EPOCH")]
    epoch: u64,
}

/// Show the active selection
pub fn show(ctx: &CommandContext) -> Result<()> {
    let snap = ctx.broker.session();
    let row = SessionDisplay {
        account: snap.account,
        region: snap.region,
        profile: snap.profile,
        epoch: snap.version,
    };

    match ctx.format {
        OutputFormat::Table => println!("{}", table::format_table(&[row])),
        OutputFormat::Json => println!("{}", json::format_json(&row)?),
    }

    Ok(())
}

/// Switch the active selection and persist it as the new default.
///
/// Unspecified fields keep their current value. The in-process broker
/// session is switched too, which cancels anything still in flight under
/// the old epoch.
pub fn switch(
    ctx: &mut CommandContext,
    account: Option<String>,
    region: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let current = ctx.broker.session();
    let account = account.unwrap_or(current.account);
    let region = region.unwrap_or(current.region);
    let profile = profile.unwrap_or(current.profile);

    let snap = ctx.broker.switch_session(&account, &region, &profile);

    ctx.config.account = Some(account);
    ctx.config.region = Some(region);
    ctx.config.profile = Some(profile);
    ctx.save_config()?;

    println!(
        "Switched to account {} / region {} / profile {}",
        snap.account, snap.region, snap.profile
    );
    Ok(())
}
