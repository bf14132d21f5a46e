//! Object-store bucket commands

use serde::Serialize;
use tabled::Tabled;

use crate::cache::{ResourceKind, Scope};
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::output::{json, table};
use crate::provider::{BucketSummary, ResourceRecords};

/// Display format for buckets in table view
#[derive(Tabled, Serialize)]
struct BucketDisplay {
    #[tabled(rename = "NAME")]
    name: String,

    #[tabled(rename = "REGION")]
    region: String,

    #[tabled(rename = "CREATED")]
    created: String,
}

impl From<BucketSummary> for BucketDisplay {
    fn from(b: BucketSummary) -> Self {
        Self {
            name: b.name,
            region: b.region.unwrap_or_else(|| "-".to_string()),
            created: b
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Run the buckets list command
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let records = ctx.resolve(ResourceKind::Buckets, Scope::list()).await?;
    let buckets = match records {
        ResourceRecords::BucketList(buckets) => buckets,
        other => return Err(Error::Other(format!("unexpected records: {other:?}"))),
    };

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<BucketDisplay> = buckets.into_iter().map(Into::into).collect();
            println!("{}", table::format_table(&rows));
        }
        OutputFormat::Json => {
            println!("{}", json::format_json(&buckets)?);
        }
    }

    Ok(())
}
