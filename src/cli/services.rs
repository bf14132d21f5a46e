//! Container service commands

use serde::Serialize;
use tabled::Tabled;

use crate::cache::{ResourceKind, Scope};
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::output::{json, table};
use crate::provider::{ResourceRecords, ServiceSummary};

/// Display format for container services in table view
#[derive(Tabled, Serialize)]
struct ServiceDisplay {
    #[tabled(rename = "NAME")]
    name: String,

    #[tabled(rename = "CLUSTER")]
    cluster: String,

    #[tabled(rename = "STATUS")]
    status: String,

    #[tabled(rename = "RUNNING")]
    running: String,
}

impl From<ServiceSummary> for ServiceDisplay {
    fn from(s: ServiceSummary) -> Self {
        Self {
            name: s.name,
            cluster: s.cluster,
            status: s.status,
            running: format!("{}/{}", s.running_count, s.desired_count),
        }
    }
}

/// Run the services list command
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let records = ctx.resolve(ResourceKind::Containers, Scope::list()).await?;
    let services = match records {
        ResourceRecords::ServiceList(services) => services,
        other => return Err(Error::Other(format!("unexpected records: {other:?}"))),
    };

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ServiceDisplay> = services.into_iter().map(Into::into).collect();
            println!("{}", table::format_table(&rows));
        }
        OutputFormat::Json => {
            println!("{}", json::format_json(&services)?);
        }
    }

    Ok(())
}
