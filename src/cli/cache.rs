//! Cache management commands

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::{json, table};

#[derive(Tabled, Serialize)]
struct CacheStatsDisplay {
    #[tabled(rename = "ENTRIES")]
    entries: usize,

    #[tabled(rename = "FRESH")]
    fresh: usize,

    #[tabled(rename = "STALE")]
    stale: usize,

    #[tabled(rename = "CAPACITY")]
    capacity: usize,

    #[tabled(rename = "IN FLIGHT")]
    in_flight: usize,
}

/// Show cache occupancy
pub fn stats(ctx: &CommandContext) -> Result<()> {
    let stats = ctx.broker.cache_stats();
    let row = CacheStatsDisplay {
        entries: stats.total_entries,
        fresh: stats.fresh_entries,
        stale: stats.stale_entries,
        capacity: stats.capacity,
        in_flight: ctx.broker.in_flight_count(),
    };

    match ctx.format {
        OutputFormat::Table => println!("{}", table::format_table(&[row])),
        OutputFormat::Json => println!("{}", json::format_json(&row)?),
    }

    Ok(())
}

/// Drop every cached entry
pub fn clear(ctx: &CommandContext) -> Result<()> {
    let removed = ctx.broker.clear_cache();
    println!("Removed {removed} cached entries");
    Ok(())
}
