//! CLI command definitions and handlers

use clap::{Parser, Subcommand, ValueEnum};

pub mod buckets;
pub mod cache;
pub mod context;
pub mod functions;
pub mod init;
pub mod services;
pub mod session;

pub use context::CommandContext;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// lazycloud - terminal dashboard for cloud resources
#[derive(Parser, Debug)]
#[command(name = "lazycloud")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(
        long,
        global = true,
        env = "LAZYCLOUD_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override account identifier
    #[arg(long, global = true, env = "LAZYCLOUD_ACCOUNT", hide_env = true)]
    pub account: Option<String>,

    /// Override region
    #[arg(long, global = true, env = "LAZYCLOUD_REGION", hide_env = true)]
    pub region: Option<String>,

    /// Override credential profile
    #[arg(long, global = true, env = "LAZYCLOUD_PROFILE", hide_env = true)]
    pub profile: Option<String>,

    /// Override config file location
    #[arg(long, global = true, env = "LAZYCLOUD_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Bypass cache, fetch fresh data from the provider
    #[arg(long, global = true, env = "LAZYCLOUD_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "LAZYCLOUD_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize lazycloud configuration
    Init,

    /// Display version information
    Version,

    /// Browse compute functions
    #[command(subcommand)]
    Functions(FunctionCommands),

    /// Browse object-store buckets
    #[command(subcommand)]
    Buckets(BucketCommands),

    /// Browse container services
    #[command(subcommand)]
    Services(ServiceCommands),

    /// Show or switch the active account/region/profile
    #[command(subcommand)]
    Session(SessionCommands),

    /// Inspect or clear the response cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand, Debug)]
pub enum FunctionCommands {
    /// List compute functions
    List,
    /// Show one function's configuration
    Get {
        /// Function name
        name: String,
    },
    /// Invoke a function and print the result
    Invoke {
        /// Function name
        name: String,
        /// JSON request payload
        #[arg(long, default_value = "{}")]
        payload: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BucketCommands {
    /// List buckets
    List,
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// List container services
    List,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Show the active selection
    Show,
    /// Switch account/region/profile and persist as the new default
    Switch {
        /// Account identifier
        #[arg(long)]
        account: Option<String>,
        /// Region
        #[arg(long)]
        region: Option<String>,
        /// Credential profile
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache occupancy
    Stats,
    /// Drop every cached entry
    Clear,
}
