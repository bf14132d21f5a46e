//! lazycloud - terminal dashboard for browsing cloud resources

use clap::Parser;

mod broker;
mod cache;
mod cli;
mod config;
mod error;
mod fetch;
mod output;
mod provider;
mod session;

use cli::{
    BucketCommands, CacheCommands, Cli, CommandContext, Commands, FunctionCommands,
    ServiceCommands, SessionCommands,
};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Init => cli::init::run(cli.config.as_deref()),
        Commands::Version => {
            println!("lazycloud version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            let mut ctx = CommandContext::new(
                cli.format,
                cli.account.as_deref(),
                cli.region.as_deref(),
                cli.profile.as_deref(),
                cli.config.as_deref(),
                cli.no_cache,
            )?;

            match command {
                Commands::Functions(cmd) => match cmd {
                    FunctionCommands::List => cli::functions::list(&ctx).await,
                    FunctionCommands::Get { name } => cli::functions::get(&ctx, &name).await,
                    FunctionCommands::Invoke { name, payload } => {
                        cli::functions::invoke(&ctx, &name, &payload).await
                    }
                },
                Commands::Buckets(BucketCommands::List) => cli::buckets::list(&ctx).await,
                Commands::Services(ServiceCommands::List) => cli::services::list(&ctx).await,
                Commands::Session(cmd) => match cmd {
                    SessionCommands::Show => cli::session::show(&ctx),
                    SessionCommands::Switch {
                        account,
                        region,
                        profile,
                    } => cli::session::switch(&mut ctx, account, region, profile),
                },
                Commands::Cache(cmd) => match cmd {
                    CacheCommands::Stats => cli::cache::stats(&ctx),
                    CacheCommands::Clear => cli::cache::clear(&ctx),
                },
                Commands::Init | Commands::Version => unreachable!("handled above"),
            }
        }
    }
}
