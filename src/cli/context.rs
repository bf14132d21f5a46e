//! Command execution context
//!
//! Composition root for one CLI invocation: loads config, applies
//! overrides, and wires session + provider registry + broker together so
//! command handlers only deal with resolved resources.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::broker::ResourceBroker;
use crate::cache::{ResourceKind, Scope};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::FetchOutcome;
use crate::provider::{self, HttpProviderClient, ResourceRecords};
use crate::session::SessionContext;

pub struct CommandContext {
    pub config: Config,
    pub broker: ResourceBroker,
    pub format: OutputFormat,
    config_path: Option<PathBuf>,
    no_cache: bool,
}

impl CommandContext {
    /// Build a fully wired context.
    ///
    /// CLI overrides win over config file values; the account must be
    /// resolvable from one of the two.
    pub fn new(
        format: OutputFormat,
        account_override: Option<&str>,
        region_override: Option<&str>,
        profile_override: Option<&str>,
        config_path: Option<&str>,
        no_cache: bool,
    ) -> Result<Self> {
        let mut config = Config::load_at(config_path)?;

        if let Some(account) = account_override {
            config.account = Some(account.to_string());
        }
        if let Some(region) = region_override {
            config.region = Some(region.to_string());
        }
        if let Some(profile) = profile_override {
            config.profile = Some(profile.to_string());
        }

        let account = config.require_account()?.to_string();
        let session = Arc::new(SessionContext::new(
            account,
            config.region(),
            config.profile(),
        ));

        let client = Arc::new(
            HttpProviderClient::new(config.endpoint()).map_err(Error::Fetch)?,
        );
        let fetchers = provider::registry(client);
        let broker = ResourceBroker::new(Arc::new(config.clone()), session, fetchers);

        Ok(Self {
            config,
            broker,
            format,
            config_path: config_path.map(PathBuf::from),
            no_cache,
        })
    }

    /// Persist the current config, honoring a `--config` override path.
    pub fn save_config(&self) -> Result<()> {
        match &self.config_path {
            Some(path) => self.config.save_to(path.clone()),
            None => self.config.save(),
        }
    }

    /// Resolve one resource request, waiting on the handle with a spinner.
    ///
    /// `--no-cache` turns every request into a forced refresh.
    pub async fn resolve(&self, kind: ResourceKind, scope: Scope) -> Result<ResourceRecords> {
        let handle = if self.no_cache {
            self.broker.force_refresh(kind, scope)?
        } else {
            self.broker.request(kind, scope)?
        };

        let spinner = if handle.is_ready() {
            None
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} {msg}").expect("static template"),
            );
            pb.set_message(format!("Loading {kind}..."));
            pb.enable_steady_tick(Duration::from_millis(80));
            Some(pb)
        };

        let outcome = handle.resolve().await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        match outcome {
            FetchOutcome::Resolved { value, from_cache } => {
                if from_cache {
                    log::debug!("served {kind} from cache");
                } else if value.is_empty() {
                    log::debug!("no {kind} records returned");
                } else {
                    log::debug!("resolved {} {kind} records", value.len());
                }
                Ok(value)
            }
            FetchOutcome::Failed(err) => Err(err.into()),
            FetchOutcome::Cancelled => Err(Error::Other("fetch cancelled".to_string())),
        }
    }
}
