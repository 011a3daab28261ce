//! Main application orchestration.
//!
//! Wires the pieces together:
//! - Exchange position feed (HTTP polling)
//! - Telegram command long-poll loop
//! - Monitor loop (diff, alerts, summaries)
//! - Shutdown on Ctrl-C

use crate::commands::CommandRouter;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::monitor::MonitorLoop;
use hlwatch_core::SubscriberId;
use hlwatch_feed::InfoClient;
use hlwatch_registry::SubscriptionRegistry;
use hlwatch_telegram::BotClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Pause after a failed getUpdates call before retrying.
const UPDATE_RETRY_PAUSE: Duration = Duration::from_secs(5);

/// Main application.
pub struct Application {
    config: AppConfig,
    registry: Arc<SubscriptionRegistry>,
    feed: Arc<InfoClient>,
    bot: Arc<BotClient>,
}

impl Application {
    /// Create a new application.
    ///
    /// Reads the bot token from the environment and builds both HTTP
    /// clients; fails fast on a missing token or bad URL.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let feed = Arc::new(InfoClient::new(&config.info_url)?);
        let token = config.bot_token()?;
        let bot = Arc::new(BotClient::new(&config.telegram_api_url, &token)?);

        Ok(Self {
            config,
            registry: Arc::new(SubscriptionRegistry::new()),
            feed,
            bot,
        })
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run(self) -> AppResult<()> {
        info!(
            info_url = %self.config.info_url,
            poll_interval_secs = self.config.poll_interval_secs,
            "Starting application"
        );

        let monitor = MonitorLoop::new(
            &self.config,
            self.registry.clone(),
            self.feed.clone(),
            self.bot.clone(),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let monitor_handle = tokio::spawn(monitor.run(shutdown_rx.clone()));

        let router = CommandRouter::new(
            self.registry.clone(),
            self.feed.clone(),
            self.bot.clone(),
        );
        let bot = self.bot.clone();
        let command_handle = tokio::spawn(async move {
            Self::command_loop(bot, router, shutdown_rx).await;
        });

        tokio::signal::ctrl_c().await.map_err(AppError::Io)?;
        info!("Shutdown signal received");

        // Both loops observe the signal between cycles and between
        // updates, so an in-flight dispatch always completes.
        let _ = shutdown_tx.send(true);
        let _ = monitor_handle.await;
        let _ = command_handle.await;

        Ok(())
    }

    /// Long-poll Telegram for commands and dispatch them.
    ///
    /// The offset is advanced past every received update, including ones
    /// that carry no command, so nothing is redelivered.
    async fn command_loop(
        bot: Arc<BotClient>,
        router: CommandRouter,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut offset: Option<i64> = None;

        loop {
            let updates = tokio::select! {
                result = bot.get_updates(offset) => match result {
                    Ok(updates) => updates,
                    Err(e) => {
                        warn!(error = %e, "getUpdates failed, retrying");
                        tokio::time::sleep(UPDATE_RETRY_PAUSE).await;
                        continue;
                    }
                },
                _ = shutdown.changed() => {
                    info!("Command loop stopped");
                    return;
                }
            };

            for update in &updates {
                offset = Some(update.update_id + 1);
                if let Some((chat_id, text)) = update.command_text() {
                    // Plain chatter is ignored; only commands are routed.
                    if text.starts_with('/') {
                        router.handle(SubscriberId(chat_id), text).await;
                    }
                }
            }
        }
    }
}
