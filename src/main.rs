//! PartnerChat Telegram Bot
//!
//! Main application entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use teloxide::{prelude::*, types::{CallbackQuery, Update}};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use tracing::{info, warn, error};

use PartnerChat::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, DatabaseConfig, connection::create_pool},
    services::ServiceFactory,
    state::StateStorage,
    handlers::{Command, handle_command, handle_callback_query, handle_message, is_plain_text},
    web::{self, ApiState},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// How often idle relay rate-limit buckets are dropped
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("loading configuration")?;
    settings.validate().context("validating configuration")?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging);

    info!("Starting {}...", PartnerChat::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;
    let database_service = DatabaseService::new(db_pool);

    // Run database migrations
    info!("Running database migrations...");
    database_service.migrate().await?;

    // Initialize state management
    info!("Connecting to Redis...");
    let state_storage = StateStorage::new(settings.redis.clone()).await?;
    state_storage.test_connection().await?;

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, &database_service);

    let limiter = services.relay_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });

    // Mini App API
    let web_task = if settings.features.web_api {
        let addr: SocketAddr = settings.web.bind_address.parse()
            .context("parsing web.bind_address")?;
        let state = Arc::new(ApiState { database: database_service.clone() });
        Some(tokio::spawn(async move {
            if let Err(e) = web::serve(addr, state, shutdown_signal()).await {
                error!(error = %e, "Mini App API server failed");
            }
        }))
    } else {
        info!("Mini App API disabled");
        None
    };

    let bot = Bot::new(&settings.bot.token);

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![Arc::new(services), Arc::new(state_storage)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("PartnerChat bot is ready, starting polling...");
    dispatcher.dispatch().await;

    if let Some(task) = web_task {
        if let Err(e) = task.await {
            error!(error = %e, "Mini App API task panicked");
        }
    }

    info!("PartnerChat bot has been shut down.");

    Ok(())
}

/// Resolves on Ctrl-C, alongside the dispatcher's own handler
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle plain text; unknown commands stop here
                    dptree::filter(|msg: Message| is_plain_text(&msg))
                        .endpoint(handle_messages),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, &services, &state_storage).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle plain text messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, &services, &state_storage).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = handle_callback_query(bot, query, &services, &state_storage).await {
        error!(user_id = user_id, error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
