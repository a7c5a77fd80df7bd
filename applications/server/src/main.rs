/// Aria Store - digital album storefront server
use aria_core::types::Role;
use aria_server::{
    config::ServerConfig,
    create_router,
    jobs::OrderSweeper,
    realtime::RoomRegistry,
    services::{AuthService, Mailer, OrderService, PaymentClient},
    state::AppState,
};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "aria-server")]
#[command(about = "Aria Store backend server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create an admin account
    AddAdmin {
        /// Display name
        #[arg(long)]
        name: String,
        /// Email address (used to log in)
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Run one stale-order reconcile pass and exit
    SweepOrders,
    /// Rebuild album recommendations for every user from listening data
    RefreshRecommendations,
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aria_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Maintenance scripts expect failures to exit 1; clap's default for
    // usage errors is 2. Help and version output keep exit code 0.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(usage_exit_code(&e));
    });

    match cli.command {
        Commands::Serve => {
            serve().await?;
        }
        Commands::AddAdmin {
            name,
            email,
            password,
        } => {
            add_admin(&name, &email, &password).await?;
        }
        Commands::SweepOrders => {
            sweep_orders().await?;
        }
        Commands::RefreshRecommendations => {
            refresh_recommendations().await?;
        }
        Commands::ListUsers => {
            list_users().await?;
        }
    }

    Ok(())
}

fn usage_exit_code(e: &clap::Error) -> i32 {
    if e.exit_code() == 0 {
        0
    } else {
        1
    }
}

fn build_services(
    config: &ServerConfig,
    pool: sqlx::SqlitePool,
) -> anyhow::Result<(AppState, Arc<OrderService>)> {
    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    ));

    let payment = Arc::new(PaymentClient::new(
        config.payment.base_url.clone(),
        config.payment.secret_key.clone(),
    ));

    let mailer = Arc::new(Mailer::new(&config.email)?);
    let rooms = Arc::new(RoomRegistry::new());

    let orders = Arc::new(OrderService::new(
        pool.clone(),
        Arc::clone(&payment),
        Arc::clone(&mailer),
        Arc::clone(&rooms),
        config.payment.currency.clone(),
        config.stale_after_secs(),
        config.orders.cancelled_retention_secs,
    ));

    let reset_ttl = i64::try_from(config.auth.reset_token_expiration_minutes)? * 60;

    let state = AppState::new(
        pool,
        auth_service,
        payment,
        mailer,
        Arc::clone(&orders),
        rooms,
        reset_ttl,
    );

    Ok((state, orders))
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;
    config.validate()?;

    tracing::info!("Starting Aria Store server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = aria_storage::create_pool(&config.storage.database_url).await?;
    aria_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    let (app_state, orders) = build_services(&config, pool)?;

    // Start the stale-order sweeper
    let sweeper = OrderSweeper::start(
        orders,
        Duration::from_secs(config.orders.sweep_interval_secs),
    );
    tracing::info!(
        "Order sweeper started (stale after {}s, every {}s)",
        config.stale_after_secs(),
        config.orders.sweep_interval_secs
    );

    // Build router
    let app = create_router(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server with graceful shutdown on ctrl-c
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    sweeper.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn add_admin(name: &str, email: &str, password: &str) -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    config.validate()?;

    let pool = aria_storage::create_pool(&config.storage.database_url).await?;
    aria_storage::run_migrations(&pool).await?;

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    );

    let password_hash = auth_service
        .hash_password(password)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let user = aria_storage::users::create(
        &pool,
        aria_storage::users::NewUser {
            name: name.to_string(),
            username: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::Admin,
        },
    )
    .await?;

    println!("Created admin {} ({})", user.id, user.email);
    Ok(())
}

async fn sweep_orders() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    config.validate()?;

    let pool = aria_storage::create_pool(&config.storage.database_url).await?;
    aria_storage::run_migrations(&pool).await?;

    let (_, orders) = build_services(&config, pool)?;

    let cancelled = orders
        .reconcile_stale_orders()
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let purged = orders
        .purge_expired_cancelled()
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("Cancelled {cancelled} stale orders, purged {purged} expired");
    Ok(())
}

async fn refresh_recommendations() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    let pool = aria_storage::create_pool(&config.storage.database_url).await?;
    aria_storage::run_migrations(&pool).await?;

    let users = aria_storage::users::get_all(&pool).await?;
    let mut entries = 0;
    for user in &users {
        entries += aria_storage::listening::refresh_recommendations(&pool, user.id).await?;
    }

    println!(
        "Refreshed recommendations for {} users ({entries} entries)",
        users.len()
    );
    Ok(())
}

async fn list_users() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    let pool = aria_storage::create_pool(&config.storage.database_url).await?;
    aria_storage::run_migrations(&pool).await?;

    let users = aria_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}> ({})", user.id, user.name, user.email, user.role.as_str());
    }

    Ok(())
}
