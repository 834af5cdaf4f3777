pub mod handlers;
pub mod reports;
pub mod shared;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{routing::get, Router};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, silence per-query SQL noise.
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Request log middleware: one line per request with timing and size.
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        use axum::body::to_bytes;

        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;
        let (parts, body) = response.into_parts();

        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(b) => b,
            Err(_) => {
                tracing::warn!(
                    "{} {} -> {} ({}ms, body unreadable)",
                    method,
                    uri.path(),
                    parts.status.as_u16(),
                    start.elapsed().as_millis()
                );
                return Response::from_parts(parts, Body::default());
            }
        };

        tracing::info!(
            "{} {} -> {} ({}ms, {} bytes)",
            method,
            uri.path(),
            parts.status.as_u16(),
            start.elapsed().as_millis(),
            bytes.len()
        );
        Response::from_parts(parts, Body::from(bytes))
    }

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    shared::data::db::initialize_database(Some(&db_path.to_string_lossy()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    usecases::u600_forecast::initialize_forecast_client(Arc::new(
        usecases::u600_forecast::ScriptForecastClient::new(&config.forecast),
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/session/keepalive", get(handlers::session::keepalive))
        // Report endpoints
        .route("/api/reports/branches", get(handlers::branches::list))
        .route("/api/reports/summary", get(handlers::r200_summary::get))
        .route(
            "/api/reports/summary/breakdown",
            get(handlers::r206_breakdown::get),
        )
        .route(
            "/api/reports/order_summary",
            get(handlers::r201_order_summary::get),
        )
        .route(
            "/api/reports/online_orders",
            get(handlers::r202_online_orders::get),
        )
        .route(
            "/api/reports/rewards_enrollment",
            get(handlers::r203_rewards_enrollment::get),
        )
        .route(
            "/api/reports/branch_redemptions",
            get(handlers::r204_branch_redemptions::get),
        )
        .route(
            "/api/reports/enrollment_details",
            get(handlers::r205_enrollment_details::get),
        )
        // Forecast endpoints
        .route("/api/forecasts/points", get(handlers::forecasts::points))
        .route(
            "/api/forecasts/enrollment",
            get(handlers::forecasts::enrollment),
        )
        .route(
            "/api/forecasts/customer_points",
            get(handlers::forecasts::customer_points),
        )
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
