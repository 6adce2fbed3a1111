use axum::{routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod guards;
mod handlers;
mod middleware;
mod schemas;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();
    tracing::info!("Starting storefront API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("storefront API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", post(handlers::auth::login))
        .merge(customer_routes())
        .merge(item_routes())
        .merge(order_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn customer_routes() -> Router {
    use handlers::customers;

    Router::new()
        .route("/customers", post(customers::create))
        .route("/customers/all", get(customers::get_all))
        .route("/customers/me", get(customers::me))
        .route(
            "/customers/:id",
            axum::routing::patch(customers::update).delete(customers::delete),
        )
}

fn item_routes() -> Router {
    use handlers::items;

    // GET is public; mutations require the admin claim via the AuthUser
    // extractor in the handlers
    Router::new()
        .route("/items", post(items::create))
        .route("/items/all", get(items::get_all))
        .route(
            "/items/:id",
            get(items::get_by_id)
                .patch(items::update)
                .delete(items::delete),
        )
}

fn order_routes() -> Router {
    use handlers::orders;

    // Every order route requires a bearer token
    Router::new()
        .route("/orders", post(orders::create))
        .route("/orders/me", get(orders::me))
        .route("/orders/all", get(orders::get_all))
        .route(
            "/orders/:id",
            get(orders::get_by_id)
                .patch(orders::update)
                .delete(orders::delete),
        )
        .route_layer(axum::middleware::from_fn(
            middleware::bearer_auth_middleware,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Storefront API",
        "version": version,
        "endpoints": {
            "login": "POST /login (public)",
            "customers": "/customers, /customers/all (public); /customers/me, /customers/:id (bearer token)",
            "items": "/items/all, /items/:id (public); mutations require admin",
            "orders": "/orders, /orders/me, /orders/all, /orders/:id (bearer token)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
