// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;

use pharmahub::config::AppState;
use pharmahub::handlers;
use pharmahub::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pharmahub=info".into()),
        )
        .compact()
        .init();

    // Startup is the one place a failure should abort the process.
    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");
    tracing::info!("database migrations applied");

    // Public surface: registration, login, marketplace search.
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register_pharmacy))
        .route("/register/customer", post(handlers::auth::register_customer))
        .route("/login", post(handlers::auth::login));

    let public_routes = Router::new()
        .route("/search", get(handlers::search::search_medicines))
        .route("/pharmacies/{slug}", get(handlers::search::pharmacy_page));

    // Pharmacy dashboard (OWNER role enforced by the TenantOwner extractor).
    let inventory_routes = Router::new()
        .route(
            "/items",
            get(handlers::inventory::list_items).post(handlers::inventory::add_item),
        )
        .route(
            "/items/{id}",
            put(handlers::inventory::update_item).delete(handlers::inventory::delete_item),
        )
        .route("/movements", get(handlers::inventory::list_movements));

    let sales_routes = Router::new().route(
        "/",
        post(handlers::sales::log_sale).get(handlers::sales::list_sales),
    );

    let booking_routes = Router::new()
        .route(
            "/",
            post(handlers::bookings::create_booking).get(handlers::bookings::pharmacy_bookings),
        )
        .route("/mine", get(handlers::bookings::my_bookings))
        .route("/{id}/cancel", post(handlers::bookings::cancel_booking))
        .route("/{id}/status", put(handlers::bookings::update_booking_status));

    let settings_routes = Router::new().route("/", put(handlers::settings::update_settings));

    let admin_routes = Router::new()
        .route("/pharmacies", get(handlers::admin::list_pending_pharmacies))
        .route(
            "/pharmacies/{id}/approve",
            post(handlers::admin::approve_pharmacy),
        )
        .route(
            "/pharmacies/{id}/reject",
            post(handlers::admin::reject_pharmacy),
        );

    let protected = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .route("/dashboard", get(handlers::dashboard::overview))
        .nest("/inventory", inventory_routes)
        .nest("/sales", sales_routes)
        .nest("/bookings", booking_routes)
        .nest("/settings", settings_routes)
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes.merge(protected))
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await.expect("server error");
}
