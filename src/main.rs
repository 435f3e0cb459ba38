use std::net::SocketAddr;

use mongodb::Client;

use pharmashop::{config, routes, services, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = services::db_init::ensure_indexes(&db).await {
        tracing::warn!(error = %e, "could not ensure indexes");
    }

    let state = AppState {
        db: db.clone(),
        settings: settings.clone(),
        carts: services::cart_service::CartStore::new(),
        orders: services::order_service::MongoOrderStore::new(db),
        gateway: services::gateway::StripeGateway::new(settings.stripe_secret_key.clone()),
        notifier: services::notifier::OrderNotifier::new(settings.order_webhook_url.clone()),
    };

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().unwrap(),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
