//! Service entry-point: wires collaborators, sessions, and REST endpoints.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use mongodb::Client;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use estate_backend::config::AppConfig;
use estate_backend::domain::ports::{
    DescriptionGenerator, FixtureDescriptionGenerator, ListingRepository,
};
use estate_backend::domain::ListingService;
#[cfg(debug_assertions)]
use estate_backend::doc::ApiDoc;
use estate_backend::inbound::http::health::{live, ready, HealthState};
use estate_backend::inbound::http::listings::{
    create_listing, delete_listing, get_listing, search_listings, update_listing,
};
use estate_backend::inbound::http::state::HttpState;
use estate_backend::inbound::http::users::login;
use estate_backend::outbound::generation::OpenAiHttpGenerator;
use estate_backend::outbound::persistence::{MemoryListingRepository, MongoListingRepository};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let key = load_session_key(&config)?;
    let state = build_state(&config).await.map_err(std::io::Error::other)?;

    let cookie_secure = config.session.cookie_secure;
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let bind_address = config.bind_address.clone();

    info!(address = %bind_address, "starting listing backend");
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api")
            .wrap(session)
            .service(login)
            .service(create_listing)
            .service(search_listings)
            .service(get_listing)
            .service(update_listing)
            .service(delete_listing);

        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(web::Data::new(state.clone()))
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(bind_address)?;

    health_state.mark_ready();
    server.run().await
}

/// Load the session signing key, falling back to an ephemeral key only when
/// allowed (debug builds or an explicit opt-in).
fn load_session_key(config: &AppConfig) -> std::io::Result<Key> {
    match std::fs::read(&config.session.key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            if cfg!(debug_assertions) || config.session.allow_ephemeral_key {
                warn!(
                    path = %config.session.key_file,
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {error}",
                    config.session.key_file
                )))
            }
        }
    }
}

/// Wire the listing service from configuration. Absent collaborators fall
/// back to in-process stand-ins so the service stays runnable in development.
async fn build_state(config: &AppConfig) -> Result<HttpState, String> {
    let generator: Arc<dyn DescriptionGenerator> = match &config.completion.api_key {
        Some(api_key) => Arc::new(
            OpenAiHttpGenerator::new(
                config.completion.base_url.clone(),
                api_key.clone(),
                config.completion.model.clone(),
                config.completion.timeout,
            )
            .map_err(|error| error.to_string())?,
        ),
        None => {
            warn!("OPENAI_API_KEY not set; using the fixture description generator");
            Arc::new(FixtureDescriptionGenerator)
        }
    };

    let repository: Arc<dyn ListingRepository> = match &config.mongodb_uri {
        Some(uri) => {
            let client = Client::with_uri_str(uri)
                .await
                .map_err(|error| format!("failed to initialise the MongoDB client: {error}"))?;
            info!(database = %config.mongodb_database, "using the MongoDB listing store");
            Arc::new(MongoListingRepository::new(
                &client,
                &config.mongodb_database,
            ))
        }
        None => {
            warn!("MONGODB_URI not set; using the in-memory listing store");
            Arc::new(MemoryListingRepository::new())
        }
    };

    let service = ListingService::with_policy(repository, generator, config.search);
    Ok(HttpState::from_service(Arc::new(service)))
}
