use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{Authority, RefreshTokenStore};
use crate::configuration::Settings;
use crate::logger::LoggerMiddleware;
use crate::metrics::HitCounter;
use crate::middleware::HitCounterMiddleware;
use crate::routes::{
    create_chirp, create_user, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, reset, revoke, validate_chirp,
};
use crate::store::{ChirpStore, MemoryStore, PgStore, UserStore};

/// Everything the HTTP server shares between workers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub chirps: Arc<dyn ChirpStore>,
    pub settings: Settings,
    pub hits: HitCounter,
}

impl AppState {
    /// All records live in Postgres
    pub fn postgres(pool: PgPool, settings: Settings) -> Self {
        let store = Arc::new(PgStore::new(pool, settings.jwt.refresh_token_ttl()));
        Self::with_store(store, settings)
    }

    /// All records live in process memory and are lost on exit
    pub fn in_memory(settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::new(settings.jwt.refresh_token_ttl()));
        Self::with_store(store, settings)
    }

    fn with_store<S>(store: Arc<S>, settings: Settings) -> Self
    where
        S: UserStore + RefreshTokenStore + ChirpStore + 'static,
    {
        Self {
            users: store.clone(),
            refresh_tokens: store.clone(),
            chirps: store,
            settings,
            hits: HitCounter::new(),
        }
    }

    pub fn authority(&self) -> Authority {
        Authority::new(
            self.users.clone(),
            self.refresh_tokens.clone(),
            self.settings.jwt.clone(),
        )
    }
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let authority = web::Data::new(state.authority());
    let users: web::Data<dyn UserStore> = web::Data::from(state.users.clone());
    let chirps: web::Data<dyn ChirpStore> = web::Data::from(state.chirps.clone());
    let hits = web::Data::new(state.hits.clone());
    let application = web::Data::new(state.settings.application.clone());
    let polka = web::Data::new(state.settings.polka.clone());
    let counter = state.hits;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)
            .app_data(authority.clone())
            .app_data(users.clone())
            .app_data(chirps.clone())
            .app_data(hits.clone())
            .app_data(application.clone())
            .app_data(polka.clone())
            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/users", web::post().to(create_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/validate_chirp", web::post().to(validate_chirp))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp))
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )
            // Only file server traffic is counted
            .service(
                web::scope("/app")
                    .wrap(HitCounterMiddleware::new(counter.clone()))
                    .service(fs::Files::new("", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
