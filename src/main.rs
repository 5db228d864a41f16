use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};

use toolhub_server::{
    app_state::AppState,
    config::Config,
    handlers,
    middleware::{cors, EnvelopeGuard},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config.log_warnings();

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config).map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(cors(&state.config))
            .wrap(EnvelopeGuard)
            .wrap(Logger::default())
            .configure(handlers::configure_app(state.clone()))
            .default_service(web::to(handlers::not_found))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
