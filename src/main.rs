use std::sync::Arc;

use actix_web::{web, App, HttpServer};

mod config;
mod errors;
mod fsops;
mod handlers;
mod state;
mod util;
mod ytdlp;

use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cfg_path = std::env::args()
        .skip_while(|a| a != "--config")
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let cfg = match config::AppConfig::load(&cfg_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[CONFIG] Failed to load {}: {:#}", cfg_path, e);
            std::process::exit(1);
        }
    };

    println!("========================================");
    println!("  Descargador de Audio y Video");
    println!("  http://{}", cfg.listen_addr);
    println!("========================================");
    println!();

    let state = web::Data::new(AppState {
        config: Arc::new(cfg),
    });

    let bind_addr = state.config.listen_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(state.clone())
            .service(web::resource("/").route(web::get().to(handlers::index)))
            .service(web::resource("/api/check_path").route(web::post().to(handlers::check_path)))
            .service(
                web::resource("/api/list_folders").route(web::post().to(handlers::list_folders)),
            )
            .service(web::resource("/download").route(web::post().to(handlers::download)))
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
