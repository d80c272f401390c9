use actix_web::HttpServer;
use std::env;

use crate::app::config::Config;
use crate::app::factory::{AppState, CreateApp};

mod app;
mod ai_agent;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  if env::var_os("RUST_LOG").is_none() {
    env::set_var("RUST_LOG", "actix_web=info,info");
  }
  env_logger::init();

  let config : Config = match Config::load() {
    Ok(config) => config,
    Err(e) => {
      log::error!("Configuration error: {:#}", e);
      std::process::exit(1);
    }
  };

  log::info!("Using {} model {} for completions", config.completion_provider, config.completion_model);
  let app_state: AppState = AppState::new(&config);

  let server_builder = HttpServer::new(move || {
    let factory: CreateApp = CreateApp::new(app_state.clone());
    factory.build_app().wrap(actix_web::middleware::Logger::default())
  });

  let server = server_builder.bind((config.bind_host.as_str(), config.bind_port))?;
  log::info!("Listening on {}:{}", config.bind_host, config.bind_port);

  server.run().await?;

  Ok(())
}
