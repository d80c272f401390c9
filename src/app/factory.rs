use actix_web::{web, App};
use std::sync::Arc;

use crate::app::config::Config;
use crate::app::routes::routes::Routes;

use super::controller::session_controllers::SessionController;
use super::services::service::TranscriptServices;
use super::services::session_service::SessionService;

/// Shared across workers. Built once so every worker talks to the same session.
#[derive(Clone)]
pub struct AppState {
  pub session_controller: Arc<SessionController>
}

impl AppState {

  pub fn new(app_config: &Config) -> Self {
    let session_service : SessionService = SessionService::new(app_config);
    Self::from_service(session_service)
  }

  pub fn from_service(session_service: SessionService) -> Self {
    let transcript_services: Arc<TranscriptServices> = Arc::new(TranscriptServices::new(session_service));
    let session_controller : Arc<SessionController> = Arc::new(SessionController::new(transcript_services));
    AppState { session_controller }
  }
}

pub struct CreateApp {
  app_state: AppState,
}

impl CreateApp {
  pub fn new(app_state: AppState) -> Self {
    CreateApp { app_state }
  }

  pub fn build_app(&self,) -> App<impl actix_web::dev::ServiceFactory<actix_web::dev::ServiceRequest,Config = (),Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,Error = actix_web::Error,InitError = (),>,> {
    App::new()
    .app_data(web::Data::new(self.app_state.session_controller.clone()))
    .configure(Routes::configure)
  }
}
