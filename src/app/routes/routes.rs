use actix_web::{web, http::StatusCode, HttpResponse, Responder};
use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::ai_agent::error::SessionError;
use crate::ai_agent::session::filter::FilterCriteria;
use crate::app::controller::session_controllers::SessionController;

#[derive(Deserialize, Serialize)]
pub struct TickerSearchQuery {
  query: Option<String>,
  limit: Option<usize>,
}

#[derive(Deserialize, Serialize)]
pub struct AddTickerRequest {
  ticker: String,
}

#[derive(Deserialize, Serialize)]
pub struct SearchRequest {
  query: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct ToggleRequest {
  ticker: String,
  year: i32,
  quarter: u8,
}

#[derive(Deserialize, Serialize)]
pub struct ChatRequest {
  question: String,
}

pub fn error_status(e: &SessionError) -> StatusCode {
  match e {
    SessionError::Validation(_) => StatusCode::BAD_REQUEST,
    SessionError::UnknownTranscript(_) | SessionError::TickerNotSelected(_) => StatusCode::NOT_FOUND,
    SessionError::NothingSelected => StatusCode::CONFLICT,
    SessionError::Completion(_) => StatusCode::BAD_GATEWAY,
    SessionError::RuntimeUnavailable => StatusCode::SERVICE_UNAVAILABLE,
  }
}

fn respond<T: Serialize>(result: Result<T, SessionError>) -> HttpResponse {
  match result {
    Ok(body) => HttpResponse::Ok().json(body),
    Err(e) => HttpResponse::build(error_status(&e)).json(serde_json::json!({
      "error": e.to_string(),
      "kind": e.kind(),
    })),
  }
}


pub struct Routes;

impl Routes {

  pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(Self::health)));
    cfg.service(web::resource("/tickers").route(web::get().to(Self::search_tickers)));
    cfg.service(web::resource("/session").route(web::get().to(Self::get_session)));
    cfg.service(web::resource("/session/tickers").route(web::post().to(Self::add_ticker)));
    cfg.service(web::resource("/session/tickers/{ticker}").route(web::delete().to(Self::remove_ticker)));
    cfg.service(web::resource("/session/search").route(web::put().to(Self::set_search)));
    cfg.service(web::resource("/session/filters")
      .route(web::put().to(Self::set_filters))
      .route(web::delete().to(Self::clear_filters)));
    cfg.service(web::resource("/session/selection").route(web::post().to(Self::toggle_transcript)));
    cfg.service(web::resource("/session/transcripts/{ticker}/{year}/{quarter}").route(web::get().to(Self::get_transcript)));
    cfg.service(web::resource("/session/analysis").route(web::post().to(Self::analyze)));
    cfg.service(web::resource("/session/chat").route(web::post().to(Self::chat)));
  }

  async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
      "status": "ok",
      "Info": "Earnings transcript chat service.",
      "code": 200,
    }))
  }

  async fn search_tickers(controller: web::Data<Arc<SessionController>>, query: web::Query<TickerSearchQuery>) -> impl Responder {
    HttpResponse::Ok().json(controller.search_tickers(query.query.as_deref(), query.limit))
  }

  async fn get_session(controller: web::Data<Arc<SessionController>>) -> impl Responder {
    respond(controller.get_session().await)
  }

  async fn add_ticker(controller: web::Data<Arc<SessionController>>, request: web::Json<AddTickerRequest>) -> impl Responder {
    respond(controller.add_ticker(&request.ticker).await)
  }

  async fn remove_ticker(controller: web::Data<Arc<SessionController>>, path: web::Path<String>) -> impl Responder {
    let ticker: String = path.into_inner();
    respond(controller.remove_ticker(&ticker).await)
  }

  async fn set_search(controller: web::Data<Arc<SessionController>>, request: web::Json<SearchRequest>) -> impl Responder {
    respond(controller.set_search(request.into_inner().query).await)
  }

  async fn set_filters(controller: web::Data<Arc<SessionController>>, request: web::Json<FilterCriteria>) -> impl Responder {
    respond(controller.set_filters(request.into_inner()).await)
  }

  async fn clear_filters(controller: web::Data<Arc<SessionController>>) -> impl Responder {
    respond(controller.clear_filters().await)
  }

  async fn toggle_transcript(controller: web::Data<Arc<SessionController>>, request: web::Json<ToggleRequest>) -> impl Responder {
    respond(controller.toggle_transcript(&request.ticker, request.year, request.quarter).await)
  }

  async fn get_transcript(controller: web::Data<Arc<SessionController>>, path: web::Path<(String, i32, u8)>) -> impl Responder {
    let (ticker, year, quarter) = path.into_inner();
    respond(controller.get_transcript(&ticker, year, quarter).await)
  }

  async fn analyze(controller: web::Data<Arc<SessionController>>) -> impl Responder {
    respond(controller.analyze().await)
  }

  async fn chat(controller: web::Data<Arc<SessionController>>, request: web::Json<ChatRequest>) -> impl Responder {
    respond(controller.ask(&request.question).await)
  }

}
