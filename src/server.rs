use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::core::{HealthChecker, PipelineMetrics};
use crate::pipeline::{bearer_token, Orchestrator, PipelineError, RunOutcome, RunResult};

pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub health: HealthChecker,
    pub metrics: PipelineMetrics,
}

/// `/api/scrape`, `/api/cron`, `/api/test-telegram`, `/health`, `/metrics`.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_state = warp::any().map(move || state.clone());

    let scrape = warp::path!("api" / "scrape")
        .and(warp::get().or(warp::post()).unify())
        .and(with_state.clone())
        .and_then(handle_scrape);

    let cron = warp::path!("api" / "cron")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_state.clone())
        .and_then(handle_cron);

    let test_telegram = warp::path!("api" / "test-telegram")
        .and(warp::get())
        .and(with_state.clone())
        .and_then(handle_test_telegram);

    let health = warp::path!("health")
        .and(warp::get())
        .and(with_state.clone())
        .and_then(|state: Arc<AppState>| async move {
            let status = state.health.get_status().await;
            Ok::<_, Infallible>(warp::reply::json(&status).into_response())
        });

    let metrics = warp::path!("metrics")
        .and(warp::get())
        .and(with_state)
        .and_then(handle_metrics);

    scrape
        .or(cron)
        .unify()
        .or(test_telegram)
        .unify()
        .or(health)
        .unify()
        .or(metrics)
        .unify()
        .with(warp::trace::request())
}

async fn handle_scrape(state: Arc<AppState>) -> Result<Response, Infallible> {
    let reply = match state.orchestrator.run_on_demand().await {
        Ok(result) => {
            state.health.record_run(&result).await;
            if result.outcome == RunOutcome::NoListings {
                error_reply(StatusCode::NOT_FOUND, "No listings found", None)
            } else {
                run_reply(&result)
            }
        }
        Err(e) => pipeline_error_reply(e),
    };
    Ok(reply)
}

async fn handle_cron(
    authorization: Option<String>,
    state: Arc<AppState>,
) -> Result<Response, Infallible> {
    let credential = bearer_token(authorization.as_deref());

    let reply = match state.orchestrator.run_scheduled(credential).await {
        Ok(result) => {
            state.health.record_run(&result).await;
            run_reply(&result)
        }
        Err(e) => pipeline_error_reply(e),
    };
    Ok(reply)
}

async fn handle_test_telegram(state: Arc<AppState>) -> Result<Response, Infallible> {
    let reply = match state.orchestrator.check_channel().await {
        Ok(check) if check.connected => warp::reply::with_status(
            warp::reply::json(&json!({
                "success": true,
                "connected": check.connected,
                "messageSent": check.message_sent,
                "channelId": check.channel_id,
                "message": "Telegram bot is configured correctly",
            })),
            StatusCode::OK,
        )
        .into_response(),
        Ok(_) => error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to connect to Telegram API",
            None,
        ),
        Err(e) => pipeline_error_reply(e),
    };
    Ok(reply)
}

async fn handle_metrics(state: Arc<AppState>) -> Result<Response, Infallible> {
    let reply = match state.metrics.render() {
        Ok(body) => warp::reply::with_header(body, "content-type", "text/plain; version=0.0.4")
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to render metrics: {}", e);
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Metrics unavailable", None)
        }
    };
    Ok(reply)
}

fn run_reply(result: &RunResult) -> Response {
    warp::reply::with_status(warp::reply::json(result), StatusCode::OK).into_response()
}

fn pipeline_error_reply(err: PipelineError) -> Response {
    match err {
        PipelineError::Unauthorized => error_reply(StatusCode::UNAUTHORIZED, "Unauthorized", None),
        PipelineError::Config(e) => error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Telegram configuration missing",
            Some(e.to_string()),
        ),
    }
}

fn error_reply(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = match details {
        Some(details) => json!({ "error": error, "details": details }),
        None => json!({ "error": error }),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}
