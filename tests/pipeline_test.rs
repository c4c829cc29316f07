use async_trait::async_trait;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warp::Filter;

use car_deals_bot::core::{
    Config, HealthChecker, PipelineConfig, PipelineMetrics, ServerConfig, TelegramConfig,
};
use car_deals_bot::pipeline::Orchestrator;
use car_deals_bot::scanner::{sources, Aggregator, Listing, SourceAdapter, SourceError};
use car_deals_bot::server::{routes, AppState};

const TOKEN: &str = "123456:TEST";

/// Records every sendMessage body; rejects texts containing `reject_marker`.
#[derive(Clone, Default)]
struct FakeTelegram {
    sent: Arc<Mutex<Vec<Value>>>,
    get_me_calls: Arc<Mutex<usize>>,
    reject_marker: Option<&'static str>,
}

impl FakeTelegram {
    fn start(self) -> SocketAddr {
        let sent = self.sent.clone();
        let reject = self.reject_marker;
        let send_message = warp::path!(String / "sendMessage")
            .and(warp::post())
            .and(warp::body::json())
            .map(move |bot: String, body: Value| {
                assert_eq!(bot, format!("bot{}", TOKEN));
                let text = body["text"].as_str().unwrap_or_default().to_string();
                sent.lock().unwrap().push(body);

                let rejected = reject.map(|m| text.contains(m)).unwrap_or(false);
                let reply = if rejected {
                    json!({
                        "ok": false,
                        "error_code": 400,
                        "description": "Bad Request: can't parse entities"
                    })
                } else {
                    json!({"ok": true, "result": {"message_id": 1}})
                };
                warp::reply::json(&reply)
            });

        let calls = self.get_me_calls.clone();
        let get_me = warp::path!(String / "getMe").and(warp::get()).map(move |_bot: String| {
            *calls.lock().unwrap() += 1;
            warp::reply::json(&json!({
                "ok": true,
                "result": {
                    "id": 1,
                    "is_bot": true,
                    "first_name": "Car Data Bot",
                    "username": "car_data_bot"
                }
            }))
        });

        let (addr, server) =
            warp::serve(send_message.or(get_me)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|body| body["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

struct EmptySource;

#[async_trait]
impl SourceAdapter for EmptySource {
    fn source_name(&self) -> &'static str {
        "Empty"
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<Listing>, SourceError> {
        Ok(Vec::new())
    }
}

fn config(addr: Option<SocketAddr>, secret: Option<&str>) -> Config {
    Config {
        telegram: TelegramConfig {
            bot_token: addr.map(|_| TOKEN.to_string()),
            channel_id: Some("@car_deals".to_string()),
            api_base: addr
                .map(|a| format!("http://{}", a))
                .unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
            link_preview: false,
        },
        pipeline: PipelineConfig {
            cron_secret: secret.map(str::to_string),
            message_delay_ms: 0,
            header_pause_ms: 0,
            ..PipelineConfig::default()
        },
        server: ServerConfig {
            port: 0,
            log_level: "debug".to_string(),
        },
    }
}

fn app(config: &Config, sources: Vec<Arc<dyn SourceAdapter>>) -> Arc<AppState> {
    let metrics = PipelineMetrics::new().unwrap();
    let aggregator = Aggregator::new(sources, Duration::from_secs(5), "used-cars")
        .with_metrics(metrics.clone());
    let orchestrator =
        Arc::new(Orchestrator::from_config(config, Arc::new(aggregator), metrics.clone()).unwrap());

    Arc::new(AppState {
        health: HealthChecker::new(orchestrator.is_channel_configured()),
        orchestrator,
        metrics,
    })
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn scheduled_run_posts_header_and_top_five() {
    let telegram = FakeTelegram::default();
    let addr = telegram.clone().start();
    let api = routes(app(&config(Some(addr), Some("s3cret")), sources::default_sources()));

    let response = warp::test::request()
        .method("GET")
        .path("/api/cron")
        .header("authorization", "Bearer s3cret")
        .reply(&api)
        .await;

    assert_eq!(response.status(), 200);
    let body = json_body(response.body());
    assert_eq!(body["success"], true);
    assert_eq!(body["listingsFound"], 5);
    assert_eq!(body["listingsSent"], 5);

    let texts = telegram.texts();
    assert_eq!(texts.len(), 6);
    assert!(texts[0].contains("Found 5 new deals:"));
    assert!(texts[1].starts_with("🚗 *2022 Toyota Camry SE*"));
    assert!(texts[5].starts_with("🚗 *2021 BMW 3 Series 330i*"));
    assert!(texts[3].contains(r"📊 Source: Cars\.com"));

    let first = &telegram.sent.lock().unwrap()[0];
    assert_eq!(first["chat_id"], "@car_deals");
    assert_eq!(first["parse_mode"], "MarkdownV2");
    assert_eq!(first["disable_web_page_preview"], true);
}

#[tokio::test]
async fn scheduled_run_rejects_bad_credential_before_any_work() {
    let telegram = FakeTelegram::default();
    let addr = telegram.clone().start();
    let api = routes(app(&config(Some(addr), Some("s3cret")), sources::default_sources()));

    for header in [Some("Bearer wrong"), None] {
        let mut request = warp::test::request().method("GET").path("/api/cron");
        if let Some(value) = header {
            request = request.header("authorization", value);
        }
        let response = request.reply(&api).await;

        assert_eq!(response.status(), 401);
        assert_eq!(json_body(response.body())["error"], "Unauthorized");
    }

    assert!(telegram.texts().is_empty());
}

#[tokio::test]
async fn on_demand_run_counts_only_delivered_messages() {
    let telegram = FakeTelegram {
        reject_marker: Some("Mustang"),
        ..FakeTelegram::default()
    };
    let addr = telegram.clone().start();
    let api = routes(app(&config(Some(addr), None), sources::default_sources()));

    let response = warp::test::request()
        .method("POST")
        .path("/api/scrape")
        .reply(&api)
        .await;

    assert_eq!(response.status(), 200);
    let body = json_body(response.body());
    assert_eq!(body["listingsFound"], 7);
    assert_eq!(body["listingsSent"], 6);
    assert_eq!(body["listings"][6]["source"], "KBB");

    // the rejected listing was attempted, the rest still went out
    assert_eq!(telegram.texts().len(), 7);
}

#[tokio::test]
async fn empty_aggregation_reports_nothing_found() {
    let telegram = FakeTelegram::default();
    let addr = telegram.clone().start();
    let empty: Arc<dyn SourceAdapter> = Arc::new(EmptySource);
    let state = app(&config(Some(addr), None), vec![empty]);
    let api = routes(state.clone());

    let manual = warp::test::request().path("/api/scrape").reply(&api).await;
    assert_eq!(manual.status(), 404);
    assert_eq!(json_body(manual.body())["error"], "No listings found");

    let scheduled = warp::test::request().path("/api/cron").reply(&api).await;
    assert_eq!(scheduled.status(), 200);
    let body = json_body(scheduled.body());
    assert_eq!(body["success"], false);
    assert_eq!(body["listingsSent"], 0);
    assert_eq!(body["message"], "No listings found");

    assert!(telegram.texts().is_empty());
    let health = state.health.get_status().await;
    assert_eq!(health.last_run.map(|r| r.success), Some(false));
}

#[tokio::test]
async fn missing_configuration_is_a_server_error() {
    let api = routes(app(&config(None, None), sources::default_sources()));

    for path in ["/api/scrape", "/api/cron", "/api/test-telegram"] {
        let response = warp::test::request().path(path).reply(&api).await;
        assert_eq!(response.status(), 500, "{}", path);
        assert_eq!(
            json_body(response.body())["error"],
            "Telegram configuration missing"
        );
    }

    let health = warp::test::request().path("/health").reply(&api).await;
    assert_eq!(json_body(health.body())["status"], "degraded");
}

#[tokio::test]
async fn test_telegram_checks_identity_and_greets() {
    let telegram = FakeTelegram::default();
    let addr = telegram.clone().start();
    let api = routes(app(&config(Some(addr), None), sources::default_sources()));

    let response = warp::test::request().path("/api/test-telegram").reply(&api).await;

    assert_eq!(response.status(), 200);
    let body = json_body(response.body());
    assert_eq!(body["connected"], true);
    assert_eq!(body["messageSent"], true);
    assert_eq!(body["channelId"], "@car_deals");
    assert_eq!(*telegram.get_me_calls.lock().unwrap(), 1);
    assert!(telegram.texts()[0].starts_with(r"🤖 Car Data Bot is now active\!"));
}

#[tokio::test]
async fn metrics_endpoint_exposes_counters() {
    let telegram = FakeTelegram::default();
    let addr = telegram.clone().start();
    let api = routes(app(&config(Some(addr), None), sources::default_sources()));

    warp::test::request().path("/api/scrape").reply(&api).await;
    let response = warp::test::request().path("/metrics").reply(&api).await;

    assert_eq!(response.status(), 200);
    let text = String::from_utf8(response.body().to_vec()).unwrap();
    assert!(text.contains("car_deals_messages_total{outcome=\"sent\"} 7"));
    assert!(text.contains("car_deals_listings_collected_total{source=\"AutoTrader\"} 2"));
}
