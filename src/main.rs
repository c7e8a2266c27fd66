use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use psymetric::assessments::builtin;
use psymetric::assessments::catalog::MemoryCatalog;
use psymetric::assessments::contact::ContactDraft;
use psymetric::assessments::driver::SessionHandle;
use psymetric::assessments::routes::{assessment_router, AssessmentApi};
use psymetric::assessments::session::SessionController;
use psymetric::assessments::submission::{MemoryResultStore, RepositorySink};
use psymetric::config::AppConfig;
use psymetric::error::AppError;
use psymetric::telemetry;
use serde_json::json;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "psymetric",
    about = "Serve and exercise the embedded assessment engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a built-in assessment end to end and print the outcome
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Slug of the built-in assessment to run
    #[arg(long, default_value = builtin::ANXIETY_SLUG)]
    slug: String,
    /// Option index (0-based) selected for every question
    #[arg(long, default_value_t = 2)]
    option: usize,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let catalog = Arc::new(MemoryCatalog::with_definitions(builtin::all()));
    let repository = Arc::new(MemoryResultStore::new());
    let api = Arc::new(AssessmentApi::new(catalog, repository));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(assessment_router(api))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "assessment engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = MemoryCatalog::with_definitions(builtin::all());
    let repository = Arc::new(MemoryResultStore::new());
    let sink = Arc::new(RepositorySink::new(repository));

    let controller = SessionController::from_catalog(&catalog, &args.slug, sink)?;
    let definition = controller.definition().clone();
    let delay = config.assessments.advance_delay;
    let session = SessionHandle::new(controller, delay);

    println!("{} ({})", definition.title, definition.duration_label);
    println!("{}", definition.description);

    session.start()?;
    for (index, question) in definition.questions.iter().enumerate() {
        let option = question
            .options
            .get(args.option)
            .or_else(|| question.options.last())
            .expect("built-in questions carry options");
        println!(
            "Q{}: {} -> {} ({})",
            index + 1,
            question.prompt,
            option.label,
            option.value
        );
        session.select_answer(option.value)?;
        // Wait out the debounce so the session advances exactly as a
        // respondent would experience it.
        tokio::time::sleep(delay + Duration::from_millis(50)).await;
    }
    session.submit_answers()?;

    let receipt = session.save_results(&ContactDraft {
        first_name: "Demo".to_string(),
        last_name: "Respondent".to_string(),
        email: "demo@example.com".to_string(),
        phone: None,
    })?;

    session.with(|controller| {
        let score = controller.score().expect("score computed on save");
        println!("\nScore: {score} ({})", definition.scoring_method.label());
        match controller.interpretation() {
            Some(range) => println!("Interpretation: {} [{}]", range.label, range.severity),
            None => println!("Interpretation: no authored range matched"),
        }
    });
    println!("Saved as {}", receipt.result_id);
    println!("\n{}", definition.disclaimer);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
