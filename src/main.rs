//! Room Board Service
//!
//! Serves the room-status board of a single property over HTTP: floor
//! summaries, the per-floor room grid, and the two staff actions (capture
//! a room with guest details, release it back to available).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Room Board Service                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HTTP surface ──▶ Board (working set) ──▶ Tiered store      │
//! │                                            ├─ remote table  │
//! │                                            └─ local blob    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hyper::{Method, StatusCode};
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roomboard::adapters::{
    FallbackRoomStore, FileRoomStore, FileStoreConfig, LoggingEventPublisher, RemoteStoreConfig,
    RestRoomStore,
};
use roomboard::board::{Board, GuestCapture};
use roomboard::config::FloorPlan;
use roomboard::domain::ports::RoomStore;
use roomboard::domain::RoomId;
use roomboard::error::{Error, Result};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Room Board - per-floor room status with remote-primary, local-fallback persistence
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Remote room table base URL
    #[arg(long, env = "REMOTE_URL", default_value = "http://localhost:3000")]
    remote_url: String,

    /// Remote room table API key
    #[arg(long, env = "REMOTE_API_KEY", default_value = "")]
    remote_api_key: String,

    /// Remote room table name
    #[arg(long, env = "REMOTE_TABLE", default_value = "rooms")]
    remote_table: String,

    /// Remote request timeout in seconds
    #[arg(long, env = "REMOTE_TIMEOUT_SECONDS", default_value = "10")]
    remote_timeout_seconds: u64,

    /// Local fallback blob path
    #[arg(
        long,
        env = "FALLBACK_PATH",
        default_value = "/var/lib/roomboard/rooms.json"
    )]
    fallback_path: PathBuf,

    /// Number of floors
    #[arg(long, env = "FLOORS", default_value = "3")]
    floors: u32,

    /// Rooms per floor
    #[arg(long, env = "ROOMS_PER_FLOOR", default_value = "10")]
    rooms_per_floor: u32,

    /// Server bind address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    info!("Starting room board service");
    info!("  Remote table: {}/rest/v1/{}", args.remote_url, args.remote_table);
    info!("  Fallback blob: {}", args.fallback_path.display());
    info!(
        "  Floor plan: {} floors x {} rooms",
        args.floors, args.rooms_per_floor
    );

    let plan = FloorPlan::new(args.floors, args.rooms_per_floor)?;

    let remote = RestRoomStore::new(RemoteStoreConfig {
        base_url: args.remote_url.clone(),
        api_key: args.remote_api_key.clone(),
        table: args.remote_table.clone(),
        timeout: Duration::from_secs(args.remote_timeout_seconds),
    })?;
    let local = FileRoomStore::new(FileStoreConfig {
        path: args.fallback_path.clone(),
    });
    let store: Arc<dyn RoomStore> =
        Arc::new(FallbackRoomStore::new(Arc::new(remote), Arc::new(local)));

    // The board works without the remote; only tell the operator
    if let Err(e) = store.health_check().await {
        warn!("Store health check failed: {}", e);
        warn!("Continuing - the board will run on the local fallback");
    } else {
        info!("Persistence healthy");
    }

    let events = Arc::new(LoggingEventPublisher::info_level());
    let board = Arc::new(Board::new(plan, store, events));

    // Start the HTTP surface
    let listen_addr = args.listen_addr.clone();
    let server_board = Arc::clone(&board);
    tokio::spawn(async move {
        if let Err(e) = run_server(&listen_addr, server_board).await {
            error!("Server error: {}", e);
        }
    });

    // Drain floor writers on shutdown so queued saves land
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, draining floor writers");
    board.close().await;

    info!("Room board shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

// =============================================================================
// HTTP Surface
// =============================================================================

async fn run_server(addr: &str, board: Arc<Board>) -> Result<()> {
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper_util::rt::TokioIo;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind server: {}", e)))?;

    info!("Room board listening on {}", addr);

    loop {
        let (stream, _) = listener
            .accept()
            .await
            .map_err(|e| Error::Internal(format!("Server accept error: {}", e)))?;

        let io = TokioIo::new(stream);
        let board = Arc::clone(&board);

        tokio::spawn(async move {
            let service = service_fn(move |req| handle(Arc::clone(&board), req));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::error!("Server connection error: {}", e);
            }
        });
    }
}

type HttpResponse = hyper::Response<http_body_util::Full<hyper::body::Bytes>>;

async fn handle(
    board: Arc<Board>,
    req: hyper::Request<hyper::body::Incoming>,
) -> std::result::Result<HttpResponse, std::convert::Infallible> {
    use http_body_util::BodyExt;

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let response = match segments.as_slice() {
        ["healthz"] | ["livez"] => text_response(StatusCode::OK, "ok"),
        ["readyz"] => text_response(StatusCode::OK, "ok"),

        ["metrics"] if method == Method::GET => metrics_response(),

        ["floors"] if method == Method::GET => match board.summaries().await {
            Ok(summaries) => json_response(StatusCode::OK, &summaries),
            Err(e) => error_response(&e),
        },

        ["floors", floor] if method == Method::GET => match parse_floor(floor) {
            Ok(floor) => match board.floor(floor).await {
                Ok(floor_board) => match floor_board.rooms() {
                    Ok(rooms) => json_response(StatusCode::OK, &rooms),
                    Err(e) => error_response(&e),
                },
                Err(e) => error_response(&e),
            },
            Err(e) => error_response(&e),
        },

        ["floors", floor, "rooms", room_id, "capture"] if method == Method::POST => {
            let floor = match parse_floor(floor) {
                Ok(floor) => floor,
                Err(e) => return Ok(error_response(&e)),
            };
            let room_id = RoomId::from(*room_id);

            let body = match req.into_body().collect().await {
                Ok(body) => body.to_bytes(),
                Err(e) => {
                    return Ok(text_response(
                        StatusCode::BAD_REQUEST,
                        &format!("unreadable body: {}", e),
                    ))
                }
            };
            let form: GuestCapture = match serde_json::from_slice(&body) {
                Ok(form) => form,
                Err(e) => {
                    return Ok(text_response(
                        StatusCode::BAD_REQUEST,
                        &format!("invalid capture form: {}", e),
                    ))
                }
            };

            match capture(&board, floor, &room_id, form).await {
                Ok(room) => json_response(StatusCode::OK, &room),
                Err(e) => error_response(&e),
            }
        }

        ["floors", floor, "rooms", room_id, "release"] if method == Method::POST => {
            let floor = match parse_floor(floor) {
                Ok(floor) => floor,
                Err(e) => return Ok(error_response(&e)),
            };
            let room_id = RoomId::from(*room_id);

            match release(&board, floor, &room_id).await {
                Ok(room) => json_response(StatusCode::OK, &room),
                Err(e) => error_response(&e),
            }
        }

        _ => text_response(StatusCode::NOT_FOUND, "not found"),
    };

    Ok(response)
}

async fn capture(
    board: &Board,
    floor: u32,
    room_id: &RoomId,
    form: GuestCapture,
) -> Result<roomboard::Room> {
    let floor_board = board.floor(floor).await?;
    floor_board.capture(room_id, form).await
}

async fn release(board: &Board, floor: u32, room_id: &RoomId) -> Result<roomboard::Room> {
    let floor_board = board.floor(floor).await?;
    floor_board.release(room_id).await
}

fn parse_floor(raw: &str) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| Error::UnknownFloor { floor: 0 })
}

// =============================================================================
// Response Helpers
// =============================================================================

fn text_response(status: StatusCode, body: &str) -> HttpResponse {
    use http_body_util::Full;
    use hyper::body::Bytes;

    hyper::Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    use http_body_util::Full;
    use hyper::body::Bytes;

    let bytes = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    hyper::Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(bytes)))
        .unwrap()
}

fn error_response(e: &Error) -> HttpResponse {
    let status = match e {
        Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::UnknownFloor { .. } | Error::RoomNotFound { .. } => StatusCode::NOT_FOUND,
        Error::NotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_response(status, &serde_json::json!({ "error": e.to_string() }))
}

fn metrics_response() -> HttpResponse {
    use http_body_util::Full;
    use hyper::body::Bytes;
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return text_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("metrics encoding failed: {}", e),
        );
    }

    hyper::Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", encoder.format_type())
        .body(Full::new(Bytes::from(buffer)))
        .unwrap()
}
