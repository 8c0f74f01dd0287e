use std::env;
use std::future::IntoFuture;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::convert;
use crate::ProfileError;

/// Path of the route serving the converted profile.
pub const TASKS_ROUTE: &str = "/tasks";

/// Environment variable selecting the [`Mode`]; `production` selects [`Mode::Production`].
pub const MODE_VAR: &str = "TASKPROF_ENV";

/// Task file read when none is configured.
pub const DEFAULT_TASKS_FILE: &str = "./tasks.json";

/// Static directory served when none is configured.
pub const DEFAULT_STATIC_DIR: &str = "./static";

const DEV_PORT: u16 = 8181;
const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;
const TLS_CERT: &str = "./ssl.crt";
const TLS_KEY: &str = "./ssl.key";

/// Which listeners to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Plain HTTP on port 8181.
    Development,
    /// Plain HTTP on port 80 and HTTPS on port 443.
    Production,
}

impl Mode {
    /// Reads the mode from [`MODE_VAR`]; anything but `production` means development.
    pub fn from_env() -> Self {
        match env::var(MODE_VAR) {
            Ok(mode) if mode == "production" => Mode::Production,
            _ => Mode::Development,
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Listeners to start.
    pub mode: Mode,
    /// Task-group export converted on every request to [`TASKS_ROUTE`].
    pub tasks: PathBuf,
    /// Directory serving every other path, except for `tls_cert` and `tls_key` if they lie inside it.
    pub static_dir: PathBuf,
    /// PEM certificate chain for HTTPS.
    pub tls_cert: PathBuf,
    /// PEM private key for HTTPS.
    pub tls_key: PathBuf,
    /// Conversion options.
    pub options: convert::Options,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Development,
            tasks: PathBuf::from(DEFAULT_TASKS_FILE),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            tls_cert: PathBuf::from(TLS_CERT),
            tls_key: PathBuf::from(TLS_KEY),
            options: convert::Options::default(),
        }
    }
}

#[derive(Debug)]
struct AppState {
    tasks: PathBuf,
    options: convert::Options,
}

#[derive(Debug)]
struct TlsFiles {
    static_dir: PathBuf,
    files: [PathBuf; 2],
}

impl TlsFiles {
    /// Whether `path`, as the static file server would resolve it, names one of the TLS files.
    async fn covers(&self, path: &str) -> bool {
        let Ok(path) = percent_decode_str(path).decode_utf8() else {
            return false;
        };
        let Ok(target) = canonical(&self.static_dir.join(path.trim_start_matches('/'))).await else {
            return false;
        };
        for file in &self.files {
            match canonical(file).await {
                Ok(file) if file == target => return true,
                _ => {}
            }
        }
        false
    }
}

async fn canonical(path: &Path) -> io::Result<PathBuf> {
    tokio::fs::canonicalize(path).await
}

/// Builds the request handler: the profile on [`TASKS_ROUTE`], static files everywhere else.
///
/// Every request is logged before it is dispatched. The configured TLS certificate and key are
/// never served, even when they sit in the static directory.
pub fn router(config: &Config) -> Router {
    let state = Arc::new(AppState {
        tasks: config.tasks.clone(),
        options: config.options.clone(),
    });
    let tls_files = Arc::new(TlsFiles {
        static_dir: config.static_dir.clone(),
        files: [config.tls_cert.clone(), config.tls_key.clone()],
    });

    Router::new()
        .route(TASKS_ROUTE, get(tasks))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(state)
        .layer(middleware::from_fn_with_state(tls_files, refuse_tls_files))
        .layer(middleware::from_fn(log_request))
}

async fn log_request(request: Request, next: Next) -> Response {
    info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

async fn refuse_tls_files(
    State(tls_files): State<Arc<TlsFiles>>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() != TASKS_ROUTE && tls_files.covers(request.uri().path()).await {
        warn!("refusing to serve {}", request.uri().path());
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

async fn tasks(State(state): State<Arc<AppState>>) -> Response {
    match build_profile(&state).await {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("profile: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                format!("profile: {}\n", e),
            )
                .into_response()
        }
    }
}

// Nothing is cached between requests: the file is read again and the profile is dropped once
// serialized.
async fn build_profile(state: &AppState) -> Result<Vec<u8>, ProfileError> {
    let bytes = tokio::fs::read(&state.tasks).await?;
    let profile = convert::from_slice(&state.options, &bytes)?;
    Ok(serde_json::to_vec(&profile)?)
}

fn any_addr(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Runs the server until one of its listeners fails.
pub async fn serve(config: Config) -> io::Result<()> {
    let app = router(&config);
    match config.mode {
        Mode::Development => {
            let listener = TcpListener::bind(any_addr(DEV_PORT)).await?;
            info!("Testing server running at port {}", DEV_PORT);
            axum::serve(listener, app).await
        }
        Mode::Production => {
            let tls = RustlsConfig::from_pem_file(&config.tls_cert, &config.tls_key).await?;
            let listener = TcpListener::bind(any_addr(HTTP_PORT)).await?;
            let http = axum::serve(listener, app.clone());
            let https = axum_server::bind_rustls(any_addr(HTTPS_PORT), tls)
                .serve(app.into_make_service());
            info!(
                "Production server running at ports {} and {}",
                HTTP_PORT, HTTPS_PORT
            );
            tokio::try_join!(http.into_future(), https)?;
            Ok(())
        }
    }
}
