//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::commands::generate::reload_and_run;
use crate::Site;

const LIVE_RELOAD_PATH: &str = "/__livereload";

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server options from the command line
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub ip: String,
    pub port: u16,
    pub watch: bool,
    pub open: bool,
}

struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the development server
pub async fn start(site: &Site, options: ServerOptions) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: options.watch,
    });

    let app = Router::new()
        .route(LIVE_RELOAD_PATH, get(livereload_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let bind_ip = if options.ip == "localhost" {
        "127.0.0.1"
    } else {
        options.ip.as_str()
    };
    let addr: SocketAddr = format!("{}:{}", bind_ip, options.port).parse()?;

    let url = format!("http://{}:{}", options.ip, options.port);
    println!("Server running at {}", url);
    if options.watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if options.open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if options.watch {
        let site = site.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(site, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild on change and tell connected browsers to reload
async fn watch_and_reload(site: Site, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&site.source_dir, &site.static_dir, &site.template_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    // The debouncer delivers on a std channel; keep the blocking recv off
    // the async workers
    tokio::task::spawn_blocking(move || {
        let _debouncer = debouncer;
        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    let relevant: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                    if relevant.is_empty() {
                        continue;
                    }

                    for event in &relevant {
                        tracing::info!("File changed: {}", event.path.display());
                    }

                    match reload_and_run(&site) {
                        Ok(report) => {
                            tracing::info!("Regenerated {} pages", report.pages);
                            let _ = reload_tx.send(());
                        }
                        Err(e) => tracing::error!("Generation failed: {:#}", e),
                    }
                }
                Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
                Err(e) => {
                    tracing::error!("Channel error: {:?}", e);
                    break;
                }
            }
        }
    })
    .await?;

    Ok(())
}

/// Editor droppings and VCS metadata do not trigger rebuilds
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve files from the public directory, injecting the reload script into HTML
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let file_path = resolve_file(&state.public_dir, request.uri().path());

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Map a request path to a file under `public_dir`
///
/// Page paths are written as `<path>/index.html`, so `/hello` and `/hello/`
/// both resolve to the same file.
fn resolve_file(public_dir: &Path, request_path: &str) -> PathBuf {
    let clean_path = request_path.trim_start_matches('/');
    if clean_path.is_empty() {
        return public_dir.join("index.html");
    }
    if clean_path.split('/').any(|part| part == "..") {
        return public_dir.join("__invalid__");
    }

    let candidate = public_dir.join(clean_path);
    if candidate.is_dir() {
        candidate.join("index.html")
    } else if candidate.exists() {
        candidate
    } else {
        let with_html = public_dir.join(format!("{}.html", clean_path.trim_end_matches('/')));
        if with_html.exists() {
            with_html
        } else {
            candidate
        }
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
