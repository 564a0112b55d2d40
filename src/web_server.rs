use anyhow::{Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Request, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    serve, Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::constants;
use crate::llm::LanguageModel;
use crate::session::{Session, SessionError};

/// Frames sent by the browser.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Answer { text: String },
}

/// Frames sent to the browser.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Assistant { content: String },
    User { content: String },
    /// Radar chart for the recruiter panel, as an SVG document.
    Chart { svg: String },
    Error { message: String },
}

/// Whether the connection stays up after a frame was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    model: Arc<dyn LanguageModel>,
}

// Minijinja Environment setup
fn create_minijinja_env(dir: String) -> AutoReloader {
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&dir));
        // Watch the templates directory for changes
        notifier.watch_path(&dir, true);
        Ok(env)
    })
}

async fn index_handler(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    state
        .templates
        .acquire_env()
        .and_then(|env| {
            env.get_template("index.html").and_then(|tmpl| {
                let context = minijinja::context! {
                    title => "Candidate Interview",
                    input_placeholder => "Please answer the question.",
                };
                tmpl.render(context)
            })
        })
        .map(Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Internal Server Error: {}", e)),
            )
        })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("WebSocket connection upgrade requested");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one text frame from the browser against the connection's session.
///
/// Bad frames and empty answers are reported and the connection stays up.
/// Model failures end the session.
pub async fn process_client_text(
    session: &mut Session,
    model: &dyn LanguageModel,
    text: &str,
) -> (Vec<ServerMessage>, Flow) {
    let answer = match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Answer { text }) => text,
        Err(e) => {
            warn!("Ignoring malformed client frame: {}", e);
            let message = format!("Malformed message: {}", e);
            return (vec![ServerMessage::Error { message }], Flow::Continue);
        }
    };

    match session.handle_answer(model, &answer).await {
        Ok(outcome) => {
            let mut messages = vec![
                ServerMessage::User {
                    content: answer.trim().to_string(),
                },
                ServerMessage::Assistant {
                    content: outcome.reply,
                },
            ];
            if let Some(chart) = outcome.chart {
                messages.push(ServerMessage::Chart {
                    svg: chart.render_svg(),
                });
            }
            (messages, Flow::Continue)
        }
        Err(SessionError::EmptyAnswer) => (
            vec![ServerMessage::Error {
                message: "Please type an answer before sending.".to_string(),
            }],
            Flow::Continue,
        ),
        Err(e) => {
            error!(session_id = %session.id(), "Interview turn failed: {}", e);
            (
                vec![ServerMessage::Error {
                    message: e.to_string(),
                }],
                Flow::Close,
            )
        }
    }
}

// One WebSocket connection is one interview session.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let mut session = match Session::start(state.model.as_ref()).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to start interview session: {}", e);
            let frame = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Ok(json_msg) = serde_json::to_string(&frame) {
                let _ = sender.send(Message::Text(json_msg)).await;
            }
            return;
        }
    };

    let opening: Vec<ServerMessage> = session
        .transcript()
        .iter()
        .map(|turn| ServerMessage::Assistant {
            content: turn.content.clone(),
        })
        .collect();
    if send_all(&mut sender, &opening).await.is_err() {
        warn!("Failed to send opening question to new WebSocket client");
        session.finish();
        return;
    }

    while let Some(frame) = receiver.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        };
        match msg {
            Message::Text(text) => {
                let (replies, flow) =
                    process_client_text(&mut session, state.model.as_ref(), &text).await;
                if send_all(&mut sender, &replies).await.is_err() {
                    warn!("WebSocket client disconnected or send error. Closing connection.");
                    break;
                }
                if flow == Flow::Close {
                    break;
                }
            }
            Message::Binary(_) => {
                warn!("Received unexpected binary message from client");
            }
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => {
                info!("Client requested WebSocket close");
                break;
            }
        }
    }

    session.finish();
    info!("WebSocket connection closed");
}

async fn send_all<S>(sender: &mut S, messages: &[ServerMessage]) -> Result<()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    for msg in messages {
        let json_msg = serde_json::to_string(msg).context("Failed to serialize server message")?;
        sender
            .send(Message::Text(json_msg))
            .await
            .context("Failed to send WebSocket frame")?;
    }
    Ok(())
}

/// Build the application router.
pub fn router(model: Arc<dyn LanguageModel>, templates_dir: &str, static_dir: &str) -> Router {
    let state = AppState {
        templates: Arc::new(create_minijinja_env(templates_dir.to_string())),
        model,
    };

    let static_files_service =
        ServeDir::new(static_dir).not_found_service(tower::service_fn(|_req: Request| async {
            Ok::<_, std::convert::Infallible>((StatusCode::NOT_FOUND, "Not Found").into_response())
        }));

    Router::new()
        .route("/", get(index_handler))
        .route("/ws", get(ws_handler))
        .nest_service("/static", static_files_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(port: u16, model: Arc<dyn LanguageModel>) -> Result<()> {
    let app = router(model, &constants::TEMPLATES_DIR, &constants::STATIC_DIR);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
