use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use server_api::{
    add_item, add_list, delete_list, health_check, load_board, submit_delete_item, submit_move,
    ApiContext,
};
use shared::{
    domain::ListName,
    error::{ApiError, ErrorCode},
    protocol::{AddItemForm, BoardResponse, DeleteItemForm, ListForm, MoveForm, ViewQuery},
};
use storage::Storage;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod render;
mod settings;

use app_state::AppState;
use settings::{load_settings, normalize_database_url};

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    if settings.uses_dev_secret() {
        warn!("SECRET_KEY not set; using the development secret");
    }
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            error = %format!("{error:#}"),
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext::new(storage),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(view_list))
        .route("/healthz", get(healthz))
        .route("/api/board", get(api_board))
        .route("/move", post(move_item).fallback(redirect_home))
        .route(
            "/delete_item",
            post(delete_item).delete(delete_item).fallback(redirect_home),
        )
        .route("/add_item", post(http_add_item).fallback(redirect_home))
        .route("/add_list", post(http_add_list).fallback(redirect_home))
        .route(
            "/delete_list",
            post(http_delete_list)
                .delete(http_delete_list)
                .fallback(redirect_home),
        )
        .with_state(state)
}

fn http_error(e: ApiError) -> HttpError {
    let status = match e.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            error!(message = %e.message, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(e))
}

/// Redirect to a list view, or to the default view when no list is known.
fn redirect_to_list(raw: Option<&str>) -> Redirect {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => Redirect::to(&render::list_href(&ListName::from_input(raw))),
        None => Redirect::to("/"),
    }
}

async fn redirect_home() -> Redirect {
    Redirect::to("/")
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    health_check(&state.api).await.map_err(http_error)?;
    Ok("ok")
}

async fn view_list(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ViewQuery>,
) -> Result<Html<String>, HttpError> {
    let board = load_board(&state.api, q.list_name.as_deref())
        .await
        .map_err(http_error)?;
    Ok(Html(render::render_board(&board)))
}

async fn api_board(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ViewQuery>,
) -> Result<Json<BoardResponse>, HttpError> {
    let board = load_board(&state.api, q.list_name.as_deref())
        .await
        .map_err(http_error)?;
    Ok(Json(board.into()))
}

async fn move_item(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MoveForm>,
) -> Result<Redirect, HttpError> {
    let outcome = submit_move(&state.api, &form).await.map_err(http_error)?;
    debug!(?outcome, "move handled");
    Ok(redirect_to_list(form.list_name.as_deref()))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeleteItemForm>,
) -> Result<Redirect, HttpError> {
    let outcome = submit_delete_item(&state.api, &form)
        .await
        .map_err(http_error)?;
    debug!(?outcome, "delete handled");
    Ok(redirect_to_list(form.list_name.as_deref()))
}

async fn http_add_item(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddItemForm>,
) -> Result<Redirect, HttpError> {
    let item = add_item(&state.api, &form).await.map_err(http_error)?;
    Ok(redirect_to_list(Some(item.list_name.as_key())))
}

async fn http_add_list(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ListForm>,
) -> Result<Redirect, HttpError> {
    let item = add_list(&state.api, &form).await.map_err(http_error)?;
    Ok(redirect_to_list(Some(item.list_name.as_key())))
}

async fn http_delete_list(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ListForm>,
) -> Result<Redirect, HttpError> {
    delete_list(&state.api, &form).await.map_err(http_error)?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
