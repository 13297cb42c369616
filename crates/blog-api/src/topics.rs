use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use blog_db::models::TemaRow;
use blog_types::api::TemaRequest;
use blog_types::models::Tema;

use crate::auth::AppState;
use crate::error::{ApiError, join_err};

pub async fn get_all(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_temas())
        .await
        .map_err(join_err)??;

    let temas: Vec<Tema> = rows.into_iter().map(tema_from_row).collect();
    Ok(Json(temas))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_tema(id))
        .await
        .map_err(join_err)??
        .ok_or(ApiError::NotFound)?;

    Ok(Json(tema_from_row(row)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<TemaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let id = db.db.create_tema(&req.descricao)?;
        db.db.get_tema(id)
    })
    .await
    .map_err(join_err)??
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("tema missing after insert")))?;

    Ok((StatusCode::CREATED, Json(tema_from_row(row))))
}

/// Full-record save. A body without an id falls back to plain create.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<TemaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let id = match req.id {
            Some(id) => {
                db.db.upsert_tema(id, &req.descricao)?;
                id
            }
            None => db.db.create_tema(&req.descricao)?,
        };
        db.db.get_tema(id)
    })
    .await
    .map_err(join_err)??
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("tema missing after save")))?;

    Ok(Json(tema_from_row(row)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_tema(id))
        .await
        .map_err(join_err)??;

    Ok(StatusCode::OK)
}

pub async fn get_by_descricao(
    State(state): State<AppState>,
    Path(descricao): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.find_temas_by_descricao(&descricao))
        .await
        .map_err(join_err)??;

    let temas: Vec<Tema> = rows.into_iter().map(tema_from_row).collect();
    Ok(Json(temas))
}

fn tema_from_row(row: TemaRow) -> Tema {
    Tema {
        id: row.id,
        descricao: row.descricao,
    }
}
