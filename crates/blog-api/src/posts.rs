use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use blog_db::models::PostagemRow;
use blog_types::api::PostagemRequest;
use blog_types::models::{Autor, Postagem, Tema};

use crate::auth::AppState;
use crate::error::{ApiError, join_err};

pub async fn get_all(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_postagens())
        .await
        .map_err(join_err)??;

    let postagens: Vec<Postagem> = rows.into_iter().map(postagem_from_row).collect();
    Ok(Json(postagens))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_postagem(id))
        .await
        .map_err(join_err)??
        .ok_or(ApiError::NotFound)?;

    Ok(Json(postagem_from_row(row)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<PostagemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let tema_id = req.tema.as_ref().map(|t| t.id);
        let usuario_id = req.usuario.as_ref().map(|u| u.id);
        let id = db
            .db
            .create_postagem(&req.titulo, &req.texto, tema_id, usuario_id)?;
        db.db.get_postagem(id)
    })
    .await
    .map_err(join_err)??
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("postagem missing after insert")))?;

    Ok((StatusCode::CREATED, Json(postagem_from_row(row))))
}

/// Full-record save. A body without an id falls back to plain create.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<PostagemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let tema_id = req.tema.as_ref().map(|t| t.id);
        let usuario_id = req.usuario.as_ref().map(|u| u.id);
        let id = match req.id {
            Some(id) => {
                db.db
                    .upsert_postagem(id, &req.titulo, &req.texto, tema_id, usuario_id)?;
                id
            }
            None => db
                .db
                .create_postagem(&req.titulo, &req.texto, tema_id, usuario_id)?,
        };
        db.db.get_postagem(id)
    })
    .await
    .map_err(join_err)??
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("postagem missing after save")))?;

    Ok(Json(postagem_from_row(row)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_postagem(id))
        .await
        .map_err(join_err)??;

    Ok(StatusCode::OK)
}

pub async fn get_by_titulo(
    State(state): State<AppState>,
    Path(titulo): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.find_postagens_by_titulo(&titulo))
        .await
        .map_err(join_err)??;

    let postagens: Vec<Postagem> = rows.into_iter().map(postagem_from_row).collect();
    Ok(Json(postagens))
}

fn postagem_from_row(row: PostagemRow) -> Postagem {
    let data = row
        .data
        .parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(&row.data, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt data '{}' on postagem {}: {}", row.data, row.id, e);
            chrono::DateTime::default()
        });

    let tema = match (row.tema_id, row.tema_descricao) {
        (Some(id), Some(descricao)) => Some(Tema { id, descricao }),
        _ => None,
    };

    let usuario = match (row.usuario_id, row.usuario_nome, row.usuario_usuario) {
        (Some(id), Some(nome), Some(usuario)) => Some(Autor { id, nome, usuario }),
        _ => None,
    };

    Postagem {
        id: row.id,
        titulo: row.titulo,
        texto: row.texto,
        data,
        tema,
        usuario,
    }
}
