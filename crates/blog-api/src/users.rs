use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use blog_types::models::Usuario;

use crate::auth::AppState;
use crate::error::{ApiError, join_err};

pub async fn get_all(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_usuarios())
        .await
        .map_err(join_err)??;

    let usuarios: Vec<Usuario> = rows
        .into_iter()
        .map(|r| Usuario {
            id: r.id,
            nome: r.nome,
            usuario: r.usuario,
            senha: r.senha,
        })
        .collect();

    Ok(Json(usuarios))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_usuario_by_id(id))
        .await
        .map_err(join_err)??
        .ok_or(ApiError::NotFound)?;

    Ok(Json(Usuario {
        id: row.id,
        nome: row.nome,
        usuario: row.usuario,
        senha: row.senha,
    }))
}
