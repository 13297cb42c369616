use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use crate::auth::{AppState, verificar_senha};

/// Identity of the authenticated caller, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct Autenticado {
    pub id: i64,
    pub usuario: String,
}

/// Validate the `Authorization: Basic <b64(user:pass)>` header against the
/// user table. Registration and login stay outside this layer.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let encoded = auth_header
        .strip_prefix("Basic ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoded = B64.decode(encoded).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let decoded = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let (usuario, senha) = decoded.split_once(':').ok_or(StatusCode::UNAUTHORIZED)?;
    let (usuario, senha) = (usuario.to_string(), senha.to_string());

    // Lookup and Argon2 verification are blocking; keep them off the runtime
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || {
        let user = db.db.get_usuario_by_username(&usuario)?;
        Ok::<_, anyhow::Error>(user.filter(|u| verificar_senha(&senha, &u.senha)))
    })
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(Autenticado {
        id: user.id,
        usuario: user.usuario,
    });
    Ok(next.run(req).await)
}
