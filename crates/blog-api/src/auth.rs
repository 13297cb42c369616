use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use blog_db::Database;
use blog_types::api::{CadastroRequest, LoginRequest, LoginResponse};
use blog_types::models::Usuario;

use crate::error::{ApiError, join_err};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

pub async fn cadastrar(
    State(state): State<AppState>,
    Json(req): Json<CadastroRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Hashing and the store round-trips are blocking; keep them off the runtime
    let db = state.clone();
    let usuario = tokio::task::spawn_blocking(move || {
        // Reject duplicate usernames; the UNIQUE constraint settles races.
        if db.db.get_usuario_by_username(&req.usuario)?.is_some() {
            return Ok(None);
        }

        let senha_hash = hash_senha(&req.senha)?;
        let id = db.db.create_usuario(&req.nome, &req.usuario, &senha_hash)?;

        Ok::<_, ApiError>(Some(Usuario {
            id,
            nome: req.nome,
            usuario: req.usuario,
            senha: senha_hash,
        }))
    })
    .await
    .map_err(join_err)??
    .ok_or(ApiError::Conflict)?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

pub async fn logar(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = basic_token(&req.usuario, &req.senha);

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || {
        let user = db.db.get_usuario_by_username(&req.usuario)?;
        Ok::<_, ApiError>(user.filter(|u| verificar_senha(&req.senha, &u.senha)))
    })
    .await
    .map_err(join_err)??
    .ok_or(ApiError::Unauthorized)?;

    Ok(Json(LoginResponse {
        id: user.id,
        nome: user.nome,
        usuario: user.usuario,
        senha: user.senha,
        token,
    }))
}

pub fn hash_senha(senha: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(senha.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hash failed: {e}")))?
        .to_string();
    Ok(hash)
}

/// Argon2 salts every hash, so two hashes of the same password never match.
/// Verification has to go through the library's verify routine.
pub fn verificar_senha(senha: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(senha.as_bytes(), &parsed)
        .is_ok()
}

/// `Basic <base64(usuario:senha)>`. The space after `Basic` is mandatory;
/// HTTP Basic-auth consumers reject the token without it.
pub fn basic_token(usuario: &str, senha: &str) -> String {
    let auth = format!("{usuario}:{senha}");
    format!("Basic {}", B64.encode(auth.as_bytes()))
}
