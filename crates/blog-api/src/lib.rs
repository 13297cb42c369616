pub mod auth;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod topics;
pub mod users;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

pub use auth::{AppState, AppStateInner};

/// Assemble the application router. Lives here rather than in the server
/// binary so the integration tests can drive the app in-process.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/usuarios/logar", post(auth::logar))
        .route("/usuarios/cadastrar", post(auth::cadastrar))
        .with_state(state.clone());

    let protected = Router::new()
        .route(
            "/postagens",
            get(posts::get_all).post(posts::create).put(posts::update),
        )
        .route(
            "/postagens/{id}",
            get(posts::get_by_id).delete(posts::delete),
        )
        .route("/postagens/titulo/{titulo}", get(posts::get_by_titulo))
        .route(
            "/temas",
            get(topics::get_all).post(topics::create).put(topics::update),
        )
        .route("/temas/{id}", get(topics::get_by_id).delete(topics::delete))
        .route("/temas/descricao/{descricao}", get(topics::get_by_descricao))
        .route("/usuarios/all", get(users::get_all))
        .route("/usuarios/{id}", get(users::get_by_id))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
