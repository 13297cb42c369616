use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use blog_api::auth::{AppStateInner, basic_token};

fn app() -> Router {
    let db = blog_db::Database::open_in_memory().unwrap();
    blog_api::router(Arc::new(AppStateInner { db }))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn req(method: &str, uri: &str, body: Option<Value>, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = auth {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Register maria/123456 and hand back her Basic token.
async fn register_maria(app: &Router) -> String {
    let body = json!({"nome": "Maria", "usuario": "maria", "senha": "123456"});
    let (status, _) = send(app, req("POST", "/usuarios/cadastrar", Some(body), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    basic_token("maria", "123456")
}

#[tokio::test]
async fn cadastrar_stores_hash_not_plaintext() {
    let app = app();
    let body = json!({"nome": "Maria", "usuario": "maria", "senha": "123456"});
    let (status, created) = send(&app, req("POST", "/usuarios/cadastrar", Some(body), None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["usuario"], "maria");
    let senha = created["senha"].as_str().unwrap();
    assert_ne!(senha, "123456");
    assert!(blog_api::auth::verificar_senha("123456", senha));
}

#[tokio::test]
async fn cadastrar_rejects_duplicate_username() {
    let app = app();
    let token = register_maria(&app).await;

    let dup = json!({"nome": "Outra Maria", "usuario": "maria", "senha": "abcdef"});
    let (status, _) = send(&app, req("POST", "/usuarios/cadastrar", Some(dup), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // the store was not mutated
    let (status, users) = send(&app, req("GET", "/usuarios/all", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn logar_returns_exact_basic_token() {
    let app = app();
    register_maria(&app).await;

    let body = json!({"usuario": "maria", "senha": "123456"});
    let (status, login) = send(&app, req("POST", "/usuarios/logar", Some(body), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token"], "Basic bWFyaWE6MTIzNDU2");
    assert_eq!(login["nome"], "Maria");
    // senha echoes the stored hash, never the plaintext
    assert_ne!(login["senha"], "123456");
}

#[tokio::test]
async fn logar_accepts_full_login_object() {
    let app = app();
    register_maria(&app).await;

    // clients post the whole transient login record, not just the credentials
    let body = json!({
        "id": 0,
        "nome": "",
        "usuario": "maria",
        "senha": "123456",
        "token": "",
    });
    let (status, login) = send(&app, req("POST", "/usuarios/logar", Some(body), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token"], "Basic bWFyaWE6MTIzNDU2");
    assert_eq!(login["id"], 1);
    assert_eq!(login["nome"], "Maria");
}

#[tokio::test]
async fn logar_rejects_bad_credentials() {
    let app = app();
    register_maria(&app).await;

    let wrong = json!({"usuario": "maria", "senha": "654321"});
    let (status, _) = send(&app, req("POST", "/usuarios/logar", Some(wrong), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let unknown = json!({"usuario": "joao", "senha": "123456"});
    let (status, _) = send(&app, req("POST", "/usuarios/logar", Some(unknown), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_basic_auth() {
    let app = app();
    register_maria(&app).await;

    let (status, _) = send(&app, req("GET", "/postagens", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let bad = basic_token("maria", "wrong-password");
    let (status, _) = send(&app, req("GET", "/postagens", None, Some(&bad))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let good = basic_token("maria", "123456");
    let (status, _) = send(&app, req("GET", "/postagens", None, Some(&good))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn postagem_crud_roundtrip() {
    let app = app();
    let token = register_maria(&app).await;

    // topic first, so the post can reference it
    let (status, tema) = send(
        &app,
        req(
            "POST",
            "/temas",
            Some(json!({"descricao": "Tecnologia"})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tema_id = tema["id"].as_i64().unwrap();

    let body = json!({
        "titulo": "Category One",
        "texto": "corpo da postagem",
        "tema": {"id": tema_id},
        "usuario": {"id": 1},
    });
    let (status, created) = send(&app, req("POST", "/postagens", Some(body), Some(&token))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["tema"]["descricao"], "Tecnologia");
    assert_eq!(created["usuario"]["usuario"], "maria");
    // the embedded author never carries the password hash
    assert!(created["usuario"].get("senha").is_none());

    let (status, fetched) = send(
        &app,
        req("GET", &format!("/postagens/{id}"), None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["titulo"], "Category One");

    let (status, _) = send(&app, req("GET", "/postagens/999", None, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // full update keeps the id and overwrites the fields
    let update = json!({
        "id": id,
        "titulo": "Category One (editado)",
        "texto": "novo corpo",
        "tema": {"id": tema_id},
        "usuario": {"id": 1},
    });
    let (status, updated) = send(&app, req("PUT", "/postagens", Some(update), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["titulo"], "Category One (editado)");

    let (status, _) = send(
        &app,
        req("DELETE", &format!("/postagens/{id}"), None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // deleting the same id again is a silent no-op
    let (status, _) = send(
        &app,
        req("DELETE", &format!("/postagens/{id}"), None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, all) = send(&app, req("GET", "/postagens", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn titulo_filter_is_case_insensitive() {
    let app = app();
    let token = register_maria(&app).await;

    for titulo in ["Category One", "Outro assunto"] {
        let body = json!({"titulo": titulo, "texto": "texto"});
        let (status, _) = send(&app, req("POST", "/postagens", Some(body), Some(&token))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, hits) = send(
        &app,
        req("GET", "/postagens/titulo/cat", None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["titulo"], "Category One");
}

#[tokio::test]
async fn tema_descricao_filter_and_upsert() {
    let app = app();
    let token = register_maria(&app).await;

    let (status, tema) = send(
        &app,
        req(
            "POST",
            "/temas",
            Some(json!({"descricao": "Culinaria"})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = tema["id"].as_i64().unwrap();

    let (status, hits) = send(
        &app,
        req("GET", "/temas/descricao/CULI", None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);

    // PUT with an unknown id behaves as upsert
    let (status, saved) = send(
        &app,
        req(
            "PUT",
            "/temas",
            Some(json!({"id": 42, "descricao": "Esportes"})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["id"], 42);

    let (status, all) = send(&app, req("GET", "/temas", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        req("DELETE", &format!("/temas/{id}"), None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn usuario_lookup_by_id() {
    let app = app();
    let token = register_maria(&app).await;

    let (status, user) = send(&app, req("GET", "/usuarios/1", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["usuario"], "maria");

    let (status, _) = send(&app, req("GET", "/usuarios/999", None, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
