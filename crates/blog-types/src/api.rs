use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct CadastroRequest {
    pub nome: String,
    pub usuario: String,
    pub senha: String,
}

/// Login attempt. Clients post the whole transient login object (`id`,
/// `nome`, `token` included); only the credentials matter here, the rest is
/// ignored and filled in from the store on the way out.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub usuario: String,
    pub senha: String,
}

/// Login response: the stored record augmented with the Basic token.
/// `senha` echoes the stored hash, matching the original wire contract.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub nome: String,
    pub usuario: String,
    pub senha: String,
    pub token: String,
}

// -- Posts / topics --

/// Reference to a related record by id, as nested in request bodies
/// (`"tema": {"id": 1}`). Extra fields a client sends along are ignored.
#[derive(Debug, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PostagemRequest {
    pub id: Option<i64>,
    pub titulo: String,
    pub texto: String,
    pub tema: Option<EntityRef>,
    pub usuario: Option<EntityRef>,
}

#[derive(Debug, Deserialize)]
pub struct TemaRequest {
    pub id: Option<i64>,
    pub descricao: String,
}
