use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. After registration `senha` always holds the Argon2
/// hash, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub usuario: String,
    pub senha: String,
}

/// A post author as embedded in post responses. Same row as [`Usuario`]
/// minus the password hash, which has no business leaving the user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autor {
    pub id: i64,
    pub nome: String,
    pub usuario: String,
}

/// A categorization label for posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tema {
    pub id: i64,
    pub descricao: String,
}

/// A blog entry. `data` is assigned by the store at insert time. The topic
/// and author are optional because the columns are nullable references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Postagem {
    pub id: i64,
    pub titulo: String,
    pub texto: String,
    pub data: DateTime<Utc>,
    pub tema: Option<Tema>,
    pub usuario: Option<Autor>,
}
