/// Database row types — these map directly to SQLite rows.
/// Distinct from the blog-types API models to keep the DB layer independent.

pub struct UsuarioRow {
    pub id: i64,
    pub nome: String,
    pub usuario: String,
    pub senha: String,
}

pub struct TemaRow {
    pub id: i64,
    pub descricao: String,
}

/// A post row joined with its topic and author, so list endpoints need a
/// single query instead of N+1 lookups.
pub struct PostagemRow {
    pub id: i64,
    pub titulo: String,
    pub texto: String,
    pub data: String,
    pub tema_id: Option<i64>,
    pub tema_descricao: Option<String>,
    pub usuario_id: Option<i64>,
    pub usuario_nome: Option<String>,
    pub usuario_usuario: Option<String>,
}
