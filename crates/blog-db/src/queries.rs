use crate::Database;
use crate::models::{PostagemRow, TemaRow, UsuarioRow};
use anyhow::Result;
use rusqlite::Connection;

const POSTAGEM_SELECT: &str = "SELECT p.id, p.titulo, p.texto, p.data,
        p.tema_id, t.descricao,
        p.usuario_id, u.nome, u.usuario
    FROM postagens p
    LEFT JOIN temas t ON p.tema_id = t.id
    LEFT JOIN usuarios u ON p.usuario_id = u.id";

impl Database {
    // -- Usuarios --

    pub fn create_usuario(&self, nome: &str, usuario: &str, senha_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO usuarios (nome, usuario, senha) VALUES (?1, ?2, ?3)",
                (nome, usuario, senha_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_usuario_by_username(&self, usuario: &str) -> Result<Option<UsuarioRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, nome, usuario, senha FROM usuarios WHERE usuario = ?1")?;
            stmt.query_row([usuario], usuario_from_row).optional()
        })
    }

    pub fn get_usuario_by_id(&self, id: i64) -> Result<Option<UsuarioRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, nome, usuario, senha FROM usuarios WHERE id = ?1")?;
            stmt.query_row([id], usuario_from_row).optional()
        })
    }

    pub fn list_usuarios(&self) -> Result<Vec<UsuarioRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, nome, usuario, senha FROM usuarios ORDER BY id")?;
            let rows = stmt
                .query_map([], usuario_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Temas --

    pub fn create_tema(&self, descricao: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO temas (descricao) VALUES (?1)", [descricao])?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Full-record save with a caller-supplied id; inserts when the id is
    /// free, overwrites when it exists.
    pub fn upsert_tema(&self, id: i64, descricao: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO temas (id, descricao) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET descricao = excluded.descricao",
                rusqlite::params![id, descricao],
            )?;
            Ok(())
        })
    }

    pub fn get_tema(&self, id: i64) -> Result<Option<TemaRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, descricao FROM temas WHERE id = ?1")?;
            stmt.query_row([id], tema_from_row).optional()
        })
    }

    pub fn list_temas(&self) -> Result<Vec<TemaRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, descricao FROM temas ORDER BY id")?;
            let rows = stmt
                .query_map([], tema_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Case-insensitive substring match on the description.
    pub fn find_temas_by_descricao(&self, descricao: &str) -> Result<Vec<TemaRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, descricao FROM temas
                 WHERE descricao LIKE '%' || ?1 || '%' ORDER BY id",
            )?;
            let rows = stmt
                .query_map([descricao], tema_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Deleting an id that does not exist is a silent no-op.
    pub fn delete_tema(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM temas WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    // -- Postagens --

    pub fn create_postagem(
        &self,
        titulo: &str,
        texto: &str,
        tema_id: Option<i64>,
        usuario_id: Option<i64>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO postagens (titulo, texto, tema_id, usuario_id)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![titulo, texto, tema_id, usuario_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Full-record save. The `data` column keeps its insert-time default on
    /// insert and is never rewritten on update.
    pub fn upsert_postagem(
        &self,
        id: i64,
        titulo: &str,
        texto: &str,
        tema_id: Option<i64>,
        usuario_id: Option<i64>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO postagens (id, titulo, texto, tema_id, usuario_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     titulo = excluded.titulo,
                     texto = excluded.texto,
                     tema_id = excluded.tema_id,
                     usuario_id = excluded.usuario_id",
                rusqlite::params![id, titulo, texto, tema_id, usuario_id],
            )?;
            Ok(())
        })
    }

    pub fn get_postagem(&self, id: i64) -> Result<Option<PostagemRow>> {
        self.with_conn(|conn| {
            let sql = format!("{POSTAGEM_SELECT} WHERE p.id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_row([id], postagem_from_row).optional()
        })
    }

    pub fn list_postagens(&self) -> Result<Vec<PostagemRow>> {
        self.with_conn(|conn| query_postagens(conn, None))
    }

    /// Case-insensitive substring match on the title.
    pub fn find_postagens_by_titulo(&self, titulo: &str) -> Result<Vec<PostagemRow>> {
        self.with_conn(|conn| query_postagens(conn, Some(titulo)))
    }

    /// Deleting an id that does not exist is a silent no-op.
    pub fn delete_postagem(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM postagens WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

fn query_postagens(conn: &Connection, titulo: Option<&str>) -> Result<Vec<PostagemRow>> {
    let sql = match titulo {
        Some(_) => format!("{POSTAGEM_SELECT} WHERE p.titulo LIKE '%' || ?1 || '%' ORDER BY p.id"),
        None => format!("{POSTAGEM_SELECT} ORDER BY p.id"),
    };
    let mut stmt = conn.prepare(&sql)?;

    let rows: std::result::Result<Vec<PostagemRow>, rusqlite::Error> = match titulo {
        Some(t) => stmt.query_map([t], postagem_from_row)?.collect(),
        None => stmt.query_map([], postagem_from_row)?.collect(),
    };
    Ok(rows?)
}

fn usuario_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UsuarioRow> {
    Ok(UsuarioRow {
        id: row.get(0)?,
        nome: row.get(1)?,
        usuario: row.get(2)?,
        senha: row.get(3)?,
    })
}

fn tema_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TemaRow> {
    Ok(TemaRow {
        id: row.get(0)?,
        descricao: row.get(1)?,
    })
}

fn postagem_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostagemRow> {
    Ok(PostagemRow {
        id: row.get(0)?,
        titulo: row.get(1)?,
        texto: row.get(2)?,
        data: row.get(3)?,
        tema_id: row.get(4)?,
        tema_descricao: row.get(5)?,
        usuario_id: row.get(6)?,
        usuario_nome: row.get(7)?,
        usuario_usuario: row.get(8)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
