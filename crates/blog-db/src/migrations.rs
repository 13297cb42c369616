use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS usuarios (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            nome        TEXT NOT NULL,
            usuario     TEXT NOT NULL UNIQUE,
            senha       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS temas (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            descricao   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS postagens (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo      TEXT NOT NULL,
            texto       TEXT NOT NULL,
            data        TEXT NOT NULL DEFAULT (datetime('now')),
            tema_id     INTEGER REFERENCES temas(id),
            usuario_id  INTEGER REFERENCES usuarios(id)
        );

        CREATE INDEX IF NOT EXISTS idx_postagens_tema
            ON postagens(tema_id);
        CREATE INDEX IF NOT EXISTS idx_postagens_usuario
            ON postagens(usuario_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
