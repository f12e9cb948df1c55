//! SQLite file holding one index collection
//!
//! Two tables: `manifest` (a single JSON row) and `entries` (one row per chunk,
//! vectors stored as little-endian f32 blobs).

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Chunk, IndexManifest, IndexedEntry};

const MANIFEST_KEY: &str = "manifest";

/// SQLite-backed store for one collection
pub struct IndexDb {
    conn: Connection,
}

impl IndexDb {
    /// Create a fresh database file (the file must not be in use)
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an existing database file without creating it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS manifest (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS entries (
                seq INTEGER PRIMARY KEY,
                id TEXT NOT NULL UNIQUE,
                source_file TEXT NOT NULL,
                page_number INTEGER NOT NULL,
                chunk_index INTEGER NOT NULL,
                text TEXT NOT NULL,
                vector BLOB NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_source ON entries(source_file);
            "#,
        )?;
        Ok(())
    }

    /// Store the manifest, replacing any previous one
    pub fn write_manifest(&self, manifest: &IndexManifest) -> Result<()> {
        let json = serde_json::to_string(manifest)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO manifest (key, value) VALUES (?1, ?2)",
            params![MANIFEST_KEY, json],
        )?;
        Ok(())
    }

    /// Read the manifest, if one was written
    pub fn read_manifest(&self) -> Result<Option<IndexManifest>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM manifest WHERE key = ?1",
                params![MANIFEST_KEY],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }

    /// Append entries in one transaction, preserving their order
    pub fn insert_entries(&mut self, entries: &[IndexedEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entries (id, source_file, page_number, chunk_index, text, vector)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.id,
                    entry.chunk.source_file,
                    entry.chunk.page_number,
                    entry.chunk.chunk_index,
                    entry.chunk.text,
                    encode_vector(&entry.vector),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Number of stored entries
    pub fn entry_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Load every entry in insertion order
    pub fn load_entries(&self, dimensions: usize) -> Result<Vec<IndexedEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source_file, page_number, chunk_index, text, vector
             FROM entries ORDER BY seq",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Chunk {
                    source_file: row.get(1)?,
                    page_number: row.get(2)?,
                    chunk_index: row.get(3)?,
                    text: row.get(4)?,
                },
                row.get::<_, Vec<u8>>(5)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, chunk, blob) = row?;
            let vector = decode_vector(&blob, dimensions)?;
            entries.push(IndexedEntry { id, vector, chunk });
        }
        Ok(entries)
    }
}

fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(std::mem::size_of_val(vector));
    for &value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn decode_vector(blob: &[u8], dimensions: usize) -> Result<Vec<f32>> {
    let expected = dimensions * std::mem::size_of::<f32>();
    if blob.len() != expected {
        return Err(Error::internal(format!(
            "corrupt index entry: expected {} vector bytes, got {}",
            expected,
            blob.len()
        )));
    }

    Ok(blob
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}
