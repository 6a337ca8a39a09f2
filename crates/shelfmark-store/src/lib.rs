//! Shelfmark Registry
//!
//! SQLite-backed registry for document tracking and code allocation.
//!
//! # Architecture
//!
//! - `documents`: file paths, names, types, status, committed codes
//! - `codes`: allocation ledger (allocated vs in_use)
//! - `metadata`: extracted fields with provenance
//! - `processing_steps`: pipeline execution history per document
//! - `registry_state`: singleton values, currently `next_code_index`
//!
//! WAL journal mode with foreign keys on; a single writer with any number
//! of readers. The code counter only advances when a minted code is
//! committed together with its document, so a crash between mint and
//! commit reissues the same index on the next run.
//!
//! # Examples
//!
//! ```no_run
//! use shelfmark_store::Registry;
//!
//! let registry = Registry::new("registry/master.db").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use shelfmark_domain::{DocumentType, MetadataField, ProcessingStatus};
use thiserror::Error;

/// Key in `registry_state` holding the next unissued code index.
const CODE_INDEX_KEY: &str = "next_code_index";

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Code already allocated or committed to another document
    #[error("code collision: {0}")]
    CodeCollision(String),

    /// Stored data failed to parse back into a domain type
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// JSON serialization error during export
    #[error("export error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the `documents` table.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    /// Registry-assigned id
    pub id: i64,
    /// Absolute path at registration time
    pub file_path: String,
    /// Filename when first registered
    pub original_name: String,
    /// Filename after the most recent rename
    pub current_name: String,
    /// Classified document type tag, if classified
    pub document_type: Option<String>,
    /// Pipeline status tag
    pub status: String,
    /// Committed shelfmark code, if any
    pub unique_code: Option<String>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    /// RFC 3339 last-update timestamp
    pub updated_at: String,
}

/// One row of the `metadata` table.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRecord {
    /// Owning document id
    pub document_id: i64,
    /// Field name
    pub key: String,
    /// Extracted value
    pub value: Option<String>,
    /// Extraction source tag (document/filename/fallback)
    pub source: Option<String>,
    /// Confidence tag (HIGH/MEDIUM/LOW)
    pub confidence: Option<String>,
    /// Extractor that produced the value
    pub extractor_name: Option<String>,
    /// RFC 3339 extraction timestamp
    pub extracted_at: String,
}

/// One row of the `processing_steps` table.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingStepRecord {
    /// Owning document id
    pub document_id: i64,
    /// Step name (extract, classify, rename, ...)
    pub step_name: String,
    /// Position in the pipeline
    pub step_order: i64,
    /// Status tag for this step
    pub status: String,
    /// When the step started
    pub started_at: Option<String>,
    /// When the step reached a terminal state
    pub completed_at: Option<String>,
    /// Error text for failed steps
    pub error_message: Option<String>,
}

/// Registry-wide counters for `stats` output and export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    /// Total registered documents
    pub total_documents: u64,
    /// Document counts grouped by type tag
    pub by_type: BTreeMap<String, u64>,
    /// Total rows in the codes ledger
    pub allocated_codes: u64,
    /// Code counts grouped by status (allocated/in_use)
    pub code_status: BTreeMap<String, u64>,
    /// Next unissued code index
    pub next_code_index: u64,
}

/// SQLite-backed document registry.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe; each thread should open its own
/// `Registry`. WAL mode allows readers alongside the single writer.
pub struct Registry {
    conn: Connection,
}

impl Registry {
    /// Open (or create) a registry at the given path.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // journal_mode returns the resulting mode as a row, so query it.
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let registry = Self { conn };
        registry.initialize_schema()?;
        Ok(registry)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO registry_state (key, value) VALUES (?1, 0)",
            params![CODE_INDEX_KEY],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Code counter and allocation
    // ------------------------------------------------------------------

    /// Read the next code index without advancing it.
    pub fn peek_code_index(&self) -> Result<u64, StoreError> {
        let value: i64 = self.conn.query_row(
            "SELECT value FROM registry_state WHERE key = ?1",
            params![CODE_INDEX_KEY],
            |row| row.get(0),
        )?;
        Ok(value as u64)
    }

    /// Atomically read and advance the code index, returning the value
    /// before the increment.
    pub fn increment_code_index(&mut self) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        let current: i64 = tx.query_row(
            "SELECT value FROM registry_state WHERE key = ?1",
            params![CODE_INDEX_KEY],
            |row| row.get(0),
        )?;
        tx.execute(
            "UPDATE registry_state SET value = value + 1 WHERE key = ?1",
            params![CODE_INDEX_KEY],
        )?;
        tx.commit()?;
        Ok(current as u64)
    }

    /// Reserve a code in the ledger without linking it to a document.
    ///
    /// Fails with [`StoreError::CodeCollision`] when the code is already
    /// allocated.
    pub fn allocate_code(&mut self, code: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO codes (code, allocated_at, status) VALUES (?1, ?2, 'allocated')",
                params![code, now()],
            )
            .map_err(|e| collision_or_db(code, e))?;
        tracing::debug!(code, "allocated code");
        Ok(())
    }

    /// Whether a code is present in the ledger at all.
    pub fn code_exists(&self, code: &str) -> Result<bool, StoreError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM codes WHERE code = ?1",
                params![code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Commit a freshly minted code to a document, advancing the counter.
    ///
    /// Code link, document update, and counter advance happen in one
    /// transaction; a crash leaves either none or all of them applied.
    pub fn commit_minted_code(&mut self, code: &str, document_id: i64) -> Result<(), StoreError> {
        self.commit_code(code, document_id, true)
    }

    /// Commit a code discovered in a legacy filename to a document.
    ///
    /// The counter is left alone: discovered codes were never issued from
    /// it, and advancing it for them would leak indexes.
    pub fn commit_discovered_code(
        &mut self,
        code: &str,
        document_id: i64,
    ) -> Result<(), StoreError> {
        self.commit_code(code, document_id, false)
    }

    fn commit_code(
        &mut self,
        code: &str,
        document_id: i64,
        advance_counter: bool,
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        // One committed code per document: re-committing the same code is
        // an idempotent no-op, a different one is a collision.
        let existing: Option<Option<String>> = tx
            .query_row(
                "SELECT unique_code FROM documents WHERE id = ?1",
                params![document_id],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            None => {
                return Err(StoreError::NotFound(format!("document {document_id}")));
            }
            Some(Some(current)) if current != code => {
                return Err(StoreError::CodeCollision(current));
            }
            _ => {}
        }

        tx.execute(
            "INSERT INTO codes (code, allocated_at, status) VALUES (?1, ?2, 'in_use')
             ON CONFLICT(code) DO UPDATE SET status = 'in_use'",
            params![code, now()],
        )
        .map_err(|e| collision_or_db(code, e))?;
        tx.execute(
            "UPDATE codes SET document_id = ?1 WHERE code = ?2",
            params![document_id, code],
        )?;
        tx.execute(
            "UPDATE documents SET unique_code = ?1, updated_at = ?2 WHERE id = ?3",
            params![code, now(), document_id],
        )
        .map_err(|e| collision_or_db(code, e))?;
        if advance_counter {
            tx.execute(
                "UPDATE registry_state SET value = value + 1 WHERE key = ?1",
                params![CODE_INDEX_KEY],
            )?;
        }

        tx.commit()?;
        tracing::debug!(code, document_id, advance_counter, "committed code");
        Ok(())
    }

    /// Delete an uncommitted code allocation so the code can be reissued.
    ///
    /// Codes already linked to a document are left untouched.
    pub fn release_code(&mut self, code: &str) -> Result<(), StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM codes WHERE code = ?1 AND document_id IS NULL AND status = 'allocated'",
            params![code],
        )?;
        if deleted > 0 {
            tracing::debug!(code, "released uncommitted code");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Register a new document, returning its id.
    pub fn register_document(
        &mut self,
        file_path: &Path,
        document_type: Option<DocumentType>,
        code: Option<&str>,
    ) -> Result<i64, StoreError> {
        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let type_tag = document_type.map(|t| t.as_str().to_string());
        let ts = now();

        self.conn
            .execute(
                "INSERT INTO documents
                 (file_path, original_name, current_name, document_type, status,
                  unique_code, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    file_path.to_string_lossy(),
                    name,
                    name,
                    type_tag,
                    ProcessingStatus::Pending.as_str(),
                    code,
                    ts,
                ],
            )
            .map_err(|e| collision_or_db(code.unwrap_or(""), e))?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(document_id = id, path = %file_path.display(), "registered document");
        Ok(id)
    }

    /// Look up a document by its registered path.
    pub fn get_document_by_path(&self, file_path: &Path) -> Result<Option<DocumentRecord>, StoreError> {
        self.get_document_where("file_path = ?1", params![file_path.to_string_lossy()])
    }

    /// Look up a document by its committed code.
    pub fn get_document_by_code(&self, code: &str) -> Result<Option<DocumentRecord>, StoreError> {
        self.get_document_where("unique_code = ?1", params![code])
    }

    /// Look up a document by id.
    pub fn get_document_by_id(&self, document_id: i64) -> Result<Option<DocumentRecord>, StoreError> {
        self.get_document_where("id = ?1", params![document_id])
    }

    fn get_document_where(
        &self,
        clause: &str,
        args: impl rusqlite::Params,
    ) -> Result<Option<DocumentRecord>, StoreError> {
        let sql = format!(
            "SELECT id, file_path, original_name, current_name, document_type,
                    status, unique_code, created_at, updated_at
             FROM documents WHERE {clause}"
        );
        let record = self
            .conn
            .query_row(&sql, args, row_to_document)
            .optional()?;
        Ok(record)
    }

    /// Record a rename by updating the document's current name and path.
    pub fn update_document_name(
        &mut self,
        document_id: i64,
        new_path: &Path,
    ) -> Result<(), StoreError> {
        let name = new_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let updated = self.conn.execute(
            "UPDATE documents
             SET current_name = ?1, file_path = ?2, updated_at = ?3
             WHERE id = ?4",
            params![name, new_path.to_string_lossy(), now(), document_id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("document {document_id}")));
        }
        Ok(())
    }

    /// Update a document's pipeline status.
    pub fn update_document_status(
        &mut self,
        document_id: i64,
        status: ProcessingStatus,
    ) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE documents SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), now(), document_id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("document {document_id}")));
        }
        Ok(())
    }

    /// Update a document's classified type.
    pub fn update_document_type(
        &mut self,
        document_id: i64,
        document_type: DocumentType,
    ) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE documents SET document_type = ?1, updated_at = ?2 WHERE id = ?3",
            params![document_type.as_str(), now(), document_id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("document {document_id}")));
        }
        Ok(())
    }

    /// List documents, optionally filtered by type, newest first.
    pub fn list_documents(
        &self,
        document_type: Option<DocumentType>,
        limit: Option<usize>,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        let columns = "id, file_path, original_name, current_name, document_type,
                       status, unique_code, created_at, updated_at";
        // SQLite treats a negative LIMIT as unlimited.
        let limit = limit.map(|n| n as i64).unwrap_or(-1);

        let records = match document_type {
            Some(t) => {
                let sql = format!(
                    "SELECT {columns} FROM documents WHERE document_type = ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![t.as_str(), limit], row_to_document)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {columns} FROM documents
                     ORDER BY created_at DESC, id DESC LIMIT ?1"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![limit], row_to_document)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(records)
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Persist one extracted field with its provenance.
    pub fn add_metadata(
        &mut self,
        document_id: i64,
        field: &MetadataField,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO metadata
             (document_id, key, value, source, confidence, extractor_name, extracted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                document_id,
                field.key,
                field.value,
                field.source.as_str(),
                field.confidence.as_str(),
                field.extractor,
                now(),
            ],
        )?;
        Ok(())
    }

    /// Fetch all metadata rows for a document, oldest first.
    pub fn get_metadata(&self, document_id: i64) -> Result<Vec<MetadataRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT document_id, key, value, source, confidence, extractor_name, extracted_at
             FROM metadata WHERE document_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![document_id], |row| {
            Ok(MetadataRecord {
                document_id: row.get(0)?,
                key: row.get(1)?,
                value: row.get(2)?,
                source: row.get(3)?,
                confidence: row.get(4)?,
                extractor_name: row.get(5)?,
                extracted_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ------------------------------------------------------------------
    // Processing steps
    // ------------------------------------------------------------------

    /// Record one pipeline step execution for a document.
    ///
    /// `completed_at` is only set for terminal statuses.
    pub fn record_processing_step(
        &mut self,
        document_id: i64,
        step_name: &str,
        step_order: i64,
        status: ProcessingStatus,
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let ts = now();
        let completed = matches!(
            status,
            ProcessingStatus::Success | ProcessingStatus::Failed | ProcessingStatus::Skipped
        )
        .then(|| ts.clone());

        self.conn.execute(
            "INSERT INTO processing_steps
             (document_id, step_name, step_order, status, started_at, completed_at, error_message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                document_id,
                step_name,
                step_order,
                status.as_str(),
                ts,
                completed,
                error_message,
            ],
        )?;
        Ok(())
    }

    /// Fetch the step history for a document in pipeline order.
    pub fn get_processing_steps(
        &self,
        document_id: i64,
    ) -> Result<Vec<ProcessingStepRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT document_id, step_name, step_order, status,
                    started_at, completed_at, error_message
             FROM processing_steps WHERE document_id = ?1 ORDER BY step_order, id",
        )?;
        let rows = stmt.query_map(params![document_id], |row| {
            Ok(ProcessingStepRecord {
                document_id: row.get(0)?,
                step_name: row.get(1)?,
                step_order: row.get(2)?,
                status: row.get(3)?,
                started_at: row.get(4)?,
                completed_at: row.get(5)?,
                error_message: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ------------------------------------------------------------------
    // Statistics and export
    // ------------------------------------------------------------------

    /// Registry-wide counters.
    pub fn get_statistics(&self) -> Result<Statistics, StoreError> {
        let total_documents: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;

        let mut by_type = BTreeMap::new();
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(document_type, 'unclassified'), COUNT(*)
             FROM documents GROUP BY document_type",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (tag, count) = row?;
            by_type.insert(tag, count as u64);
        }

        let allocated_codes: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM codes", [], |row| row.get(0))?;

        let mut code_status = BTreeMap::new();
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM codes GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (tag, count) = row?;
            code_status.insert(tag, count as u64);
        }

        Ok(Statistics {
            total_documents: total_documents as u64,
            by_type,
            allocated_codes: allocated_codes as u64,
            code_status,
            next_code_index: self.peek_code_index()?,
        })
    }

    /// Export all documents plus statistics to a JSON file.
    pub fn export_json(&self, output_path: &Path) -> Result<(), StoreError> {
        #[derive(Serialize)]
        struct Export {
            documents: Vec<DocumentRecord>,
            statistics: Statistics,
        }

        let export = Export {
            documents: self.list_documents(None, None)?,
            statistics: self.get_statistics()?,
        };

        let file = std::fs::File::create(output_path)?;
        serde_json::to_writer_pretty(file, &export)?;
        tracing::info!(path = %output_path.display(), "exported registry");
        Ok(())
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        id: row.get(0)?,
        file_path: row.get(1)?,
        original_name: row.get(2)?,
        current_name: row.get(3)?,
        document_type: row.get(4)?,
        status: row.get(5)?,
        unique_code: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Map SQLite constraint violations on code columns to CodeCollision.
fn collision_or_db(code: &str, err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation && !code.is_empty() =>
        {
            StoreError::CodeCollision(code.to_string())
        }
        _ => StoreError::Database(err),
    }
}
