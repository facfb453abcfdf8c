//! PostgreSQL-backed [`DocumentStore`].
//!
//! Every collection lives in the single `documents` table as JSONB rows keyed
//! by `(collection, id)`. `seq` keeps insertion order; overwriting a document
//! keeps its original position.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgConnection;

use crate::error::{StoreError, StoreResult};
use crate::store::{Document, DocumentData, DocumentStore, WriteBatch, WriteOp};
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

type Row = (String, Json<DocumentData>);

fn into_documents(rows: Vec<Row>) -> Vec<Document> {
    rows.into_iter()
        .map(|(id, Json(data))| Document { id, data })
        .collect()
}

async fn apply_op(conn: &mut PgConnection, op: WriteOp) -> StoreResult<()> {
    match op {
        WriteOp::Set {
            collection,
            id,
            data,
        } => {
            sqlx::query(
                "INSERT INTO documents (collection, id, data)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (collection, id)
                 DO UPDATE SET data = EXCLUDED.data, written_at = now()",
            )
            .bind(&collection)
            .bind(&id)
            .bind(Json(data))
            .execute(&mut *conn)
            .await?;
        }
        WriteOp::Update {
            collection,
            id,
            patch,
        } => {
            let result = sqlx::query(
                "UPDATE documents SET data = data || $3, written_at = now()
                 WHERE collection = $1 AND id = $2",
            )
            .bind(&collection)
            .bind(&id)
            .bind(Json(patch))
            .execute(&mut *conn)
            .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { collection, id });
            }
        }
        WriteOp::Delete { collection, id } => {
            sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                .bind(&collection)
                .bind(&id)
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, Row>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY seq",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_documents(rows))
    }

    async fn fetch_where_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, Row>(
            "SELECT id, data FROM documents
             WHERE collection = $1 AND data -> $2 = $3
             ORDER BY seq",
        )
        .bind(collection)
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;
        Ok(into_documents(rows))
    }

    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        apply_op(
            &mut *conn,
            WriteOp::Set {
                collection: collection.to_string(),
                id: id.to_string(),
                data,
            },
        )
        .await
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentData) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        apply_op(
            &mut *conn,
            WriteOp::Update {
                collection: collection.to_string(),
                id: id.to_string(),
                patch,
            },
        )
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        apply_op(
            &mut *conn,
            WriteOp::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            },
        )
        .await
    }

    /// Runs the whole batch in one transaction; any failing op rolls back.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for op in batch.into_ops() {
            apply_op(&mut *tx, op).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
