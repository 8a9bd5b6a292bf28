//! PostgreSQL implementation of the document store.
//!
//! Every document is one row of the `documents` table keyed by
//! `(collection, id)` with a JSONB body. Subcollections are ordinary
//! collection paths, so `articles/A1/likes` rows live next to `articles` rows.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::domain::repositories::{
    Direction, Document, DocumentStore, Precondition, Query, SetOptions, StoreError, StoreResult,
    WriteBatch, WriteOp, resolve_server_timestamps,
};
use crate::utils::id_generator::generate_document_id;

const MAX_ID_ATTEMPTS: usize = 5;

/// Document store over a PostgreSQL JSONB table.
///
/// Queries are assembled with [`QueryBuilder`] and bound parameters only.
pub struct PgDocumentStore {
    pool: Arc<PgPool>,
}

impl PgDocumentStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn build_query<'a>(collection: &'a str, query: &'a Query) -> QueryBuilder<'a, Postgres> {
        let mut qb = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
        qb.push_bind(collection);

        for (field, value) in &query.filters {
            let mut containment = serde_json::Map::new();
            containment.insert(field.clone(), value.clone());
            qb.push(" AND data @> ")
                .push_bind(Json(Value::Object(containment)));
        }

        match &query.order_by {
            Some(order) => {
                let (cmp, dir) = match order.direction {
                    Direction::Ascending => (">", "ASC"),
                    Direction::Descending => ("<", "DESC"),
                };

                qb.push(" AND jsonb_exists(data, ")
                    .push_bind(order.field.as_str())
                    .push(")");

                if let Some(cursor) = &query.start_after {
                    qb.push(" AND (data -> ")
                        .push_bind(order.field.as_str())
                        .push(", id) ")
                        .push(cmp)
                        .push(" (")
                        .push_bind(Json(cursor.value.clone()))
                        .push(", ")
                        .push_bind(cursor.id.as_str())
                        .push(")");
                }

                qb.push(" ORDER BY data -> ")
                    .push_bind(order.field.as_str())
                    .push(" ")
                    .push(dir)
                    .push(", id ")
                    .push(dir);
            }
            None => {
                if let Some(cursor) = &query.start_after {
                    qb.push(" AND id > ").push_bind(cursor.id.as_str());
                }
                qb.push(" ORDER BY id ASC");
            }
        }

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        qb
    }

    async fn write_set(
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
        mut data: Value,
        options: SetOptions,
        insert_only: bool,
    ) -> StoreResult<()> {
        resolve_server_timestamps(&mut data);

        let sql = if insert_only {
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO NOTHING"
        } else if options.merge {
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO UPDATE SET data = documents.data || EXCLUDED.data"
        } else {
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data"
        };

        let result = sqlx::query(sql)
            .bind(collection)
            .bind(id)
            .bind(Json(data))
            .execute(&mut **tx)
            .await?;

        if insert_only && result.rows_affected() == 0 {
            return Err(StoreError::PreconditionFailed {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn write_update(
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
        mut patch: Value,
    ) -> StoreResult<()> {
        resolve_server_timestamps(&mut patch);

        let result =
            sqlx::query("UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .bind(Json(patch))
                .execute(&mut **tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn write_increment(
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = jsonb_set(
                data,
                ARRAY[$3::text],
                to_jsonb(COALESCE((data ->> $3::text)::bigint, 0) + $4)
            )
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(delta)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn write_delete(
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
        must_exist: bool,
    ) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&mut **tx)
            .await?;

        if must_exist && result.rows_affected() == 0 {
            return Err(StoreError::PreconditionFailed {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn into_document((id, Json(data)): (String, Json<Value>)) -> Document {
    Document::new(id, data)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(into_document))
    }

    async fn get_documents(&self, collection: &str, ids: &[String]) -> StoreResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = ANY($2)",
        )
        .bind(collection)
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(into_document).collect())
    }

    async fn query_collection(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let mut qb = Self::build_query(collection, query);
        let rows = qb
            .build_query_as::<(String, Json<Value>)>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(into_document).collect())
    }

    async fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn create_document(&self, collection: &str, mut data: Value) -> StoreResult<String> {
        resolve_server_timestamps(&mut data);

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_document_id();
            let result = sqlx::query(
                "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
                 ON CONFLICT (collection, id) DO NOTHING",
            )
            .bind(collection)
            .bind(&id)
            .bind(Json(&data))
            .execute(self.pool.as_ref())
            .await?;

            if result.rows_affected() == 1 {
                debug!(collection, id = %id, "document created");
                return Ok(id);
            }
        }

        Err(StoreError::Backend(format!(
            "could not allocate a document id in {collection} after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::write_set(&mut tx, collection, id, data, options, false).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::write_update(&mut tx, collection, id, patch).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let mut must_be_missing = HashSet::new();
        let mut must_exist = HashSet::new();

        for (collection, id, precondition) in &batch.preconditions {
            let exists = sqlx::query_scalar::<_, i32>(
                "SELECT 1 FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
            )
            .bind(collection)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

            let holds = match precondition {
                Precondition::Exists => exists,
                Precondition::Missing => !exists,
            };
            if !holds {
                return Err(StoreError::PreconditionFailed {
                    collection: collection.clone(),
                    id: id.clone(),
                });
            }

            match precondition {
                Precondition::Exists => must_exist.insert((collection.clone(), id.clone())),
                Precondition::Missing => must_be_missing.insert((collection.clone(), id.clone())),
            };
        }

        // A Missing row cannot be locked; inserting without upsert closes the race.
        for op in batch.ops {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                    options,
                } => {
                    let insert_only = must_be_missing.contains(&(collection.clone(), id.clone()));
                    Self::write_set(&mut tx, &collection, &id, data, options, insert_only).await?;
                }
                WriteOp::Update {
                    collection,
                    id,
                    patch,
                } => Self::write_update(&mut tx, &collection, &id, patch).await?,
                WriteOp::Increment {
                    collection,
                    id,
                    field,
                    delta,
                } => Self::write_increment(&mut tx, &collection, &id, &field, delta).await?,
                WriteOp::Delete { collection, id } => {
                    let guarded = must_exist.contains(&(collection.clone(), id.clone()));
                    Self::write_delete(&mut tx, &collection, &id, guarded).await?;
                }
                WriteOp::DeleteCollection { collection } => {
                    let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
                        .bind(&collection)
                        .execute(&mut *tx)
                        .await?;
                    debug!(collection = %collection, removed = result.rows_affected(), "collection cleared");
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::Cursor;

    #[test]
    fn test_build_query_with_filters_order_cursor_and_limit() {
        let query = Query::new()
            .where_eq("category", "Technology")
            .order_by("timestamp", Direction::Descending)
            .start_after(Cursor {
                value: serde_json::json!(300),
                id: "A2".to_string(),
            })
            .limit(6);

        let qb = PgDocumentStore::build_query("articles", &query);
        let sql = qb.sql();

        assert!(sql.starts_with("SELECT id, data FROM documents WHERE collection = $1"));
        assert!(sql.contains("AND data @> $2"));
        assert!(sql.contains("AND jsonb_exists(data, $3)"));
        assert!(sql.contains("AND (data -> $4, id) < ($5, $6)"));
        assert!(sql.contains("ORDER BY data -> $7 DESC, id DESC"));
        assert!(sql.ends_with("LIMIT $8"));
    }

    #[test]
    fn test_build_query_without_order_pages_by_id() {
        let query = Query::new().start_after(Cursor {
            value: Value::Null,
            id: "U5".to_string(),
        });

        let qb = PgDocumentStore::build_query("users", &query);

        assert!(qb.sql().ends_with("AND id > $2 ORDER BY id ASC"));
    }
}
