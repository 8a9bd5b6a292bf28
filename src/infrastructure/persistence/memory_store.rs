//! In-process document store.
//!
//! Backs `STORE_BACKEND=memory` deployments and every test in the crate. Query
//! ordering follows the PostgreSQL `jsonb` ordering so both stores page the same
//! way.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::repositories::{
    Direction, Document, DocumentStore, Precondition, Query, SetOptions, StoreError, StoreResult,
    WriteBatch, WriteOp, merge_fields, resolve_server_timestamps,
};
use crate::utils::id_generator::generate_document_id;

type Collection = BTreeMap<String, Value>;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rank of a JSON type in the `jsonb` ordering: null < string < number < bool < array < object.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn matches_filters(data: &Value, query: &Query) -> bool {
    query
        .filters
        .iter()
        .all(|(field, expected)| data.get(field) == Some(expected))
}

/// Applies `query` to one collection snapshot.
fn run_query(collection: &Collection, query: &Query) -> Vec<Document> {
    let mut docs: Vec<(&String, &Value)> = collection
        .iter()
        .filter(|(_, data)| matches_filters(data, query))
        .collect();

    if let Some(order) = &query.order_by {
        docs.retain(|(_, data)| data.get(&order.field).is_some());

        let key = |id: &String, data: &Value| -> (Value, String) {
            (
                data.get(&order.field).cloned().unwrap_or(Value::Null),
                id.clone(),
            )
        };
        let cmp_keys = |a: &(Value, String), b: &(Value, String)| {
            compare_values(&a.0, &b.0).then_with(|| a.1.cmp(&b.1))
        };

        docs.sort_by(|(id_a, a), (id_b, b)| {
            let ord = cmp_keys(&key(id_a, a), &key(id_b, b));
            match order.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        });

        if let Some(cursor) = &query.start_after {
            let cursor_key = (cursor.value.clone(), cursor.id.clone());
            docs.retain(|(id, data)| {
                let ord = cmp_keys(&key(id, data), &cursor_key);
                match order.direction {
                    Direction::Ascending => ord == Ordering::Greater,
                    Direction::Descending => ord == Ordering::Less,
                }
            });
        }
    } else if let Some(cursor) = &query.start_after {
        docs.retain(|(id, _)| id.as_str() > cursor.id.as_str());
    }

    let limit = query.limit.unwrap_or(usize::MAX);
    docs.into_iter()
        .take(limit)
        .map(|(id, data)| Document::new(id.clone(), data.clone()))
        .collect()
}

fn op_collection(op: &WriteOp) -> &str {
    match op {
        WriteOp::Set { collection, .. }
        | WriteOp::Update { collection, .. }
        | WriteOp::Increment { collection, .. }
        | WriteOp::Delete { collection, .. }
        | WriteOp::DeleteCollection { collection } => collection,
    }
}

fn apply_op(docs: &mut Collection, op: WriteOp) -> StoreResult<()> {
    match op {
        WriteOp::Set {
            id,
            mut data,
            options,
            ..
        } => {
            resolve_server_timestamps(&mut data);
            match docs.entry(id) {
                Entry::Occupied(mut entry) if options.merge => merge_fields(entry.get_mut(), &data),
                Entry::Occupied(mut entry) => {
                    entry.insert(data);
                }
                Entry::Vacant(entry) => {
                    entry.insert(data);
                }
            }
        }
        WriteOp::Update {
            collection,
            id,
            mut patch,
        } => {
            let existing = docs
                .get_mut(&id)
                .ok_or(StoreError::NotFound { collection, id })?;
            resolve_server_timestamps(&mut patch);
            merge_fields(existing, &patch);
        }
        WriteOp::Increment {
            collection,
            id,
            field,
            delta,
        } => {
            let existing = docs
                .get_mut(&id)
                .ok_or(StoreError::NotFound { collection, id })?;
            let current = existing.get(&field).and_then(Value::as_i64).unwrap_or(0);
            let mut patch = Map::new();
            patch.insert(field, Value::from(current + delta));
            merge_fields(existing, &Value::Object(patch));
        }
        WriteOp::Delete { id, .. } => {
            docs.remove(&id);
        }
        WriteOp::DeleteCollection { .. } => docs.clear(),
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn get_documents(&self, collection: &str, ids: &[String]) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| docs.get(id).map(|data| Document::new(id.clone(), data.clone())))
            .collect())
    }

    async fn query_collection(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| run_query(docs, query))
            .unwrap_or_default())
    }

    async fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn create_document(&self, collection: &str, mut data: Value) -> StoreResult<String> {
        resolve_server_timestamps(&mut data);
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut id = generate_document_id();
        while docs.contains_key(&id) {
            id = generate_document_id();
        }
        docs.insert(id.clone(), data);
        debug!(collection, id = %id, "document created");
        Ok(id)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        apply_op(
            docs,
            WriteOp::Set {
                collection: collection.to_string(),
                id: id.to_string(),
                data,
                options,
            },
        )
    }

    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        apply_op(
            docs,
            WriteOp::Update {
                collection: collection.to_string(),
                id: id.to_string(),
                patch,
            },
        )
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut collections = self.collections.write().await;

        for (collection, id, precondition) in &batch.preconditions {
            let exists = collections
                .get(collection)
                .is_some_and(|docs| docs.contains_key(id));
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
        }

        // Writes go to copies of the touched collections; nothing is visible until all succeed.
        let mut staged: HashMap<String, Collection> = HashMap::new();
        for op in batch.ops {
            let name = op_collection(&op).to_string();
            let docs = staged
                .entry(name.clone())
                .or_insert_with(|| collections.get(&name).cloned().unwrap_or_default());
            apply_op(docs, op)?;
        }

        for (name, docs) in staged {
            collections.insert(name, docs);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
