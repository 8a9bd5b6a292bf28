//! Author display-name resolution with batching and a short-lived cache.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::Author;
use crate::domain::repositories::{DocumentStore, collections};
use crate::error::AppError;
use crate::infrastructure::cache::AuthorCache;

/// Resolves author ids to display names.
///
/// Lookups consult the [`AuthorCache`] first; misses are fetched from the
/// `users` collection in a single batched read and written back to the cache.
pub struct AuthorDirectory<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    cache: Arc<dyn AuthorCache>,
}

impl<S: DocumentStore + ?Sized> AuthorDirectory<S> {
    pub fn new(store: Arc<S>, cache: Arc<dyn AuthorCache>) -> Self {
        Self { store, cache }
    }

    /// Display name of one author.
    ///
    /// Returns `Ok(None)` when the profile does not exist or has no usable name.
    pub async fn display_name(&self, author_id: &str) -> Result<Option<String>, AppError> {
        let mut names = self.display_names(&[author_id.to_string()]).await?;
        Ok(names.remove(author_id))
    }

    /// Display names for a set of authors, keyed by author id.
    ///
    /// Ids without a resolvable name are absent from the result. Duplicate ids are
    /// looked up once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] when the store read fails.
    pub async fn display_names(
        &self,
        author_ids: &[String],
    ) -> Result<HashMap<String, String>, AppError> {
        let unique: BTreeSet<&str> = author_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
            .collect();

        let mut names = HashMap::with_capacity(unique.len());
        let mut misses = Vec::new();

        for id in unique {
            match self.cache.get_name(id).await {
                Ok(Some(name)) => {
                    names.insert(id.to_string(), name);
                }
                Ok(None) => misses.push(id.to_string()),
                Err(e) => {
                    warn!("Author cache lookup failed for {}: {}", id, e);
                    misses.push(id.to_string());
                }
            }
        }

        if misses.is_empty() {
            return Ok(names);
        }

        debug!(count = misses.len(), "resolving authors from store");
        let docs = self
            .store
            .get_documents(collections::USERS, &misses)
            .await?;

        for doc in docs {
            let author: Author = match doc.decode(collections::USERS) {
                Ok(author) => author,
                Err(e) => {
                    warn!("Skipping unreadable author profile: {}", e);
                    continue;
                }
            };

            if let Some(name) = author.name() {
                if let Err(e) = self.cache.set_name(&doc.id, name, None).await {
                    warn!("Author cache write failed for {}: {}", doc.id, e);
                }
                names.insert(doc.id.clone(), name.to_string());
            }
        }

        Ok(names)
    }

    /// Forgets the cached name of one author, e.g. after a profile update.
    pub async fn invalidate(&self, author_id: &str) {
        if let Err(e) = self.cache.invalidate(author_id).await {
            warn!("Author cache invalidation failed for {}: {}", author_id, e);
        }
    }

    /// Forgets every cached name.
    pub async fn clear(&self) {
        if let Err(e) = self.cache.clear().await {
            warn!("Author cache clear failed: {}", e);
        }
    }
}
