//! Domain layer: entities and store contracts.
//!
//! The domain layer has no dependency on infrastructure or presentation. Store
//! traits defined here are implemented in `crate::infrastructure` and consumed by
//! the services in [`crate::application::services`].
//!
//! # Article Page Data Flow
//!
//! 1. The article, its author and related articles are read ([`entities::Article`], [`entities::Author`])
//! 2. Comments are listed with commenter names resolved in one batch ([`entities::CommentView`])
//! 3. The like status of the current user is read ([`entities::LikeStatus`])
//! 4. Likes and comments are written back through [`repositories::DocumentStore`]

pub mod entities;
pub mod repositories;
