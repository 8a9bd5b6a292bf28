//! Core domain entities of the blog.
//!
//! Entities are plain data mirroring documents in the store. Field names on the
//! wire are camelCase; timestamps are epoch milliseconds.
//!
//! # Entity Types
//!
//! - [`Article`] - a published article with its denormalized like counter
//! - [`Author`] - a user profile from the `users` collection
//! - [`Comment`] - a comment under an article
//! - [`Like`] - one user's like of one article
//! - [`User`] - the signed-in user of a session
//!
//! Write-side shapes (`NewArticle`, `ArticlePatch`, `NewComment`) build the
//! document bodies handed to the store.

pub mod article;
pub mod author;
pub mod category;
pub mod comment;
pub mod like;
pub mod user;

pub use article::{Article, ArticlePatch, ArticleSummary, NewArticle};
pub use author::{ANONYMOUS, Author, UNKNOWN_AUTHOR};
pub use category::{Category, CategoryFilter, UnknownCategory};
pub use comment::{Comment, CommentView, MAX_COMMENT_CHARS, NewComment};
pub use like::{Like, LikeState, LikeStatus};
pub use user::User;
