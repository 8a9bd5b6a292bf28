//! Application layer services implementing business logic.
//!
//! Services coordinate document store reads and writes, validation and the
//! session rules. They are generic over the [`DocumentStore`](crate::domain::repositories::DocumentStore)
//! they run against and are shared by the HTTP handlers and the
//! [`ArticlePage`](crate::view::ArticlePage) view controller.
//!
//! # Available Services
//!
//! - [`services::ArticleService`] - article loader (article, author, related) and authoring
//! - [`services::FeedService`] - recent, featured, trending, category and related listings
//! - [`services::CommentService`] - comment thread listing and appending
//! - [`services::LikeService`] - atomic like toggle and counter reconciliation
//! - [`services::AuthorDirectory`] - batched, cached author name lookups
//! - [`services::AuthService`] - bearer session tokens
//! - [`services::SessionContext`] - current-user observation

pub mod services;
