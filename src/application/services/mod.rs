//! Business logic services for the application layer.

pub mod article_service;
pub mod auth_service;
pub mod author_directory;
pub mod comment_service;
pub mod feed_service;
pub mod like_service;
pub mod session_context;

pub use article_service::{ArticleChanges, ArticleInput, ArticleService, ArticleView};
pub use auth_service::AuthService;
pub use author_directory::AuthorDirectory;
pub use comment_service::CommentService;
pub use feed_service::{FeedCursor, FeedPage, FeedService};
pub use like_service::{LikeRecount, LikeService};
pub use session_context::{SessionContext, Subscription};
