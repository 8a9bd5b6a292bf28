//! Client-side view controllers.
//!
//! A view controller owns the local state one screen renders and drives the
//! application services on the user's behalf.

pub mod article_page;

pub use article_page::{ArticlePage, Loadable, Notice, PageState};
