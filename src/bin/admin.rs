//! CLI administration tool for quill-blog.
//!
//! Issues and revokes session tokens, reconciles like counters, previews article
//! pages, manages the author cache and checks the document store, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a session token for a user (upserts the profile)
//! cargo run --bin admin -- session issue U1 --name "Ada Lovelace"
//!
//! # Revoke a session token
//! cargo run --bin admin -- session revoke <token>
//!
//! # Compare / repair an article's like counter
//! cargo run --bin admin -- likes check A1
//! cargo run --bin admin -- likes recount A1
//!
//! # Render an article page as a signed-in user would see it
//! cargo run --bin admin -- article show A1 --as-user U1
//!
//! # Drop cached author names after bulk profile edits
//! cargo run --bin admin -- cache clear -y
//!
//! # Check the document store
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORE_BACKEND`, `DATABASE_URL`, `SESSION_SIGNING_SECRET`, ...
//! The memory backend starts empty, so most commands are only useful with `postgres`.

use quill_blog::application::services::SessionContext;
use quill_blog::config::{self, Config, StoreBackend};
use quill_blog::domain::entities::User;
use quill_blog::server;
use quill_blog::state::AppState;
use quill_blog::view::{Loadable, PageState};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing quill-blog.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage session tokens
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Inspect and repair like counters
    Likes {
        #[command(subcommand)]
        action: LikesAction,
    },

    /// Preview articles
    Article {
        #[command(subcommand)]
        action: ArticleAction,
    },

    /// Author name cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Document store operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Session token subcommands.
#[derive(Subcommand)]
enum SessionAction {
    /// Issue a new session token
    Issue {
        /// User id
        uid: String,

        /// Display name stored on the user's profile
        #[arg(short, long)]
        name: Option<String>,

        /// Email stored on the user's profile
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Revoke a session token
    Revoke {
        /// Raw token as issued
        token: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Like counter subcommands.
#[derive(Subcommand)]
enum LikesAction {
    /// Compare the stored counter with the like records
    Check { article_id: String },

    /// Rewrite the counter from the like records
    Recount {
        article_id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Article subcommands.
#[derive(Subcommand)]
enum ArticleAction {
    /// Render the article page
    Show {
        article_id: String,

        /// View the page as this user
        #[arg(long)]
        as_user: Option<String>,
    },
}

/// Author cache subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Check cache connectivity
    Check,

    /// Drop every cached author name
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Document store subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check store connectivity
    Check,

    /// Show backend information
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let state = server::build_state(&config).await?;

    match cli.command {
        Commands::Session { action } => handle_session_action(action, &state).await?,
        Commands::Likes { action } => handle_likes_action(action, &state).await?,
        Commands::Article { action } => handle_article_action(action, &state).await?,
        Commands::Cache { action } => handle_cache_action(action, &state).await?,
        Commands::Db { action } => handle_db_action(action, &state, &config).await?,
    }

    Ok(())
}

/// Issues or revokes session tokens.
///
/// # Security
///
/// - Only the HMAC hash of a token is stored
/// - The raw token is displayed once and cannot be retrieved later
async fn handle_session_action(action: SessionAction, state: &AppState) -> Result<()> {
    match action {
        SessionAction::Issue { uid, name, email } => {
            println!("{}", "🔑 Issue Session Token".bright_blue().bold());
            println!();

            let user = User {
                uid,
                display_name: name,
                email,
            };
            let token = state.auth_service.issue_session(&user).await?;

            println!("  User:  {}", user.uid.cyan());
            if let Some(name) = &user.display_name {
                println!("  Name:  {}", name.cyan());
            }
            println!("  Token: {}", token.bright_yellow().bold());
            println!();
            println!(
                "{}",
                "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
                    .red()
                    .bold()
            );
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/me",
                token.bright_yellow()
            );
            println!();
        }
        SessionAction::Revoke { token, yes } => {
            println!("{}", "🔒 Revoke Session Token".bright_blue().bold());
            println!();

            let user = state.auth_service.authenticate(&token).await?;
            println!("  User: {}", user.uid.cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Revoke this session?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            state.auth_service.revoke(&token).await?;

            println!("{}", "✅ Session revoked".green().bold());
            println!();
        }
    }

    Ok(())
}

/// Compares or repairs the denormalized like counter of an article.
async fn handle_likes_action(action: LikesAction, state: &AppState) -> Result<()> {
    match action {
        LikesAction::Check { article_id } => {
            let recount = state.like_service.inspect(&article_id).await?;
            print_recount(&recount.article_id, recount.stored, recount.actual);
        }
        LikesAction::Recount { article_id, yes } => {
            let recount = state.like_service.inspect(&article_id).await?;
            print_recount(&recount.article_id, recount.stored, recount.actual);

            if !recount.drifted() {
                return Ok(());
            }

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Set likeCount to {}?", recount.actual))
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let applied = state.like_service.recount(&article_id).await?;
            println!(
                "{}",
                format!("✅ likeCount set to {}", applied.actual).green().bold()
            );
        }
    }

    Ok(())
}

fn print_recount(article_id: &str, stored: i64, actual: i64) {
    println!("{}", "❤️  Like Counter".bright_blue().bold());
    println!();
    println!("  Article:      {}", article_id.cyan());
    println!("  Stored count: {}", stored.to_string().bright_white().bold());
    println!("  Like records: {}", actual.to_string().bright_white().bold());
    if stored == actual {
        println!("  Status:       {}", "IN SYNC".green());
    } else {
        println!("  Status:       {}", "DRIFTED".red());
    }
    println!();
}

/// Renders an article page through the same controller clients use.
async fn handle_article_action(action: ArticleAction, state: &AppState) -> Result<()> {
    match action {
        ArticleAction::Show {
            article_id,
            as_user,
        } => {
            let session = match as_user {
                Some(uid) => SessionContext::with_user(User::new(uid)),
                None => SessionContext::new(),
            };
            let page = state.article_page(&session);

            page.navigate(&article_id).await;
            print_page(&page.snapshot().await);
        }
    }

    Ok(())
}

fn print_page(page: &PageState) {
    if let Some(notice) = &page.notice {
        println!("{} {}", "!".yellow().bold(), notice.message().yellow());
        println!();
    }

    match &page.article {
        Loadable::Ready(view) => {
            let article = &view.article;
            println!("{}", article.title.bright_white().bold());
            if !article.subtitle.is_empty() {
                println!("{}", article.subtitle.bright_black());
            }
            println!(
                "  {} · {} · {}",
                view.author_name.cyan(),
                article.category.magenta(),
                article
                    .created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
            if let Some(cover) = article.cover_url() {
                println!("  Cover: {}", cover.bright_black());
            }
            println!();
            println!("  {}", article.summary().excerpt);
            println!();

            match &view.related {
                Some(related) if !related.is_empty() => {
                    println!("{}", "Related".bright_white().bold());
                    for summary in related {
                        println!("  - {} {}", summary.title, summary.id.bright_black());
                    }
                    println!();
                }
                Some(_) => {}
                None => println!("{}", "  Related articles unavailable".bright_black()),
            }
        }
        Loadable::Missing => {
            println!("{}", "Article not found".red().bold());
            return;
        }
        Loadable::Failed(reason) => {
            println!("{} {}", "Failed to load article:".red().bold(), reason);
            return;
        }
        Loadable::Loading => println!("{}", "Loading...".bright_black()),
    }

    match &page.like {
        Loadable::Ready(status) => {
            let heart = if status.liked { "♥".red() } else { "♡".normal() };
            println!("{} {}", heart, status.like_count.to_string().bold());
        }
        _ => println!("{}", "♡ -".bright_black()),
    }
    println!();

    match &page.comments {
        Loadable::Ready(comments) => {
            println!(
                "{}",
                format!("Comments ({})", comments.len()).bright_white().bold()
            );
            for comment in comments {
                println!(
                    "  {} {}",
                    comment.display_name.cyan(),
                    comment
                        .created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
                println!("    {}", comment.text);
            }
        }
        Loadable::Failed(reason) => println!("{} {}", "Comments unavailable:".red(), reason),
        _ => println!("{}", "Comments unavailable".bright_black()),
    }
    println!();
}

/// Handles document store diagnostic commands.
async fn handle_cache_action(action: CacheAction, state: &AppState) -> Result<()> {
    match action {
        CacheAction::Check => {
            if state.cache.health_check().await {
                println!("{}", "✅ Author cache OK".green().bold());
            } else {
                println!("{}", "❌ Author cache unreachable".red().bold());
            }
        }
        CacheAction::Clear { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Drop every cached author name?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            state.authors.clear().await;
            println!("{}", "✅ Author cache cleared".green().bold());
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, state: &AppState, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking document store...".bright_blue());

            state.store.ping().await?;

            println!("{}", "✅ Document store OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Document Store Information".bright_blue().bold());
            println!();
            println!("  Backend: {:?}", config.store_backend);

            if config.store_backend == StoreBackend::Postgres {
                let pool = server::connect_postgres(config).await?;
                let version: String = sqlx::query_scalar("SELECT version()")
                    .fetch_one(&pool)
                    .await?;
                let documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
                    .fetch_one(&pool)
                    .await?;

                println!("  PostgreSQL: {}", version.bright_white());
                println!(
                    "  Documents:  {}",
                    documents.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}
