use clap::{Parser, Subcommand};
use postboard::action::{handle, Action, Outcome};
use postboard::config::Config;
use postboard::error::{Error, Result};
use postboard::logger;
use postboard::posts::Post;
use postboard::server;
use postboard::storage::JsonFileStorage;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "postboard")]
#[command(about = "Postboard - a small blog backed by one JSON file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: "human" or "json"
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path of the JSON post file
    #[arg(short, long)]
    pub data_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty post file if none exists
    Init,

    /// List all posts
    List,

    /// Add a new post
    Add {
        #[arg(long)]
        author: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,
    },

    /// Show a single post
    Show {
        /// Post id
        id: u64,
    },

    /// Replace the title and content of a post
    Update {
        /// Post id
        id: u64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,
    },

    /// Delete a post (unknown ids are ignored)
    Delete {
        /// Post id
        id: u64,
    },

    /// Like a post (unknown ids are ignored)
    Like {
        /// Post id
        id: u64,
    },

    /// Run the HTTP server
    Serve {
        /// Listen address, e.g. 127.0.0.1:5000
        #[arg(short, long)]
        bind: Option<String>,
    },
}

/// Format output based on format type
fn format_output<T: serde::Serialize + std::fmt::Debug>(data: &T, format: &str) -> Result<String> {
    match format {
        "json" => serde_json::to_string_pretty(data)
            .map_err(|e| Error::MalformedDocument(format!("Failed to serialize JSON: {}", e))),
        _ => Ok(format!("{:#?}", data)),
    }
}

fn format_listing(posts: &[Post], format: &str) -> Result<String> {
    if format == "json" {
        return format_output(&posts, format);
    }
    if posts.is_empty() {
        return Ok("No posts yet".to_string());
    }

    let lines: Vec<String> = posts
        .iter()
        .map(|post| {
            format!(
                "#{} {} by {} ({} likes)\n    {}",
                post.id, post.title, post.author, post.likes, post.content
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Unwrap the post behind an edit-form outcome; a missing post is an error
fn expect_form(outcome: Outcome) -> Result<Post> {
    match outcome {
        Outcome::Form(post) => Ok(post),
        Outcome::NotFound(id) => Err(Error::NotFound(id)),
        other => Err(Error::Server(format!("Unexpected outcome: {:?}", other))),
    }
}

/// Turn a non-listing outcome into a success message or a not-found error
fn confirm(outcome: Outcome, message: String) -> Result<()> {
    match outcome {
        Outcome::NotFound(id) => Err(Error::NotFound(id)),
        _ => {
            println!("✓ {}", message);
            Ok(())
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(path) = cli.data_file {
        config.set_data_file(PathBuf::from(path));
    }
    if let Some(format) = cli.format {
        config.set_output_format(format);
    }
    logger::init(config.get_log_level());

    let storage = JsonFileStorage::new(&config);
    let format = config.get_output_format().to_string();

    match cli.command {
        Commands::Init => {
            if storage.init()? {
                println!("Initialized empty post file at: {}", storage.path().display());
            } else {
                println!("Post file already exists at: {}", storage.path().display());
            }
            Ok(())
        }

        Commands::List => match handle(&storage, Action::List)? {
            Outcome::Listing(posts) => {
                println!("{}", format_listing(&posts, &format)?);
                Ok(())
            }
            other => Err(Error::Server(format!("Unexpected outcome: {:?}", other))),
        },

        Commands::Add {
            author,
            title,
            content,
        } => {
            let outcome = handle(
                &storage,
                Action::Create {
                    author,
                    title,
                    content,
                },
            )?;
            match outcome {
                Outcome::Created(post) if format == "json" => {
                    println!("{}", format_output(&post, &format)?);
                    Ok(())
                }
                Outcome::Created(post) => {
                    println!("✓ Created post {}", post.id);
                    Ok(())
                }
                other => Err(Error::Server(format!("Unexpected outcome: {:?}", other))),
            }
        }

        Commands::Show { id } => {
            let post = expect_form(handle(&storage, Action::ShowUpdateForm { id })?)?;
            println!("{}", format_output(&post, &format)?);
            Ok(())
        }

        Commands::Update { id, title, content } => {
            let outcome = handle(&storage, Action::SubmitUpdate { id, title, content })?;
            confirm(outcome, format!("Updated post {}", id))
        }

        Commands::Delete { id } => {
            let outcome = handle(&storage, Action::Delete { id })?;
            confirm(outcome, format!("Deleted post {}", id))
        }

        Commands::Like { id } => {
            let outcome = handle(&storage, Action::Like { id })?;
            confirm(outcome, format!("Liked post {}", id))
        }

        Commands::Serve { bind } => {
            if let Some(addr) = bind {
                config.set_bind_addr(addr);
            }
            let runtime = tokio::runtime::Runtime::new()
                .map_err(|e| Error::Server(format!("Failed to start runtime: {}", e)))?;
            runtime.block_on(server::serve(&config))
        }
    }
}
