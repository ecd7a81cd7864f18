use chat_state::{ApiError, ChatApiConfig, ChatStore};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ApiError),
    #[error("{0}")]
    Operation(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chatctl", about = "Chat service client")]
struct Cli {
    #[arg(long, env = "CHAT_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List chats.
    List,
    /// Create a chat.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "user")]
        role: String,
        #[arg(long, default_value = "gemini")]
        model_type: String,
    },
    /// Show the message history of a chat.
    Show { chat_id: i64 },
    /// Send a message to a chat.
    Send { chat_id: i64, content: String },
    /// Delete a chat.
    Delete { chat_id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ChatApiConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    let store = ChatStore::from_config(&config)?;

    match cli.command {
        Command::List => {
            store.load_chats().await;
            check_error(&store)?;
            print_json(&store.chats())
        }
        Command::Create { title, role, model_type } => {
            let created = store.create_chat(&title, &role, &model_type).await;
            check_error(&store)?;
            print_json(&created)
        }
        Command::Show { chat_id } => {
            store.load_messages(chat_id).await;
            check_error(&store)?;
            print_json(&store.messages())
        }
        Command::Send { chat_id, content } => {
            let sent = store.send_message(chat_id, &content).await;
            check_error(&store)?;
            print_json(&sent)
        }
        Command::Delete { chat_id } => {
            store.delete_chat(chat_id).await;
            check_error(&store)?;
            print_json(&serde_json::json!({ "deleted": chat_id }))
        }
    }
}

fn check_error(store: &ChatStore) -> Result<(), CliError> {
    match store.error() {
        Some(message) => Err(CliError::Operation(message)),
        None => Ok(()),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
