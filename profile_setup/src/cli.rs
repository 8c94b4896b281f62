use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{ArgGroup, Parser};
use serde_json::Value as JsonValue;
use tracing::{error, info_span, Instrument};

use crate::{
    configuration::Settings,
    domain::entities::{
        collection_name::{CollectionKind, UserId},
        point::SimilarPoint,
        profile_block::{validate_json_file, ProfileBlocksError},
    },
    personal_store::PersonalStore,
    startup::Application,
    use_cases::search_similar::DEFAULT_SEARCH_LIMIT,
};

const EXAMPLES: &str = "Examples:
  profile_setup nana profile.json                    # Upload profile
  profile_setup nana --setup-conversations           # Setup conversations collection
  profile_setup nana --test-search \"ADHS tips\"       # Test search functionality";

/// Personal AI Assistant Profile Setup
#[derive(Debug, Parser)]
#[command(name = "profile_setup", version, after_help = EXAMPLES)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .args(["json_file", "setup_conversations", "test_search", "add_conversation"])
))]
pub struct Cli {
    /// User ID (eg., nana, alex)
    pub user_id: UserId,

    /// JSON profile file to upload
    pub json_file: Option<PathBuf>,

    /// Setup the conversations collection of the user
    #[arg(long)]
    pub setup_conversations: bool,

    /// Search the blocks the most similar to QUERY
    #[arg(long, value_name = "QUERY")]
    pub test_search: Option<String>,

    /// Store an exchange in the conversations collection of the user
    #[arg(long, num_args = 2, value_names = ["USER_MESSAGE", "ASSISTANT_RESPONSE"])]
    pub add_conversation: Option<Vec<String>>,

    /// Collection searched by --test-search: profile or conversations
    #[arg(long, default_value = "profile", requires = "test_search")]
    pub collection: CollectionKind,

    /// Maximum number of results of --test-search
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT, requires = "test_search")]
    pub limit: u64,

    /// Qdrant host (default from configuration: localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// Qdrant gRPC port (default from configuration: 6334)
    #[arg(long)]
    pub port: Option<u16>,
}

/// The operation requested on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    UploadProfile {
        json_file: PathBuf,
    },
    SetupConversations,
    TestSearch {
        query: String,
        collection: CollectionKind,
        limit: u64,
    },
    AddConversation {
        user_message: String,
        assistant_response: String,
    },
}

impl Cli {
    /// The argument group makes exactly one operation present
    pub fn operation(&self) -> Option<Operation> {
        if let Some(json_file) = &self.json_file {
            return Some(Operation::UploadProfile {
                json_file: json_file.clone(),
            });
        }

        if self.setup_conversations {
            return Some(Operation::SetupConversations);
        }

        if let Some(query) = &self.test_search {
            return Some(Operation::TestSearch {
                query: query.clone(),
                collection: self.collection,
                limit: self.limit,
            });
        }

        match self.add_conversation.as_deref() {
            Some([user_message, assistant_response]) => Some(Operation::AddConversation {
                user_message: user_message.clone(),
                assistant_response: assistant_response.clone(),
            }),
            _ => None,
        }
    }

    /// Applies `--host` and `--port` over the configuration
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.qdrant.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.qdrant.port = port;
        }
    }
}

/// Runs the command line until completion and returns the process exit code
///
/// Inputs are checked before connecting to Qdrant: an invalid profile file never reaches the store.
pub async fn run(cli: Cli, mut settings: Settings) -> ExitCode {
    let Some(operation) = cli.operation() else {
        println!("No operation requested.");
        return command_failed();
    };
    cli.apply_overrides(&mut settings);

    if let Operation::UploadProfile { json_file } = &operation {
        println!(
            "Uploading for user '{}' from '{}' ...",
            cli.user_id,
            json_file.display()
        );
        if !check_profile_file(json_file) {
            return command_failed();
        }
    }

    let qdrant_address = format!("{}:{}", settings.qdrant.host, settings.qdrant.port);
    let application = match Application::build(settings, cli.user_id.clone()).await {
        Ok(application) => application,
        Err(error) => {
            error!(?error, "Failed to build application");
            println!("Failed to connect to Qdrant: {}", error);
            return command_failed();
        }
    };
    println!("Connected to Qdrant at {}", qdrant_address);

    let success = execute(&operation, application.store())
        .instrument(info_span!("Running command", user_id = %cli.user_id))
        .await;

    if success {
        println!("Command completed successfully!");
        ExitCode::SUCCESS
    } else {
        command_failed()
    }
}

fn command_failed() -> ExitCode {
    println!("Command failed!");
    ExitCode::FAILURE
}

/// Checks the profile file exists and is valid JSON, reporting why it is not
pub fn check_profile_file(json_file: &Path) -> bool {
    match validate_json_file(json_file) {
        Ok(()) => true,
        Err(ProfileBlocksError::FileNotFound(_)) => {
            println!("Error: File '{}' not found.", json_file.display());
            false
        }
        Err(error) => {
            error!(?error, "Invalid profile file");
            println!("Error: '{}' is not a valid JSON file.", json_file.display());
            false
        }
    }
}

/// Executes one operation against the store, returns whether it succeeded
pub async fn execute(operation: &Operation, store: &PersonalStore) -> bool {
    match operation {
        Operation::UploadProfile { json_file } => upload_profile_command(store, json_file).await,
        Operation::SetupConversations => setup_conversations_command(store).await,
        Operation::TestSearch {
            query,
            collection,
            limit,
        } => test_search_command(store, *collection, query, *limit).await,
        Operation::AddConversation {
            user_message,
            assistant_response,
        } => add_conversation_command(store, user_message, assistant_response).await,
    }
}

pub async fn upload_profile_command(store: &PersonalStore, json_file: &Path) -> bool {
    match store.try_upload_profile(json_file).await {
        Ok(nb_blocks) => {
            println!("{} profile blocks uploaded.", nb_blocks);
            println!("Profile upload completed!");
            true
        }
        Err(error) => {
            error!(?error, "Error uploading profile");
            println!("Error uploading profile: {}", error);
            println!("Profile upload failed!");
            false
        }
    }
}

pub async fn setup_conversations_command(store: &PersonalStore) -> bool {
    println!(
        "Setting up conversations collection for user '{}' ...",
        store.user_id()
    );
    let collection_name = store.collection_name(CollectionKind::Conversations);

    match store.try_setup_conversation_collection().await {
        Ok(nb_points) => {
            println!("Collection '{}' ready: {} points.", collection_name, nb_points);
            println!("Conversations collection ready!");
            true
        }
        Err(error) => {
            error!(?error, "Error setting up conversations collection");
            println!("Error creating collection '{}': {}", collection_name, error);
            println!("Failed to setup conversations collection!");
            false
        }
    }
}

pub async fn test_search_command(
    store: &PersonalStore,
    collection: CollectionKind,
    query: &str,
    limit: u64,
) -> bool {
    println!(
        "Searching '{}' in '{}' ...",
        query,
        store.collection_name(collection)
    );

    match store.try_search_similar(collection, query, limit).await {
        Ok(similar_points) => {
            if similar_points.is_empty() {
                println!("No results.");
            }
            for (rank, point) in similar_points.iter().enumerate() {
                println!("{}. [{:.4}] {}", rank + 1, point.score, describe(point));
            }
            true
        }
        Err(error) => {
            error!(?error, "Error searching");
            println!("Error searching: {}", error);
            false
        }
    }
}

pub async fn add_conversation_command(
    store: &PersonalStore,
    user_message: &str,
    assistant_response: &str,
) -> bool {
    match store
        .try_add_conversation(user_message, assistant_response)
        .await
    {
        Ok(point_id) => {
            println!(
                "Conversation added to '{}' ({}).",
                store.collection_name(CollectionKind::Conversations),
                point_id
            );
            true
        }
        Err(error) => {
            error!(?error, "Error adding conversation");
            println!("Error adding conversation: {}", error);
            false
        }
    }
}

/// One line summary of a search result
fn describe(point: &SimilarPoint) -> String {
    let field = |name: &str| point.payload.get(name).and_then(JsonValue::as_str);

    match (point.text(), field("category")) {
        (Some(text), Some(category)) => format!("{} ({})", text, category),
        (Some(text), None) => text.to_string(),
        _ => match (field("user_message"), field("assistant_response")) {
            (Some(user_message), Some(assistant_response)) => {
                format!("{} -> {}", user_message, assistant_response)
            }
            _ => JsonValue::Object(point.payload.clone()).to_string(),
        },
    }
}
