pub mod add_conversation;
pub mod create_collection;
pub mod embed_text;
pub mod search_similar;
pub mod setup_conversations;
pub mod upload_profile;
