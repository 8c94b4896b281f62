pub mod collection_name;
pub mod conversation;
pub mod point;
pub mod profile_block;
