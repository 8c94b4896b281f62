pub mod embeddings_service;
pub mod point_repository;
