pub mod point_qdrant_repository;
