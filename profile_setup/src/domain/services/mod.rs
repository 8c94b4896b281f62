pub mod ollama_embeddings;
