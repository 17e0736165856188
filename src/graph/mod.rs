pub mod arena;
pub mod bfs;
pub mod builder;
pub mod types;
