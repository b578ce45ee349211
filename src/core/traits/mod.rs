pub mod executor;
pub mod reporter;
