/// Native module contains implementations of core traits
/// that spawn commands directly as child processes.
pub mod executor;
