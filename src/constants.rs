use std::num::NonZeroUsize;

pub const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(4).unwrap();
pub const RESULT_CHANNEL_CAPACITY: usize = 128;
pub const DOTS_PER_LINE: usize = 30;

pub const FAILURE_SEPARATOR: &str = "==============================";
pub const SUMMARY_SEPARATOR: &str = "------------------------------";
