pub mod config;
pub mod jobs;
pub mod mq;

pub use jobs::{DiscoverPhotosJob, RefreshActivityJob};
