mod discovery;
mod refresh;

pub use discovery::consume_discovery_jobs;
pub use refresh::consume_refresh_jobs;
