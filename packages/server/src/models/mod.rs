pub mod activity;
pub mod contributor;
pub mod photo;
pub mod shared;
pub mod sync;
pub mod vote;
