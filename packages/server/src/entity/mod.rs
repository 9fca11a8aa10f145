pub mod activity;
pub mod contributor;
pub mod photo;
pub mod vote;
