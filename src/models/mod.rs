pub mod link;
pub mod listing;
