pub mod link_handlers;
pub mod share_handlers;
