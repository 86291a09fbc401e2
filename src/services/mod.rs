pub mod link_service;
