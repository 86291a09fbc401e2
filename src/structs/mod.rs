pub mod link_form;
pub mod link_request;
