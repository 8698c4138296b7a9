pub mod app_error_impl;
pub mod app_state;
pub mod base_url;
pub mod routes;
