pub mod catalog_service;
pub mod form_service;
