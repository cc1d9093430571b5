pub mod handlers;
pub mod mapping;
pub mod repository;
pub mod validation;
pub mod workflow;
