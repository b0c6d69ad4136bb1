//! HTTP service for the blog: article CRUD over SQLite, guarded by a shared
//! admin secret, plus the site's contact form.

pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod request_context;
pub mod routes;
pub mod state;
