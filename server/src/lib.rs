//! Avatar Server
//!
//! Self-hosted backend for user profile images: direct uploads and
//! fetch-from-URL, with content sniffing and safe server-side file naming.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod profile;
