//! Tag-based video recommendation service
//!
//! Users pick interest tags, admins tag catalog videos, and
//! `GET /api/v1/recommendations` ranks the catalog by fuzzy tag overlap.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
