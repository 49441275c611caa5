//! Library exports for the microservices application
//!
//! URL shortener, timestamp, request header parser and exercise tracker APIs
//! over one embedded database. Exposed as a library for the integration tests
//! and the binary.

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod generator;
pub mod handler;
pub mod links;
pub mod logs;
pub mod model;
pub mod route;
pub mod timestamp;
pub mod validation;
