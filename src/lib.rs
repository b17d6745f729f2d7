//! Multi-user product catalogue backend: register/login with argon2 and JWT,
//! and per-owner product CRUD behind a bearer-token gate.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod products;
pub mod response;
pub mod state;
pub mod users;
