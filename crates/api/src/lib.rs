//! HTTP surface and lifecycle engine for the attendance service.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod service;
pub mod state;
