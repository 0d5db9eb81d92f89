// ===============================
// src/lib.rs
// ===============================
pub mod domain;
pub mod config;
pub mod error;
pub mod metrics;
pub mod recorder;
pub mod engine;
pub mod random_walk;      // engine mock (random walk), pengganti model asli
pub mod cache;
pub mod forecast;
pub mod events;
pub mod post_event;
pub mod orchestrator;
