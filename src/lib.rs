pub mod configuration;
pub mod database;
pub mod domain;
pub mod error;
pub mod metadata_client;
pub mod repository;
pub mod routes;
pub mod service;
pub mod startup;
pub mod state;
pub mod telemetry;
