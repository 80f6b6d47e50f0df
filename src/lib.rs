#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication mechanisms, persistence"]
#![doc = "layer, routing configuration, and error handling for the TaskVault application."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
