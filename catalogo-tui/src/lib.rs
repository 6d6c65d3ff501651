//! Terminal admin client for the catalog REST API.
//!
//! The controllers in [`list`] and [`detail`] hold all screen state and talk
//! to the backend through [`api_client::CatalogApi`]; the views only render
//! what the controllers expose.

pub mod api_client;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod events;
pub mod input;
pub mod keys;
pub mod list;
pub mod nav;
pub mod notifications;
pub mod persistence;
pub mod ports;
pub mod state;
pub mod telemetry;
pub mod theme;
pub mod views;
pub mod widgets;
