//! Restaurant menu service: customer menu, reviews, weather-driven hero
//! banner and flavor shaker, plus the admin inventory, metrics and review
//! moderation API. The [`client`] module holds the state a storefront or admin
//! UI binds to.

pub mod app;
pub mod audit;
pub mod client;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod integrations;
pub mod middleware;
pub mod models;
pub mod mood;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
