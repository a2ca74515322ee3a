//! Homework status bot
//!
//! Polls the Practicum homework API on a fixed period and forwards review
//! status changes of the latest submission to a Telegram chat.

pub mod config;
pub mod models;
pub mod poller;
pub mod services;
pub mod telemetry;
