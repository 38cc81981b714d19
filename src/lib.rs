//! Personal expense tracker: a JSON API and terminal dashboard over SQLite,
//! with category/month analytics and a linear next-month spend forecast.

pub mod analytics;
pub mod backend;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
