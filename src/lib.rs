//! Photoden - A lightweight web media gallery
//!
//! This library provides the core functionality for the Photoden gallery.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
