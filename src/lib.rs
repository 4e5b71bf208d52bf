//! Company wellbeing audit engine
//!
//! This crate estimates the hidden cost of burnout for a company from a few
//! calibration answers, and runs the multi-step audit funnel that collects
//! those answers, shows the result and books a follow-up call.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod flow;
pub mod models;
pub mod services;
