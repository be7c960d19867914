//! tiergate - Subscriber-area access core for a gaming-goods storefront.
//!
//! This crate provides the membership backbone of the storefront:
//! - Tiered content access (Bronze through Diamond)
//! - Permission allow-list with soft delete and reactivation on re-grant
//! - Subscriber management (tier, status, login tracking)
//! - Content catalog with per-item minimum tiers

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod service;
