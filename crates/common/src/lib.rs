//! Common utilities and types shared across the campus gateway components.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (size limits, claims, time checks)
pub mod jwt;

/// Module for tracing subscriber setup
pub mod logging;
