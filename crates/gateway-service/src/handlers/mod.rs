//! HTTP request handlers for the API gateway.

pub mod auth_handler;
pub mod gateway;
pub mod health;
pub mod metrics;

pub use auth_handler::{handle_login, handle_register};
pub use gateway::{course_by_id, courses, student_by_id, students};
pub use health::{gateway_info, health_check};
pub use metrics::metrics_handler;
