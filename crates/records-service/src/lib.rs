//! Records Service Library
//!
//! In-memory student and course collections exposed over the CRUD contract
//! the API gateway forwards to:
//!
//! - `GET /api/{collection}` lists every record
//! - `GET /api/{collection}/:id` fetches one record
//! - `POST /api/{collection}` creates a record (201)
//! - `PUT /api/{collection}/:id` partially updates a record
//! - `DELETE /api/{collection}/:id` removes a record
//!
//! One binary is built per collection (`student-service`, `course-service`).

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;
pub mod store;
