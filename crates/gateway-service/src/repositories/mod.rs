//! User store implementations.
//!
//! - `users` - the `UserStore` trait and the in-memory store
//! - `pg_users` - PostgreSQL-backed store behind the same trait

pub mod pg_users;
pub mod users;

pub use pg_users::PgUserStore;
pub use users::{InMemoryUserStore, UserStore};
