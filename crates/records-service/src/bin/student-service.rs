//! Student Service
//!
//! In-memory student records behind the `/api/students` CRUD contract.

use common::logging::init_tracing;
use records_service::config::DEFAULT_STUDENT_BIND_ADDRESS;
use records_service::models::Student;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("records_service=debug,student_service=debug,tower_http=debug");
    records_service::server::run::<Student>(DEFAULT_STUDENT_BIND_ADDRESS).await
}
