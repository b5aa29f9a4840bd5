//! Course Service
//!
//! In-memory course records behind the `/api/courses` CRUD contract.

use common::logging::init_tracing;
use records_service::config::DEFAULT_COURSE_BIND_ADDRESS;
use records_service::models::Course;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("records_service=debug,course_service=debug,tower_http=debug");
    records_service::server::run::<Course>(DEFAULT_COURSE_BIND_ADDRESS).await
}
