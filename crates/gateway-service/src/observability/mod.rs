//! Observability for the API gateway: Prometheus metrics definitions.

pub mod metrics;
