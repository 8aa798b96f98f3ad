//! Student dashboard: one call that gathers what the landing page shows.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
