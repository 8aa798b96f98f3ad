//! Exam submissions and the paged results view over them.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
