//! Liveness, readiness and service info. All public.

pub mod controller;
pub mod model;
pub mod router;
