pub mod ai;
pub mod applications;
pub mod assignments;
pub mod auth;
pub mod health;
pub mod invoices;
pub mod messages;
pub mod resources;
pub mod students;
pub mod submissions;
pub mod timetable;
