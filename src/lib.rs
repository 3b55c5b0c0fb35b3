//! Attendance tracking service: daily clock-in/out, notes, monthly summaries,
//! and a pass-through to the shift backend.

pub mod api;
pub mod backend;
pub mod config;
pub mod docs;
pub mod error;
pub mod gateway;
pub mod model;
pub mod routes;
pub mod service;
pub mod timesheet;
