//! HR product module: employees, daily attendance and leave approval.
//!
//! Pure pieces ([`filter`], [`stats`], [`workflow`], [`validation`]) do no
//! I/O. [`service`] maps gateway rows to records and [`views`] holds the
//! per-screen state the server and CLI drive.

pub mod display;
pub mod error;
pub mod filter;
pub mod model;
pub mod seed;
pub mod service;
pub mod stats;
pub mod validation;
pub mod views;
pub mod workflow;

pub use error::{HrError, HrResult};
pub use seed::{SeededHrRecords, seed_hr_demo};
pub use service::{AttendanceService, EmployeeService, HrServices, LeaveService};
