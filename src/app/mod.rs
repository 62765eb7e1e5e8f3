//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the alarm panel: the
//! presentation state machine, the three output controllers, and the
//! per-tick orchestration. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod input;
pub mod ports;
pub mod service;
