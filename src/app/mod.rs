//! Application core: node domain logic, zero I/O.
//!
//! Feed vocabulary, actuator dispatch, inbound reconciliation and the
//! service that ties the periodic units together. All interaction with
//! hardware and the remote channel goes through the **port traits** in
//! [`ports`], so this layer is testable without real peripherals.

pub mod commands;
pub mod dispatch;
pub mod ports;
pub mod reconciler;
pub mod service;
