//! Application core — pure domain logic, zero I/O.
//!
//! This module wires the game FSM, the motion controller, the render
//! pipeline and the event checker bank onto the cooperative dispatcher.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
