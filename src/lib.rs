//! LaserLift controller library.
//!
//! The control core of a laser target game: a game state machine, a
//! three-axis motion controller with crash detection and a gear dispenser,
//! a stepped render pipeline for an 8x32 LED matrix, a status light strip
//! and the event checkers that turn raw inputs into game events.  All of it
//! runs on one cooperative dispatcher and reaches hardware only through the
//! port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod framework;
pub mod fsm;
pub mod pins;

pub mod adapters;
pub mod display;
pub mod drivers;
pub mod motion;
pub mod sensors;
pub mod status_light;
