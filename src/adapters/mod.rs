//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements            | Connects to                       |
//! |------------|-----------------------|-----------------------------------|
//! | `hardware` | SensorPort            | beam GPIO, ADC scan, key buffer   |
//! |            | ActuatorPort          | servo PWM channels                |
//! |            | DisplayPort           | MAX7219 chain over SPI            |
//! |            | StripPort             | status light strip                |
//! | `log_sink` | EventSink             | `log` facade                      |
//! | `sim`      | all hardware ports    | in-memory cabinet (host, `sim`)   |

pub mod hardware;
pub mod log_sink;
#[cfg(feature = "sim")]
pub mod sim;
