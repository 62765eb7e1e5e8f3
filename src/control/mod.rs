//! Output controllers — pure, tick-driven logic for the three output
//! channels. Each owns only its own schedule/state and is driven by the
//! [`PanelService`](crate::app::service::PanelService); hardware access
//! goes through the port traits passed into each call.

pub mod beeper;
pub mod indicator;
pub mod screen;
