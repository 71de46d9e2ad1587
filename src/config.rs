use std::path::Path;

use crate::{
    sender::CongestionControlType,
    time::Delta,
    units::{Bytes, Microsecs, Nanosecs},
};

/// Settings for a [`PacingSender`](crate::PacingSender).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize,
)]
pub struct PacingConfig {
    /// The smallest delay the connection's alarm can reliably wait for. Sends scheduled within
    /// this quantum of now go out immediately.
    #[builder(default = Microsecs::new(1_000), setter(into))]
    #[serde(default = "PacingConfig::default_alarm_granularity")]
    pub alarm_granularity: Microsecs,
    /// Packets allowed out unpaced after start-up and after every quiescent period.
    #[builder(default = 10)]
    #[serde(default = "PacingConfig::default_initial_packet_burst")]
    pub initial_packet_burst: u32,
}

impl PacingConfig {
    fn default_alarm_granularity() -> Microsecs {
        Microsecs::new(1_000)
    }

    fn default_initial_packet_burst() -> u32 {
        10
    }

    pub fn alarm_granularity(&self) -> Delta {
        self.alarm_granularity.into_delta()
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Negotiated connection parameters handed to the congestion controller.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct TransportConfig {
    /// The congestion control algorithm the peers agreed on.
    #[builder(default)]
    pub congestion_control: CongestionControlType,
    /// An RTT hint to use before the first sample arrives.
    #[builder(default, setter(into, strip_option))]
    pub initial_rtt: Option<Nanosecs>,
    /// Upper bound on the initial congestion window.
    #[builder(default, setter(into, strip_option))]
    pub max_initial_window: Option<Bytes>,
}

/// A full sender configuration, as read from disk.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct Config {
    #[builder(default)]
    pub pacing: PacingConfig,
    #[builder(default)]
    pub transport: TransportConfig,
}

pub fn read_config(path: impl AsRef<Path>) -> Result<Config, Error> {
    let s = std::fs::read_to_string(path)?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config, Error> {
    Ok(serde_json::from_str(s)?)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serde error")]
    Serde(#[from] serde_json::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}
