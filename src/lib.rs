#[macro_use]
mod ident;

pub mod config;
pub mod pacing;
pub mod packet;
pub mod sender;
pub mod time;
pub mod units;

pub use config::{read_config, Config, Error, PacingConfig, TransportConfig};
pub use pacing::PacingSender;
pub use packet::{HasRetransmittableData, PacketNumber, TransmissionInfo};
pub use sender::{CongestionControlType, CongestionFeedback, CongestionVector, SendAlgorithm};
