use crate::{time::Time, units::Bytes};

identifier!(PacketNumber);

/// Whether a packet carries data that must be retransmitted if lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HasRetransmittableData {
    /// Pure ACK or control packet.
    No,
    /// The packet carries stream or control data that will be retransmitted.
    Yes,
    /// The packet has not been written yet but will carry retransmittable data.
    Pending,
}

/// What the sender remembers about a packet it put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct TransmissionInfo {
    pub sent_time: Time,
    pub bytes_sent: Bytes,
}
