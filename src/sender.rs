//! The interface between the pacer and the congestion controller it wraps.

use smallvec::SmallVec;

use crate::{
    config::TransportConfig,
    packet::{HasRetransmittableData, PacketNumber, TransmissionInfo},
    time::{Delta, Time},
    units::{BitsPerSec, Bytes},
};

/// Packets acknowledged or declared lost by a single congestion event.
pub type CongestionVector = SmallVec<[(PacketNumber, TransmissionInfo); 4]>;

/// The congestion control algorithm in use on a connection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derivative::Derivative, serde::Serialize, serde::Deserialize,
)]
#[derivative(Default)]
pub enum CongestionControlType {
    #[derivative(Default)]
    Cubic,
    Reno,
    InterArrival,
    FixRate,
}

/// Congestion feedback reported by the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CongestionFeedback {
    /// TCP-style feedback carrying the receiver's window.
    Tcp { receive_window: Bytes },
    /// The peer asks the sender to hold a fixed rate.
    FixRate { bitrate: BitsPerSec },
}

/// A congestion control strategy: decides how much may be in flight and when the next packet may
/// leave.
///
/// All methods are called from the thread that owns the connection.
pub trait SendAlgorithm {
    /// Applies negotiated connection parameters.
    fn set_from_config(&mut self, config: &TransportConfig, is_server: bool);

    fn on_incoming_congestion_feedback(
        &mut self,
        feedback: &CongestionFeedback,
        feedback_receive_time: Time,
    );

    /// Reports newly acknowledged and lost packets. `rtt_updated` is set when the acknowledgements
    /// produced a new RTT sample.
    fn on_congestion_event(
        &mut self,
        rtt_updated: bool,
        bytes_in_flight: Bytes,
        acked_packets: &CongestionVector,
        lost_packets: &CongestionVector,
    );

    /// Informs the strategy that a packet was sent. Returns whether the packet counts against
    /// bytes in flight.
    fn on_packet_sent(
        &mut self,
        sent_time: Time,
        bytes_in_flight: Bytes,
        packet_number: PacketNumber,
        bytes: Bytes,
        has_retransmittable_data: HasRetransmittableData,
    ) -> bool;

    fn on_retransmission_timeout(&mut self, packets_retransmitted: bool);

    /// Undoes the last retransmission timeout after it turned out to be spurious.
    fn revert_retransmission_timeout(&mut self);

    /// How long to wait before sending the next packet. `Delta::ZERO` means send now and
    /// `Delta::INFINITE` means the strategy is blocked.
    fn time_until_send(
        &mut self,
        now: Time,
        bytes_in_flight: Bytes,
        has_retransmittable_data: HasRetransmittableData,
    ) -> Delta;

    fn bandwidth_estimate(&self) -> BitsPerSec;

    fn has_reliable_bandwidth_estimate(&self) -> bool;

    fn retransmission_delay(&self) -> Delta;

    fn congestion_window(&self) -> Bytes;

    fn in_slow_start(&self) -> bool;

    fn in_recovery(&self) -> bool;

    fn slow_start_threshold(&self) -> Bytes;

    fn congestion_control_type(&self) -> CongestionControlType;
}

impl<S: SendAlgorithm + ?Sized> SendAlgorithm for Box<S> {
    fn set_from_config(&mut self, config: &TransportConfig, is_server: bool) {
        (**self).set_from_config(config, is_server)
    }

    fn on_incoming_congestion_feedback(
        &mut self,
        feedback: &CongestionFeedback,
        feedback_receive_time: Time,
    ) {
        (**self).on_incoming_congestion_feedback(feedback, feedback_receive_time)
    }

    fn on_congestion_event(
        &mut self,
        rtt_updated: bool,
        bytes_in_flight: Bytes,
        acked_packets: &CongestionVector,
        lost_packets: &CongestionVector,
    ) {
        (**self).on_congestion_event(rtt_updated, bytes_in_flight, acked_packets, lost_packets)
    }

    fn on_packet_sent(
        &mut self,
        sent_time: Time,
        bytes_in_flight: Bytes,
        packet_number: PacketNumber,
        bytes: Bytes,
        has_retransmittable_data: HasRetransmittableData,
    ) -> bool {
        (**self).on_packet_sent(
            sent_time,
            bytes_in_flight,
            packet_number,
            bytes,
            has_retransmittable_data,
        )
    }

    fn on_retransmission_timeout(&mut self, packets_retransmitted: bool) {
        (**self).on_retransmission_timeout(packets_retransmitted)
    }

    fn revert_retransmission_timeout(&mut self) {
        (**self).revert_retransmission_timeout()
    }

    fn time_until_send(
        &mut self,
        now: Time,
        bytes_in_flight: Bytes,
        has_retransmittable_data: HasRetransmittableData,
    ) -> Delta {
        (**self).time_until_send(now, bytes_in_flight, has_retransmittable_data)
    }

    fn bandwidth_estimate(&self) -> BitsPerSec {
        (**self).bandwidth_estimate()
    }

    fn has_reliable_bandwidth_estimate(&self) -> bool {
        (**self).has_reliable_bandwidth_estimate()
    }

    fn retransmission_delay(&self) -> Delta {
        (**self).retransmission_delay()
    }

    fn congestion_window(&self) -> Bytes {
        (**self).congestion_window()
    }

    fn in_slow_start(&self) -> bool {
        (**self).in_slow_start()
    }

    fn in_recovery(&self) -> bool {
        (**self).in_recovery()
    }

    fn slow_start_threshold(&self) -> Bytes {
        (**self).slow_start_threshold()
    }

    fn congestion_control_type(&self) -> CongestionControlType {
        (**self).congestion_control_type()
    }
}
