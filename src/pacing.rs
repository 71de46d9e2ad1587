//! A congestion controller decorator that spreads packets out over time.
//!
//! The wrapped [`SendAlgorithm`] decides how many bytes may be in flight; the [`PacingSender`]
//! decides when, within that budget, the next data packet may leave. Packets are spaced by the
//! time it takes to drain them at a multiple of the estimated bandwidth, except for a short burst
//! allowed at start-up and after every quiescent period.

use std::cmp;

use tracing::{debug, trace};

use crate::{
    config::{PacingConfig, TransportConfig},
    packet::{HasRetransmittableData, PacketNumber},
    sender::{CongestionControlType, CongestionFeedback, CongestionVector, SendAlgorithm},
    time::{Delta, Time},
    units::{BitsPerSec, Bytes},
};

/// Pacing rate multiplier while the wrapped sender is in slow start.
const SLOW_START_AGGRESSION: f64 = 2.0;
/// Pacing rate multiplier in congestion avoidance. Pacing slightly faster than the estimate keeps
/// the pacer from preventing the window from filling.
const CONGESTION_AVOIDANCE_AGGRESSION: f64 = 1.25;

#[derive(Debug, Clone)]
pub struct PacingSender<S> {
    sender: S,
    alarm_granularity: Delta,
    initial_packet_burst: u32,

    // Burst management
    burst_tokens: u32,

    // Schedule
    last_delayed_packet_sent_time: Option<Time>,
    next_packet_send_time: Option<Time>,
    was_last_send_delayed: bool,
    has_valid_rtt: bool,
}

impl<S: SendAlgorithm> PacingSender<S> {
    pub fn new(sender: S, alarm_granularity: Delta, initial_packet_burst: u32) -> Self {
        Self {
            sender,
            alarm_granularity,
            initial_packet_burst,
            burst_tokens: initial_packet_burst,
            last_delayed_packet_sent_time: None,
            next_packet_send_time: None,
            was_last_send_delayed: false,
            has_valid_rtt: false,
        }
    }

    pub fn from_config(sender: S, config: &PacingConfig) -> Self {
        Self::new(
            sender,
            config.alarm_granularity(),
            config.initial_packet_burst,
        )
    }
}

impl<S> PacingSender<S> {
    pub fn inner(&self) -> &S {
        &self.sender
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.sender
    }

    pub fn into_inner(self) -> S {
        self.sender
    }

    pub fn alarm_granularity(&self) -> Delta {
        self.alarm_granularity
    }

    pub fn initial_packet_burst(&self) -> u32 {
        self.initial_packet_burst
    }

    /// Packets that may still bypass pacing in the current burst.
    pub fn burst_tokens(&self) -> u32 {
        self.burst_tokens
    }

    /// Whether an RTT sample has been seen. Until then the pacer is a pass-through.
    pub fn has_valid_rtt(&self) -> bool {
        self.has_valid_rtt
    }

    /// The earliest time the next data packet will be admitted, if a schedule is pending.
    pub fn next_packet_send_time(&self) -> Option<Time> {
        self.next_packet_send_time
    }

    pub fn last_delayed_packet_sent_time(&self) -> Option<Time> {
        self.last_delayed_packet_sent_time
    }

    pub fn was_last_send_delayed(&self) -> bool {
        self.was_last_send_delayed
    }
}

impl<S: SendAlgorithm> SendAlgorithm for PacingSender<S> {
    delegate::delegate! {
        to self.sender {
            fn set_from_config(&mut self, config: &TransportConfig, is_server: bool);
            fn on_incoming_congestion_feedback(
                &mut self,
                feedback: &CongestionFeedback,
                feedback_receive_time: Time,
            );
            fn on_retransmission_timeout(&mut self, packets_retransmitted: bool);
            fn revert_retransmission_timeout(&mut self);
            fn bandwidth_estimate(&self) -> BitsPerSec;
            fn has_reliable_bandwidth_estimate(&self) -> bool;
            fn retransmission_delay(&self) -> Delta;
            fn congestion_window(&self) -> Bytes;
            fn in_slow_start(&self) -> bool;
            fn in_recovery(&self) -> bool;
            fn slow_start_threshold(&self) -> Bytes;
            fn congestion_control_type(&self) -> CongestionControlType;
        }
    }

    fn on_congestion_event(
        &mut self,
        rtt_updated: bool,
        bytes_in_flight: Bytes,
        acked_packets: &CongestionVector,
        lost_packets: &CongestionVector,
    ) {
        if rtt_updated && !self.has_valid_rtt {
            debug!("first RTT sample, pacing enabled");
            self.has_valid_rtt = true;
        }
        self.sender
            .on_congestion_event(rtt_updated, bytes_in_flight, acked_packets, lost_packets);
    }

    fn on_packet_sent(
        &mut self,
        sent_time: Time,
        bytes_in_flight: Bytes,
        packet_number: PacketNumber,
        bytes: Bytes,
        has_retransmittable_data: HasRetransmittableData,
    ) -> bool {
        let in_flight = self.sender.on_packet_sent(
            sent_time,
            bytes_in_flight,
            packet_number,
            bytes,
            has_retransmittable_data,
        );
        // Only data packets are paced, and only once there is an RTT sample
        if has_retransmittable_data != HasRetransmittableData::Yes || !self.has_valid_rtt {
            return in_flight;
        }
        if self.burst_tokens > 0 {
            self.burst_tokens -= 1;
            self.was_last_send_delayed = false;
            self.last_delayed_packet_sent_time = None;
            self.next_packet_send_time = None;
            return in_flight;
        }

        // The next packet may leave once this one has drained at a multiple of the estimated
        // bandwidth.
        let aggression = if self.sender.in_slow_start() {
            SLOW_START_AGGRESSION
        } else {
            CONGESTION_AVOIDANCE_AGGRESSION
        };
        let delay = self
            .bandwidth_estimate()
            .scale_by(aggression)
            .transfer_time(bytes);

        if self.was_last_send_delayed {
            // A delayed send always leaves a pending schedule behind
            debug_assert!(self.next_packet_send_time.is_some());
            let next = self.next_packet_send_time.unwrap_or(sent_time) + delay;
            self.next_packet_send_time = Some(next);
            // Application-limited if the gap since the last delayed send exceeds the pacing delay
            let application_limited = self
                .last_delayed_packet_sent_time
                .is_some_and(|last| sent_time > last + delay);
            let making_up_for_lost_time = next <= sent_time;
            // While the alarm ran late and the application keeps up, keep treating sends as
            // delayed so they go out immediately.
            if making_up_for_lost_time && !application_limited {
                self.last_delayed_packet_sent_time = Some(sent_time);
            } else {
                self.was_last_send_delayed = false;
                self.last_delayed_packet_sent_time = None;
            }
        } else {
            // Clamp against a late alarm so the schedule can't drift unboundedly into the past
            let earliest = (sent_time + delay).saturating_sub(self.alarm_granularity);
            let next = match self.next_packet_send_time {
                Some(next) => cmp::max(next + delay, earliest),
                // No schedule to extend. Matches max(delay, earliest) for any send at least one
                // granularity past the epoch.
                None => earliest,
            };
            self.next_packet_send_time = Some(next);
        }
        in_flight
    }

    fn time_until_send(
        &mut self,
        now: Time,
        bytes_in_flight: Bytes,
        has_retransmittable_data: HasRetransmittableData,
    ) -> Delta {
        let time_until_send =
            self.sender
                .time_until_send(now, bytes_in_flight, has_retransmittable_data);
        if !self.has_valid_rtt {
            return time_until_send;
        }
        if bytes_in_flight == Bytes::ZERO {
            // Entering quiescence
            if self.burst_tokens != self.initial_packet_burst {
                debug!(tokens = self.initial_packet_burst, "refilling burst tokens");
            }
            self.burst_tokens = self.initial_packet_burst;
        }
        if self.burst_tokens > 0 {
            return time_until_send;
        }
        if !time_until_send.is_zero() {
            // The wrapped sender is blocked; never shorten that
            debug_assert!(time_until_send.is_infinite());
            return time_until_send;
        }
        if has_retransmittable_data == HasRetransmittableData::No {
            // ACKs don't count against the congestion window
            return Delta::ZERO;
        }

        // Sends due within the alarm granularity go out now
        match self.next_packet_send_time {
            Some(next) if next > now + self.alarm_granularity => {
                let delay = next - now;
                trace!(delay = %delay, "delaying packet");
                self.was_last_send_delayed = true;
                delay
            }
            _ => {
                trace!("sending packet now");
                Delta::ZERO
            }
        }
    }
}
