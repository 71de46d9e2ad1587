use crate::time::{Delta, Time};

macro_rules! unit {
    ($name: ident) => {
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            PartialOrd,
            Ord,
            PartialEq,
            Eq,
            Hash,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::SubAssign,
            derive_more::Sum,
            derive_more::Display,
            derive_more::FromStr,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const ZERO: $name = Self::new(0);
            pub const MAX: $name = Self::new(u64::MAX);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn into_u64(self) -> u64 {
                self.0
            }

            pub fn scale_by(self, val: f64) -> Self {
                let inner = self.0 as f64 * val;
                Self(inner.round() as u64)
            }
        }
    };
}

unit!(Nanosecs);
unit!(Microsecs);
unit!(Millisecs);

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

// Conversions widen to u128 before scaling
impl Microsecs {
    pub fn into_delta(self) -> Delta {
        Delta::new(u128::from(self.0) * NANOS_PER_MICRO)
    }
}

impl Millisecs {
    pub const fn into_us(self) -> Microsecs {
        Microsecs::new(self.0 * 1_000)
    }

    pub fn into_time(self) -> Time {
        Time::new(u128::from(self.0) * NANOS_PER_MILLI)
    }

    pub fn into_delta(self) -> Delta {
        Delta::new(u128::from(self.0) * NANOS_PER_MILLI)
    }
}

unit!(Bytes);

impl Bytes {
    pub const fn into_bits(self) -> u128 {
        self.0 as u128 * 8
    }
}

unit!(BitsPerSec);

impl BitsPerSec {
    /// The time it takes to drain `size` at this rate. A zero rate transfers instantly.
    pub fn transfer_time(&self, size: Bytes) -> Delta {
        if *self == BitsPerSec::ZERO || size == Bytes::ZERO {
            return Delta::ZERO;
        }
        let ns = size.into_bits() * NANOS_PER_SEC / u128::from(self.0);
        Delta::new(ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_transfer_time() {
        let rate = BitsPerSec::new(100_000_000_000);
        let size = Bytes::new(64);
        // 512 bits at 100 bits/ns, truncated
        assert_eq!(rate.transfer_time(size), Delta::new(5));
    }

    #[test]
    fn zero_rate_transfers_instantly() {
        assert_eq!(BitsPerSec::ZERO.transfer_time(Bytes::new(1500)), Delta::ZERO);
    }

    #[test]
    fn scaled_rate_shortens_transfer() {
        let rate = BitsPerSec::new(800_000);
        let size = Bytes::new(1_000);
        assert_eq!(rate.transfer_time(size), Millisecs::new(10).into_delta());
        assert_eq!(
            rate.scale_by(2.0).transfer_time(size),
            Millisecs::new(5).into_delta()
        );
        assert_eq!(
            rate.scale_by(1.25).transfer_time(size),
            Millisecs::new(8).into_delta()
        );
    }

    #[test]
    fn large_durations_do_not_overflow() {
        assert_eq!(
            Microsecs::MAX.into_delta(),
            Delta::new(u128::from(u64::MAX) * 1_000)
        );
        assert_eq!(
            Millisecs::MAX.into_time(),
            Time::new(u128::from(u64::MAX) * 1_000_000)
        );
    }
}
