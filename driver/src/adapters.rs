use coach_types::{RawEvent, TICKS_PER_SECOND};

/// AER bus address of the DVS pixel's ON comparator (chip report, table 15).
pub const DVS_ON_ADDRESS: u16 = 5;

/// AER bus address of the DVS pixel's OFF comparator.
pub const DVS_OFF_ADDRESS: u16 = 6;

/// Decodes raw capture batches into time-aligned, class-partitioned series.
///
/// An adapter owns nothing but its address sets: decoding is a pure function
/// of the input batch, so decoding the same batch twice yields the same
/// series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adapter {
    on_addresses: Vec<u16>,
    off_addresses: Vec<u16>,
}

/// Number of events of each class in a batch.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EventsLengths {
    pub on: usize,
    pub off: usize,
    pub dropped: usize,
}

/// A decoded batch.
///
/// `t` and `addresses` cover every input event in input order, including
/// events that matched no class; `on_t` and `off_t` are the per-class
/// timestamp subsequences. Created per decode call and not retained by the
/// adapter.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedEvents {
    /// Timestamps in seconds, one per input event.
    pub t: Vec<f64>,
    /// Bus addresses, one per input event.
    pub addresses: Vec<u16>,
    /// Timestamps of ON-class events, in seconds.
    pub on_t: Vec<f64>,
    /// Timestamps of OFF-class events, in seconds.
    pub off_t: Vec<f64>,
    /// Events that matched neither class. A non-zero count is expected when
    /// other circuits share the output bus, not an error.
    pub dropped: usize,
}

impl Default for Adapter {
    /// The DVS pixel's ON/OFF comparator addresses.
    fn default() -> Self {
        Self::new(vec![DVS_ON_ADDRESS], vec![DVS_OFF_ADDRESS])
    }
}

impl Adapter {
    pub fn new(on_addresses: Vec<u16>, off_addresses: Vec<u16>) -> Self {
        Self {
            on_addresses,
            off_addresses,
        }
    }

    /// Counts the events of each class without materializing series.
    pub fn events_lengths(&self, events: &[RawEvent]) -> EventsLengths {
        let mut lengths = EventsLengths::default();
        for event in events {
            if self.on_addresses.contains(&event.address) {
                lengths.on += 1;
            } else if self.off_addresses.contains(&event.address) {
                lengths.off += 1;
            } else {
                lengths.dropped += 1;
            }
        }
        lengths
    }

    /// Converts a batch of raw events into physical-unit series.
    ///
    /// Timestamps become seconds (`t / 1024`), addresses pass through, and
    /// events are partitioned by address-set membership. Input order is
    /// preserved everywhere. Unclassified events are counted and logged, not
    /// treated as a failure.
    pub fn decode(&self, events: &[RawEvent]) -> DecodedEvents {
        let mut decoded = DecodedEvents {
            t: Vec::with_capacity(events.len()),
            addresses: Vec::with_capacity(events.len()),
            ..DecodedEvents::default()
        };
        for event in events {
            let seconds = f64::from(event.t) / TICKS_PER_SECOND;
            decoded.t.push(seconds);
            decoded.addresses.push(event.address);
            if self.on_addresses.contains(&event.address) {
                decoded.on_t.push(seconds);
            } else if self.off_addresses.contains(&event.address) {
                decoded.off_t.push(seconds);
            } else {
                decoded.dropped += 1;
            }
        }
        if decoded.dropped > 0 {
            tracing::warn!(
                "{} of {} events matched no address class",
                decoded.dropped,
                events.len()
            );
        }
        decoded
    }
}
