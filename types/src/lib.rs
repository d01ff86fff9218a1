/// Number of raw timestamp ticks per second.
///
/// The chip's event monitor timestamps events in units of 1/1024 s, so a
/// tick count divided by this constant is a duration in seconds.
pub const TICKS_PER_SECOND: f64 = 1024.0;

/// A raw address-event record read from the chip's output bus.
///
/// Records are produced in batches by the transport and carry no polarity of
/// their own; the emitting circuit is identified by the bus address.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RawEvent {
    /// Timestamp in 1/1024 s ticks, counted from the start of the capture
    /// window.
    pub t: u32,
    /// AER bus address of the source circuit.
    pub address: u16,
}

impl RawEvent {
    /// The timestamp converted to seconds.
    pub fn seconds(&self) -> f64 {
        f64::from(self.t) / TICKS_PER_SECOND
    }
}
