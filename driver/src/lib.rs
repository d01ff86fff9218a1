//! Bias programming, C2F calibration, and output-event decoding for the
//! CoACH analog neuromorphic test chip.
//!
//! The serial transport and command encoding live behind the
//! [`transport::Transport`] trait; everything here assumes an already-open,
//! exclusively-owned session.

pub mod adapters;
pub mod biasgen;
pub mod calibration;
pub mod device;
pub mod presets;
pub mod thresholds;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use coach_types as types;

pub use adapters::Adapter;
pub use calibration::CalibrationModel;
pub use device::Device;
pub use transport::Transport;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("fine value {value} is outside the [0, 255] bias domain")]
    FineValueOutOfRange { value: f64 },

    #[error(
        "ratio {ratio} pushes the ON fine value of base {base} above 255 ({base} × {ratio} > 255)"
    )]
    ThresholdAboveRange { base: u8, ratio: f64 },

    #[error(
        "ratio {ratio} pushes the OFF fine value of base {base} below 1 ({base} / {ratio} < 1)"
    )]
    ThresholdBelowRange { base: u8, ratio: f64 },

    #[error("the device session is not open")]
    NotConnected,

    #[error(
        "the calibration sweep produced {distinct} distinct samples, a degree {degree} fit needs at least {required}"
    )]
    InsufficientSamples {
        distinct: usize,
        degree: usize,
        required: usize,
    },
}
