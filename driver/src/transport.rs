use crate::biasgen::{BiasAddress, BiasType, CoarseRange};
use crate::Error;
use coach_types::RawEvent;

/// Current-monitor select line driven by a routing command.
///
/// Lines multiplex the sixteen C2F channels onto different circuit groups
/// (chip report, table 8).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CurrentOutputSelect {
    None,
    Line0,
    Line1,
    Line2,
    Line3,
    Line4,
    Line5,
    Line6,
    Line7,
}

/// Voltage-monitor select line (chip report, table 3).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VoltageOutputSelect {
    None,
    Line0,
    Line1,
    Line2,
}

/// Voltage-input select line (chip report, table 5).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VoltageInputSelect {
    None,
    Line0,
    Line1,
    Line2,
}

/// Synapse latch selection for stimulation commands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SynapseSelect {
    None,
    Dpi,
    Ddi,
    Lds,
}

/// DAC channels the board can drive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DacChannel {
    Ain0,
    Ain1,
    Ain2,
    Ain3,
    Ain4,
    Ain5,
    Ain6,
    Ain7,
    Ain8,
    Ain9,
    Ain10,
    Ain11,
    Ain12,
    Ain13,
    Ain14,
    Ain15,
    Go20,
    Go21,
    Go22,
    Go23,
    Dac1,
}

/// ADC channels the board can sample.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AdcChannel {
    Aout0,
    Aout1,
    Aout2,
    Aout3,
    Aout4,
    Aout5,
    Aout6,
    Aout7,
    Aout8,
    Aout9,
    Aout10,
    Aout11,
    Aout12,
    Aout13,
    Aout14,
    Aout15,
    Go20N,
    Go21N,
    Go22,
    Go23,
}

/// A single chip command, one transport round trip each.
///
/// The wire encoding belongs to the firmware interface behind [`Transport`];
/// this type only fixes the fields a command carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Program one bias of the bias generator.
    SetBias {
        address: BiasAddress,
        bias_type: BiasType,
        coarse: CoarseRange,
        fine: u8,
    },
    /// Route the chip's monitor and input multiplexers.
    SelectOutputs {
        current_output: CurrentOutputSelect,
        voltage_output: VoltageOutputSelect,
        voltage_input: VoltageInputSelect,
        synapse: SynapseSelect,
        flags: u16,
    },
}

/// Boundary with the serial transport and firmware command encoder.
///
/// Implementations own the session lifecycle (discovery, open, close,
/// firmware handshakes); the driver assumes an already-open session and every
/// method blocks until its round trip completes. Transport-level failures
/// are not retried here; callers decide whether to retry.
pub trait Transport {
    /// Whether the session behind this transport is currently open.
    fn is_open(&self) -> bool;

    /// Encodes and sends one command.
    fn send_command(&mut self, command: Command) -> Result<(), Error>;

    /// Asks the board to buffer output events for the next `window`.
    fn request_event_window(&mut self, window: std::time::Duration) -> Result<(), Error>;

    /// Drains the buffered events of the most recent window.
    fn read_raw_events(&mut self) -> Result<Vec<RawEvent>, Error>;

    /// Drives a DAC channel and returns the quantized voltage actually set.
    fn set_voltage(&mut self, channel: DacChannel, volts: f64) -> Result<f64, Error>;

    /// Samples an ADC channel.
    fn read_voltage(&mut self, channel: AdcChannel) -> Result<f64, Error>;
}
