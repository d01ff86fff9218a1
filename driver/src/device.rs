use crate::biasgen;
use crate::biasgen::{BiasAddress, BiasType, CoarseRange};
use crate::transport::{
    AdcChannel, Command, CurrentOutputSelect, DacChannel, SynapseSelect, Transport,
    VoltageInputSelect, VoltageOutputSelect,
};
use crate::Error;
use coach_types::RawEvent;

/// Extra blocking time after a capture window before draining events, to let
/// stragglers reach the board's queue.
pub const EVENT_READ_MARGIN: std::time::Duration = std::time::Duration::from_millis(10);

/// An exclusive handle on one chip session.
///
/// The transport must already be open; the device never opens or closes
/// sessions itself and reports [`Error::NotConnected`] when the session has
/// gone away. Calls block until their transport round trip completes and
/// take `&mut self`, so a session has one caller at a time.
pub struct Device<T: Transport> {
    transport: T,
}

impl<T: Transport> Device<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    fn check_open(&self) -> Result<(), Error> {
        if self.transport.is_open() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    /// Programs one bias and returns the intended physical current in amps.
    ///
    /// The fine value must lie in [0, 255]; fractional values are truncated
    /// toward zero with a warning. The returned current is the value the bias
    /// generator was asked to produce, not a measurement. Exactly one command
    /// is issued per call.
    pub fn set_bias(
        &mut self,
        address: BiasAddress,
        bias_type: BiasType,
        coarse: CoarseRange,
        fine: f64,
    ) -> Result<f64, Error> {
        self.check_open()?;
        let fine = biasgen::validate_fine(fine)?;
        self.transport.send_command(Command::SetBias {
            address,
            bias_type,
            coarse,
            fine,
        })?;
        let current = biasgen::current_of(coarse, fine);
        tracing::debug!(
            "set bias {:?} to {:e} A (coarse {:?}, fine {})",
            address,
            current,
            coarse,
            fine
        );
        Ok(current)
    }

    /// Routes the chip's monitor and input multiplexers.
    pub fn select_outputs(
        &mut self,
        current_output: CurrentOutputSelect,
        voltage_output: VoltageOutputSelect,
        voltage_input: VoltageInputSelect,
        synapse: SynapseSelect,
        flags: u16,
    ) -> Result<(), Error> {
        self.check_open()?;
        self.transport.send_command(Command::SelectOutputs {
            current_output,
            voltage_output,
            voltage_input,
            synapse,
            flags,
        })
    }

    /// Drives a DAC channel and returns the quantized voltage actually set.
    pub fn set_voltage(&mut self, channel: DacChannel, volts: f64) -> Result<f64, Error> {
        self.check_open()?;
        self.transport.set_voltage(channel, volts)
    }

    /// Samples an ADC channel.
    pub fn read_voltage(&mut self, channel: AdcChannel) -> Result<f64, Error> {
        self.check_open()?;
        self.transport.read_voltage(channel)
    }

    /// Captures output events for `window`.
    ///
    /// Two-phase polling protocol: the board is asked to buffer events for
    /// the window, the calling thread blocks for the window plus
    /// [`EVENT_READ_MARGIN`], and the buffered batch is drained. No
    /// background threads are involved and the call cannot be cancelled
    /// mid-window.
    pub fn capture_events(&mut self, window: std::time::Duration) -> Result<Vec<RawEvent>, Error> {
        self.check_open()?;
        self.transport.request_event_window(window)?;
        std::thread::sleep(window + EVENT_READ_MARGIN);
        let events = self.transport.read_raw_events()?;
        tracing::debug!("captured {} events over {:?}", events.len(), window);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[test]
    fn set_bias_issues_exactly_one_command_and_reports_the_current() {
        let mut device = Device::new(MockTransport::new());
        let current = device
            .set_bias(
                BiasAddress::NdpVbN,
                BiasType::N,
                CoarseRange::I30nA,
                30.0,
            )
            .unwrap();
        assert_eq!(current, 30e-9 * 30.0 / 255.0);
        assert_eq!(
            device.transport_mut().commands,
            vec![Command::SetBias {
                address: BiasAddress::NdpVbN,
                bias_type: BiasType::N,
                coarse: CoarseRange::I30nA,
                fine: 30,
            }]
        );
    }

    #[test]
    fn set_bias_rejects_out_of_domain_fine_values_without_side_effects() {
        let mut device = Device::new(MockTransport::new());
        assert_eq!(
            device.set_bias(
                BiasAddress::NdpVbN,
                BiasType::N,
                CoarseRange::I30nA,
                256.0
            ),
            Err(Error::FineValueOutOfRange { value: 256.0 })
        );
        assert_eq!(
            device.set_bias(BiasAddress::NdpVbN, BiasType::N, CoarseRange::I30nA, -1.0),
            Err(Error::FineValueOutOfRange { value: -1.0 })
        );
        assert!(device.transport_mut().commands.is_empty());
    }

    #[test]
    fn set_bias_accepts_domain_boundaries() {
        let mut device = Device::new(MockTransport::new());
        assert_eq!(
            device.set_bias(BiasAddress::DvsPrP, BiasType::P, CoarseRange::I60pA, 0.0),
            Ok(0.0)
        );
        assert_eq!(
            device.set_bias(BiasAddress::DvsPrP, BiasType::P, CoarseRange::I60pA, 255.0),
            Ok(60e-12 * 255.0 / 255.0)
        );
    }

    #[test]
    fn set_bias_truncates_fractional_fine_values() {
        let mut device = Device::new(MockTransport::new());
        device
            .set_bias(BiasAddress::DvsSfP, BiasType::P, CoarseRange::I60pA, 10.7)
            .unwrap();
        assert_eq!(
            device.transport_mut().commands,
            vec![Command::SetBias {
                address: BiasAddress::DvsSfP,
                bias_type: BiasType::P,
                coarse: CoarseRange::I60pA,
                fine: 10,
            }]
        );
    }

    #[test]
    fn closed_session_is_reported_not_silently_ignored() {
        let mut device = Device::new(MockTransport::closed());
        assert_eq!(
            device.set_bias(BiasAddress::NdpVbN, BiasType::N, CoarseRange::I30nA, 30.0),
            Err(Error::NotConnected)
        );
        assert_eq!(
            device.capture_events(std::time::Duration::from_millis(1)),
            Err(Error::NotConnected)
        );
        assert_eq!(
            device.set_voltage(DacChannel::Ain5, 0.6),
            Err(Error::NotConnected)
        );
    }

    #[test]
    fn capture_requests_a_window_then_drains_the_batch() {
        let mut transport = MockTransport::new();
        transport.events = vec![
            RawEvent { t: 1024, address: 5 },
            RawEvent { t: 2048, address: 6 },
        ];
        let mut device = Device::new(transport);
        let window = std::time::Duration::from_millis(2);
        let events = device.capture_events(window).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(device.transport_mut().windows, vec![window]);
    }
}
