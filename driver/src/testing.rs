use crate::transport::{AdcChannel, Command, DacChannel, Transport};
use crate::Error;
use coach_types::RawEvent;

/// Records every transport interaction instead of talking to hardware.
pub(crate) struct MockTransport {
    pub open: bool,
    pub commands: Vec<Command>,
    pub windows: Vec<std::time::Duration>,
    pub voltages: Vec<(DacChannel, f64)>,
    /// Batch handed back by the next `read_raw_events` call.
    pub events: Vec<RawEvent>,
    /// Voltage handed back by `read_voltage`.
    pub adc_value: f64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            open: true,
            commands: Vec::new(),
            windows: Vec::new(),
            voltages: Vec::new(),
            events: Vec::new(),
            adc_value: 0.0,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            ..Self::new()
        }
    }
}

impl Transport for MockTransport {
    fn is_open(&self) -> bool {
        self.open
    }

    fn send_command(&mut self, command: Command) -> Result<(), Error> {
        self.commands.push(command);
        Ok(())
    }

    fn request_event_window(&mut self, window: std::time::Duration) -> Result<(), Error> {
        self.windows.push(window);
        Ok(())
    }

    fn read_raw_events(&mut self) -> Result<Vec<RawEvent>, Error> {
        Ok(std::mem::take(&mut self.events))
    }

    fn set_voltage(&mut self, channel: DacChannel, volts: f64) -> Result<f64, Error> {
        self.voltages.push((channel, volts));
        Ok(volts)
    }

    fn read_voltage(&mut self, _channel: AdcChannel) -> Result<f64, Error> {
        Ok(self.adc_value)
    }
}
