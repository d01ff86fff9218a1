use crate::biasgen::{Bias, BiasAddress, BiasType, CoarseRange};
use crate::device::Device;
use crate::presets::c2f;
use crate::transport::{
    CurrentOutputSelect, DacChannel, SynapseSelect, Transport, VoltageInputSelect,
    VoltageOutputSelect,
};
use crate::Error;

/// Operating point of the n-type differential pair.
///
/// The pair's branch currents are read through the C2F converters, so the
/// C2F preset is applied first. The calibration sweep uses this circuit as
/// its known current source.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    pub bias: Bias,
    /// Gate voltage of the first branch, in volts.
    pub v1: f64,
    /// Gate voltage of the second branch, in volts.
    pub v2: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            bias: Bias::new(CoarseRange::I30nA, 30),
            v1: 0.6,
            v2: 0.2,
        }
    }
}

/// Returns the programmed tail bias current in amps.
pub fn apply<T: Transport>(
    device: &mut Device<T>,
    configuration: &Configuration,
) -> Result<f64, Error> {
    c2f::apply(device, &c2f::Configuration::default())?;
    device.select_outputs(
        CurrentOutputSelect::Line5,
        VoltageOutputSelect::None,
        VoltageInputSelect::Line2,
        SynapseSelect::None,
        0,
    )?;
    let current = device.set_bias(
        BiasAddress::NdpVbN,
        BiasType::N,
        configuration.bias.coarse,
        f64::from(configuration.bias.fine),
    )?;
    device.set_voltage(DacChannel::Ain5, configuration.v1)?;
    device.set_voltage(DacChannel::Ain6, configuration.v2)?;
    Ok(current)
}
