use crate::biasgen::{Bias, BiasAddress, BiasType, CoarseRange};
use crate::device::Device;
use crate::presets::c2f;
use crate::transport::{
    CurrentOutputSelect, DacChannel, SynapseSelect, Transport, VoltageInputSelect,
    VoltageOutputSelect,
};
use crate::Error;

/// Operating point of the n-type five-transistor transconductance amplifier.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    pub bias: Bias,
    /// Non-inverting input voltage, in volts.
    pub v1: f64,
    /// Inverting input voltage, in volts.
    pub v2: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            bias: Bias::new(CoarseRange::I30nA, 30),
            v1: 0.8,
            v2: 0.8,
        }
    }
}

/// Returns the programmed tail bias current in amps.
///
/// The amplifier's open output is observed through the rail-to-rail voltage
/// buffer, which is biased fully on here.
pub fn apply<T: Transport>(
    device: &mut Device<T>,
    configuration: &Configuration,
) -> Result<f64, Error> {
    c2f::apply(device, &c2f::Configuration::default())?;
    device.set_bias(BiasAddress::RrBiasP, BiasType::P, CoarseRange::I240nA, 255.0)?;
    device.select_outputs(
        CurrentOutputSelect::Line5,
        VoltageOutputSelect::Line1,
        VoltageInputSelect::Line2,
        SynapseSelect::None,
        0,
    )?;
    let current = device.set_bias(
        BiasAddress::NtaVbN,
        BiasType::N,
        configuration.bias.coarse,
        f64::from(configuration.bias.fine),
    )?;
    device.set_voltage(DacChannel::Ain3, configuration.v1)?;
    device.set_voltage(DacChannel::Ain4, configuration.v2)?;
    Ok(current)
}
