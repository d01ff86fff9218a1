use crate::biasgen::{Bias, BiasAddress, BiasType, CoarseRange};
use crate::device::Device;
use crate::transport::Transport;
use crate::Error;

/// Operating point of the sixteen current-to-frequency converters.
///
/// The C2F biases must be programmed before any current measurement through
/// the frequency outputs makes sense; the other presets that read currents
/// apply this one first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    pub hysteresis: Bias,
    pub bias: Bias,
    pub pulse_width_leak: Bias,
    pub reference_low: Bias,
    pub reference_high: Bias,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            hysteresis: Bias::new(CoarseRange::I60pA, 100),
            bias: Bias::new(CoarseRange::I240nA, 255),
            pulse_width_leak: Bias::new(CoarseRange::I240nA, 255),
            reference_low: Bias::new(CoarseRange::I30nA, 255),
            reference_high: Bias::new(CoarseRange::I30nA, 255),
        }
    }
}

pub fn apply<T: Transport>(
    device: &mut Device<T>,
    configuration: &Configuration,
) -> Result<(), Error> {
    device.set_bias(
        BiasAddress::C2fHysP,
        BiasType::P,
        configuration.hysteresis.coarse,
        f64::from(configuration.hysteresis.fine),
    )?;
    device.set_bias(
        BiasAddress::C2fBiasP,
        BiasType::P,
        configuration.bias.coarse,
        f64::from(configuration.bias.fine),
    )?;
    device.set_bias(
        BiasAddress::C2fPwlkP,
        BiasType::P,
        configuration.pulse_width_leak.coarse,
        f64::from(configuration.pulse_width_leak.fine),
    )?;
    device.set_bias(
        BiasAddress::C2fRefL,
        BiasType::N,
        configuration.reference_low.coarse,
        f64::from(configuration.reference_low.fine),
    )?;
    device.set_bias(
        BiasAddress::C2fRefH,
        BiasType::P,
        configuration.reference_high.coarse,
        f64::from(configuration.reference_high.fine),
    )?;
    Ok(())
}
