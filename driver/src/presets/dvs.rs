use crate::biasgen::{Bias, BiasAddress, BiasType, CoarseRange};
use crate::device::Device;
use crate::thresholds;
use crate::transport::{
    CurrentOutputSelect, SynapseSelect, Transport, VoltageInputSelect, VoltageOutputSelect,
};
use crate::Error;

/// Biases that quiet every AER event source on the chip (synapses, neurons,
/// DVS pixel) so that only deliberately enabled circuits drive the output
/// bus. The adaptive neuron's refractory bias is driven to maximum instead of
/// zero to hold it off.
const AER_QUIESCE: &[(BiasAddress, BiasType, CoarseRange, u8)] = &[
    (BiasAddress::LdsVtauP, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DpiVtauP, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DdiVtauP, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::AhnVpwN, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::AtnVleakN, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::AtnVdcP, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::AtnVgainN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::AtnVspkthrP, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::AsnVleakN, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::AsnVdcP, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::AsnVgainN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::AcnVleakN, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::AcnVgainN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::AcnVdcP, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::AcnVrefrN, BiasType::N, CoarseRange::I240nA, 255),
    (BiasAddress::HhnVbufN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::HhnVcabufN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::HhnVdcP, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::HhnVeleakN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DvsDiffN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DvsCasN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DvsOnN, BiasType::P, CoarseRange::I60pA, 0),
    (BiasAddress::DvsOffN, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DvsSfP, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DvsPrP, BiasType::N, CoarseRange::I60pA, 0),
    (BiasAddress::DvsRefrP, BiasType::N, CoarseRange::I60pA, 0),
];

/// Operating point of the DVS event pixel.
///
/// The change-detector fine value doubles as the base of the threshold
/// triple; `on_off_ratio` sets the designed Ion/Idiff and Idiff/Ioff ratios.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    pub photoreceptor: Bias,
    pub source_follower: Bias,
    pub cascode: Bias,
    pub change_detector: Bias,
    pub refractory: Bias,
    pub on_off_ratio: f64,
    /// How long to block after programming, since the pixel is brought up
    /// from a fully disabled state.
    pub settle: std::time::Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            photoreceptor: Bias::new(CoarseRange::I3_8nA, 200),
            source_follower: Bias::new(CoarseRange::I60pA, 64),
            cascode: Bias::new(CoarseRange::I240nA, 25),
            change_detector: Bias::new(CoarseRange::I30nA, thresholds::NOMINAL_DIFF_FINE),
            refractory: Bias::new(CoarseRange::I60pA, 255),
            on_off_ratio: 2.0,
            settle: std::time::Duration::from_secs(5),
        }
    }
}

/// Programmed currents of the pixel, in amps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currents {
    pub photoreceptor: f64,
    pub source_follower: f64,
    pub cascode: f64,
    pub diff: f64,
    pub on: f64,
    pub off: f64,
    pub refractory: f64,
}

/// Brings up the DVS pixel from a quiet chip.
///
/// Quiets all AER sources, programs the pixel biases and the threshold
/// triple, routes the event monitor, then blocks for the configured settle
/// time. Short-circuits on the first failing call without rolling back
/// already-programmed biases.
pub fn apply<T: Transport>(
    device: &mut Device<T>,
    configuration: &Configuration,
) -> Result<Currents, Error> {
    quiesce_aer_sources(device)?;
    // drive the bias buffer hard so bias changes settle quickly
    device.set_bias(BiasAddress::Buffer, BiasType::N, CoarseRange::I240nA, 255.0)?;
    let photoreceptor = device.set_bias(
        BiasAddress::DvsPrP,
        BiasType::P,
        configuration.photoreceptor.coarse,
        f64::from(configuration.photoreceptor.fine),
    )?;
    let source_follower = device.set_bias(
        BiasAddress::DvsSfP,
        BiasType::P,
        configuration.source_follower.coarse,
        f64::from(configuration.source_follower.fine),
    )?;
    let cascode = device.set_bias(
        BiasAddress::DvsCasN,
        BiasType::N,
        configuration.cascode.coarse,
        f64::from(configuration.cascode.fine),
    )?;
    let (diff, on, off) = apply_thresholds(device, configuration)?;
    let refractory = device.set_bias(
        BiasAddress::DvsRefrP,
        BiasType::P,
        configuration.refractory.coarse,
        f64::from(configuration.refractory.fine),
    )?;
    device.select_outputs(
        CurrentOutputSelect::Line6,
        VoltageOutputSelect::Line2,
        VoltageInputSelect::None,
        SynapseSelect::None,
        0,
    )?;
    tracing::debug!(
        "DVS pixel up, settling for {:?} (on/diff {:.1}, diff/off {:.1})",
        configuration.settle,
        on / diff,
        diff / off
    );
    std::thread::sleep(configuration.settle);
    Ok(Currents {
        photoreceptor,
        source_follower,
        cascode,
        diff,
        on,
        off,
        refractory,
    })
}

/// Reprograms only the change-detector threshold pair, leaving the rest of
/// the pixel untouched. Used to walk the sensitivity during an experiment.
pub fn apply_thresholds<T: Transport>(
    device: &mut Device<T>,
    configuration: &Configuration,
) -> Result<(f64, f64, f64), Error> {
    let triple = thresholds::solve(
        configuration.change_detector.fine,
        configuration.on_off_ratio,
    )?;
    let coarse = configuration.change_detector.coarse;
    let diff = device.set_bias(
        BiasAddress::DvsDiffN,
        BiasType::P,
        coarse,
        f64::from(triple.diff),
    )?;
    let on = device.set_bias(
        BiasAddress::DvsOnN,
        BiasType::P,
        coarse,
        f64::from(triple.on),
    )?;
    let off = device.set_bias(
        BiasAddress::DvsOffN,
        BiasType::P,
        coarse,
        f64::from(triple.off),
    )?;
    Ok((diff, on, off))
}

fn quiesce_aer_sources<T: Transport>(device: &mut Device<T>) -> Result<(), Error> {
    for &(address, bias_type, coarse, fine) in AER_QUIESCE {
        device.set_bias(address, bias_type, coarse, f64::from(fine))?;
    }
    Ok(())
}
