use crate::biasgen::{BiasAddress, BiasType, CoarseRange};
use crate::device::Device;
use crate::transport::Transport;
use crate::Error;

/// Degree of the frequency → current polynomial. Two is enough to absorb the
/// C2F converters' mild nonlinearity without overfitting a short sweep.
pub const DEGREE: usize = 2;

/// Least-squares polynomial mapping a C2F output frequency to the current
/// that produced it.
///
/// Produced once per calibration run and immutable afterwards; coefficients
/// are stored highest power first.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationModel {
    degree: usize,
    coefficients: Vec<f64>,
}

impl CalibrationModel {
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fitted coefficients, highest power first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluates the model at `frequency` (Hz) and returns a current in
    /// amps.
    pub fn frequency_to_current(&self, frequency: f64) -> f64 {
        self.coefficients
            .iter()
            .fold(0.0, |accumulator, coefficient| {
                accumulator * frequency + coefficient
            })
    }
}

/// Fits a least-squares polynomial of the given degree to (frequency,
/// current) samples.
///
/// The fit is underdetermined, and fails with
/// [`Error::InsufficientSamples`], when fewer than `degree + 1` distinct
/// sample pairs were collected. Fitting is deterministic: identical samples
/// give identical coefficients.
pub fn fit(samples: &[(f64, f64)], degree: usize) -> Result<CalibrationModel, Error> {
    let required = degree + 1;
    let mut distinct = samples.to_vec();
    distinct.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    distinct.dedup();
    if distinct.len() < required {
        return Err(Error::InsufficientSamples {
            distinct: distinct.len(),
            degree,
            required,
        });
    }
    let vandermonde = nalgebra::DMatrix::from_fn(samples.len(), required, |row, column| {
        samples[row].0.powi((degree - column) as i32)
    });
    let currents =
        nalgebra::DVector::from_iterator(samples.len(), samples.iter().map(|sample| sample.1));
    let solution = vandermonde
        .svd(true, true)
        .solve(&currents, f64::EPSILON)
        .expect("svd was computed with both u and v_t");
    Ok(CalibrationModel {
        degree,
        coefficients: solution.iter().copied().collect(),
    })
}

/// Sweeps a bias through the given fine values and fits a frequency →
/// current model from the resulting C2F measurements.
///
/// For each fine value (ascending, fixed step) the bias is programmed, the
/// thread blocks for `settle`, and `measure` is invoked to observe a
/// frequency in Hz for the known programmed current. The device is left in
/// the state of the last sweep step; callers re-apply their operating preset
/// afterwards.
pub fn calibrate<T, F>(
    device: &mut Device<T>,
    address: BiasAddress,
    bias_type: BiasType,
    coarse: CoarseRange,
    sweep: &[u8],
    settle: std::time::Duration,
    mut measure: F,
) -> Result<CalibrationModel, Error>
where
    T: Transport,
    F: FnMut(&mut Device<T>) -> Result<f64, Error>,
{
    let mut samples = Vec::with_capacity(sweep.len());
    for &fine in sweep {
        let current = device.set_bias(address, bias_type, coarse, f64::from(fine))?;
        std::thread::sleep(settle);
        let frequency = measure(device)?;
        samples.push((frequency, current));
    }
    fit(&samples, DEGREE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biasgen;
    use crate::testing::MockTransport;
    use crate::transport::Command;

    fn assert_close(left: f64, right: f64, tolerance: f64) {
        assert!(
            (left - right).abs() <= tolerance,
            "{} and {} differ by more than {}",
            left,
            right,
            tolerance
        );
    }

    #[test]
    fn fit_recovers_known_polynomial_coefficients() {
        // i = 2e-15 f² + 1e-12 f + 5e-10
        let samples: Vec<(f64, f64)> = (0..=10)
            .map(|index| {
                let frequency = 100.0 * f64::from(index);
                (
                    frequency,
                    2e-15 * frequency * frequency + 1e-12 * frequency + 5e-10,
                )
            })
            .collect();
        let model = fit(&samples, DEGREE).unwrap();
        assert_eq!(model.degree(), 2);
        assert_close(model.coefficients()[0], 2e-15, 1e-17);
        assert_close(model.coefficients()[1], 1e-12, 1e-14);
        assert_close(model.coefficients()[2], 5e-10, 1e-12);
        assert_close(model.frequency_to_current(550.0), 1.655e-9, 1e-12);
    }

    #[test]
    fn fitting_twice_on_identical_samples_is_identical() {
        let samples: Vec<(f64, f64)> = (0..20)
            .map(|index| {
                let frequency = 50.0 * f64::from(index);
                (frequency, 3e-13 * frequency + 1e-11)
            })
            .collect();
        let first = fit(&samples, DEGREE).unwrap();
        let second = fit(&samples, DEGREE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn underdetermined_sweep_is_rejected() {
        let samples = vec![(100.0, 1e-10), (100.0, 1e-10), (100.0, 1e-10)];
        assert_eq!(
            fit(&samples, DEGREE),
            Err(Error::InsufficientSamples {
                distinct: 1,
                degree: 2,
                required: 3,
            })
        );
    }

    #[test]
    fn sweep_programs_each_fine_value_and_models_the_response() {
        let mut device = Device::new(MockTransport::new());
        let sweep: Vec<u8> = (1..255).step_by(5).collect();
        // Pretend the C2F output is a clean 1 Hz per pA.
        let model = calibrate(
            &mut device,
            BiasAddress::NdpVbN,
            BiasType::N,
            CoarseRange::I30nA,
            &sweep,
            std::time::Duration::ZERO,
            |device| {
                let current = match device.transport_mut().commands.last() {
                    Some(Command::SetBias { coarse, fine, .. }) => {
                        biasgen::current_of(*coarse, *fine)
                    }
                    _ => 0.0,
                };
                Ok(current * 1e12)
            },
        )
        .unwrap();
        assert_eq!(device.transport_mut().commands.len(), sweep.len());
        let frequency = 10.0e-9 * 1e12;
        assert_close(model.frequency_to_current(frequency), 10.0e-9, 1e-11);
    }

    #[test]
    fn a_failing_measurement_aborts_the_sweep() {
        let mut device = Device::new(MockTransport::new());
        let result = calibrate(
            &mut device,
            BiasAddress::NdpVbN,
            BiasType::N,
            CoarseRange::I30nA,
            &[1, 6, 11],
            std::time::Duration::ZERO,
            |_| Err(Error::NotConnected),
        );
        assert_eq!(result, Err(Error::NotConnected));
        assert_eq!(device.transport_mut().commands.len(), 1);
    }
}
