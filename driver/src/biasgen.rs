use crate::Error;

/// Master current magnitudes of the on-chip bias generator.
///
/// The generator quantizes every bias into one of five coarse ranges; the
/// fine value then scales linearly within the selected range.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CoarseRange {
    I60pA,
    I460pA,
    I3_8nA,
    I30nA,
    I240nA,
}

impl CoarseRange {
    /// Full-scale current of this range in amps.
    pub fn amps(self) -> f64 {
        match self {
            CoarseRange::I60pA => 60e-12,
            CoarseRange::I460pA => 460e-12,
            CoarseRange::I3_8nA => 3.8e-9,
            CoarseRange::I30nA => 30e-9,
            CoarseRange::I240nA => 240e-9,
        }
    }
}

/// Polarity of the biased device (n-type or p-type).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BiasType {
    N,
    P,
}

/// A (coarse range, fine value) pair, the programmable half of a bias.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Bias {
    pub coarse: CoarseRange,
    pub fine: u8,
}

impl Bias {
    pub fn new(coarse: CoarseRange, fine: u8) -> Self {
        Self { coarse, fine }
    }

    /// The physical current this pair programs.
    pub fn amps(self) -> f64 {
        current_of(self.coarse, self.fine)
    }
}

/// Intended physical current for a (coarse range, fine value) pair.
///
/// This is the single source of truth for current quantization: the bias
/// generator produces `coarse × fine / 255` amps. The returned value is the
/// programmed current, not a measurement.
pub fn current_of(coarse: CoarseRange, fine: u8) -> f64 {
    coarse.amps() * f64::from(fine) / 255.0
}

/// Checks a caller-supplied fine value against the [0, 255] hardware domain.
///
/// Fractional inputs are truncated toward zero with a warning, matching the
/// DAC's behaviour. Zero is accepted but warned about since the resulting
/// current is only nominally zero.
pub(crate) fn validate_fine(fine: f64) -> Result<u8, Error> {
    if !(0.0..=255.0).contains(&fine) {
        return Err(Error::FineValueOutOfRange { value: fine });
    }
    if fine.fract() != 0.0 {
        tracing::warn!(
            "fine value {} truncated to {}",
            fine,
            fine.trunc() as u8
        );
    }
    let fine = fine as u8;
    if fine == 0 {
        tracing::warn!("fine value 0 programs an ill-defined near-zero current");
    }
    Ok(fine)
}

/// Destination analog parameters of the bias generator, one per programmable
/// bias of the chip (chip report, section 6.3, table 7).
///
/// Circuit prefixes: AHN axon-hillock neuron, ACN adaptive exponential
/// neuron, ATN thresholded neuron, ASN sigma-delta neuron, HHN
/// Hodgkin-Huxley neuron, DPI/DDI/LDS/PEX synapses, DVS event pixel, C2F
/// current-to-frequency converters, NDP/PDP differential pairs, NTA/PTA/WRT
/// transconductance amplifiers, BAB bump-antibump, FOI/FOD follower
/// integrator/differentiator, WTA winner-take-all, SOS second-order section,
/// NSF/PSF/SFP source followers, CSR current-splitter reference, RR
/// rail-to-rail output buffer.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BiasAddress {
    Buffer,
    AhnVpwN,
    AcnVadpptauN,
    AcnVadpweightN,
    AcnVadpgainN,
    AcnVadptauP,
    AcnVadpcascN,
    AcnVrefrN,
    AcnVleakN,
    AcnVgainN,
    AcnVdcP,
    LdsVtauP,
    LdsVweightP,
    AtnVadpptauN,
    AtnVadpweightN,
    AtnVadpgainN,
    AtnVadptauP,
    AtnVadpcascN,
    AtnVrefrN,
    AtnVccN,
    AtnVspkthrP,
    AtnVleakN,
    AtnVgainN,
    AtnVdcP,
    DpiVtauP,
    DpiVweightN,
    DpiVthrN,
    PexVtauN,
    AsnVadpptauN,
    AsnVadpweightN,
    AsnVadpgainN,
    AsnVadptauP,
    AsnVadpcascN,
    AsnVccN,
    AsnVspkthrP,
    AsnVleakN,
    AsnVgainN,
    AsnVdcP,
    DdiVweightN,
    DdiVthrN,
    DdiVtauP,
    HhnVbufN,
    HhnVahpsatN,
    HhnVcarest2N,
    HhnVcabufN,
    HhnVcarestN,
    HhnVcainP,
    HhnVkdsatN,
    HhnVpuwidthN,
    HhnVkdtauN,
    HhnVthresN,
    HhnVnasatN,
    HhnVdcP,
    HhnVeleakN,
    HhnVnatauN,
    HhnVgleakN,
    HhnVpadbiasN,
    HhnVputhresN,
    SfpVbN,
    DvsRefrP,
    DvsOffN,
    DvsOnN,
    DvsDiffN,
    DvsSfP,
    DvsCasN,
    DvsPrP,
    RrBiasP,
    C2fHysP,
    C2fRefL,
    C2fRefH,
    C2fBiasP,
    C2fPwlkP,
    NtaVbN,
    CsrVtN,
    BabVbN,
    FodVbN,
    FoiVbN,
    NdpVbN,
    NsfVbN,
    SosVb2N,
    PdpVbP,
    PsfVbP,
    PtaVbP,
    SosVb1N,
    SreVb1N,
    SreVb2N,
    WrtVbN,
    WtaVbN,
    WtaVexN,
    WtaVinhN,
    WtaVgainP,
}
