//! Detector-frame posterior samples to source-frame quantities.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{invert_redshift, DistanceModel};
use crate::error::{InputError, RedshiftError};
use crate::types::SampleSet;

/// What to do when the redshift of one sample cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Fail the whole conversion at the first bad sample.
    #[default]
    Abort,
    /// Drop the bad sample and record its index.
    Skip,
}

/// Spin magnitudes and tilt cosines per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinSamples {
    pub spin1: Vec<f64>,
    pub spin2: Vec<f64>,
    pub cos_tilt1: Vec<f64>,
    pub cos_tilt2: Vec<f64>,
}

/// Right ascension and declination per sample, in radians.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
}

/// Posterior samples of one event as measured at the detector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorFrameSamples {
    /// Luminosity distance in Mpc.
    pub luminosity_distance: Vec<f64>,
    /// Detector-frame primary mass.
    pub m1_detector: Vec<f64>,
    /// Detector-frame secondary mass.
    pub m2_detector: Vec<f64>,
    /// Optional spins for the effective spin.
    pub spins: Option<SpinSamples>,
    /// Optional sky position, carried through unchanged.
    pub sky: Option<SkyPosition>,
}

impl DetectorFrameSamples {
    fn validate(&self) -> Result<usize, RedshiftError> {
        let n = self.luminosity_distance.len();
        let mut columns: Vec<(&'static str, usize)> = vec![
            ("m1_detector", self.m1_detector.len()),
            ("m2_detector", self.m2_detector.len()),
        ];
        if let Some(s) = &self.spins {
            columns.extend([
                ("spin1", s.spin1.len()),
                ("spin2", s.spin2.len()),
                ("cos_tilt1", s.cos_tilt1.len()),
                ("cos_tilt2", s.cos_tilt2.len()),
            ]);
        }
        if let Some(sky) = &self.sky {
            columns.extend([("ra", sky.ra.len()), ("dec", sky.dec.len())]);
        }
        for (column, found) in columns {
            if found != n {
                return Err(RedshiftError::ColumnLength {
                    column,
                    expected: n,
                    found,
                });
            }
        }
        Ok(n)
    }
}

/// Source-frame quantity selectable as a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Redshift,
    M1,
    M2,
    ChirpMass,
    ChiEff,
    LuminosityDistance,
    RightAscension,
    Declination,
}

/// Source-frame quantities for the samples whose redshift was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFrameSamples {
    pub redshift: Vec<f64>,
    pub m1: Vec<f64>,
    pub m2: Vec<f64>,
    pub chirp_mass: Vec<f64>,
    pub chi_eff: Option<Vec<f64>>,
    pub luminosity_distance: Vec<f64>,
    pub sky: Option<SkyPosition>,
    /// Input indices dropped under [`FailurePolicy::Skip`].
    pub skipped: Vec<usize>,
}

impl SourceFrameSamples {
    /// Number of converted samples.
    pub fn len(&self) -> usize {
        self.redshift.len()
    }

    /// Whether no sample was converted.
    pub fn is_empty(&self) -> bool {
        self.redshift.is_empty()
    }

    /// Stack the requested columns into a sample set, in the order given.
    pub fn select(&self, parameters: &[Parameter]) -> Result<SampleSet, InputError> {
        let columns = parameters
            .iter()
            .map(|p| self.column(*p))
            .collect::<Result<Vec<_>, _>>()?;
        let dim = columns.len();
        let mut data = Vec::with_capacity(dim * self.len());
        for i in 0..self.len() {
            data.extend(columns.iter().map(|c| c[i]));
        }
        SampleSet::new(data, dim)
    }

    fn column(&self, parameter: Parameter) -> Result<&[f64], InputError> {
        Ok(match parameter {
            Parameter::Redshift => self.redshift.as_slice(),
            Parameter::M1 => self.m1.as_slice(),
            Parameter::M2 => self.m2.as_slice(),
            Parameter::ChirpMass => self.chirp_mass.as_slice(),
            Parameter::LuminosityDistance => self.luminosity_distance.as_slice(),
            Parameter::ChiEff => self
                .chi_eff
                .as_deref()
                .ok_or(InputError::MissingColumn("chi_eff"))?,
            Parameter::RightAscension => self
                .sky
                .as_ref()
                .map(|s| s.ra.as_slice())
                .ok_or(InputError::MissingColumn("ra"))?,
            Parameter::Declination => self
                .sky
                .as_ref()
                .map(|s| s.dec.as_slice())
                .ok_or(InputError::MissingColumn("dec"))?,
        })
    }
}

/// Chirp mass `(m1 m2)^{3/5} / (m1 + m2)^{1/5}`.
pub fn chirp_mass(m1: f64, m2: f64) -> f64 {
    (m1 * m2).powf(0.6) / (m1 + m2).powf(0.2)
}

/// Effective spin `(s1 cos θ1 + q s2 cos θ2) / (1 + q)` with `q = m2 / m1`.
pub fn chi_effective(m1: f64, m2: f64, s1: f64, s2: f64, cos1: f64, cos2: f64) -> f64 {
    let q = m2 / m1;
    (s1 * cos1 + q * s2 * cos2) / (1.0 + q)
}

/// Convert detector-frame samples with `m_source = m_detector / (1 + z)`.
///
/// Each redshift is inverted independently. Under [`FailurePolicy::Abort`]
/// the first failure is returned with its sample index; under
/// [`FailurePolicy::Skip`] failed samples are dropped and listed in
/// [`SourceFrameSamples::skipped`].
pub fn to_source_frame<M>(
    samples: &DetectorFrameSamples,
    model: &M,
    policy: FailurePolicy,
) -> Result<SourceFrameSamples, RedshiftError>
where
    M: DistanceModel + Sync + ?Sized,
{
    let n = samples.validate()?;

    let redshifts: Vec<Result<f64, RedshiftError>> = crate::thread_pool::install(|| {
        #[cfg(feature = "parallel")]
        let distances = samples.luminosity_distance.par_iter();
        #[cfg(not(feature = "parallel"))]
        let distances = samples.luminosity_distance.iter();
        distances.map(|&dl| invert_redshift(model, dl)).collect()
    });

    let mut out = SourceFrameSamples {
        chi_eff: samples.spins.as_ref().map(|_| Vec::with_capacity(n)),
        sky: samples.sky.as_ref().map(|_| SkyPosition {
            ra: Vec::with_capacity(n),
            dec: Vec::with_capacity(n),
        }),
        ..SourceFrameSamples::default()
    };

    for (i, result) in redshifts.into_iter().enumerate() {
        let z = match (result, policy) {
            (Ok(z), _) => z,
            (Err(e), FailurePolicy::Abort) => {
                return Err(RedshiftError::AtSample {
                    index: i,
                    source: Box::new(e),
                })
            }
            (Err(e), FailurePolicy::Skip) => {
                warn!(index = i, error = %e, "skipping sample without redshift");
                out.skipped.push(i);
                continue;
            }
        };

        let m1 = samples.m1_detector[i] / (1.0 + z);
        let m2 = samples.m2_detector[i] / (1.0 + z);
        out.redshift.push(z);
        out.m1.push(m1);
        out.m2.push(m2);
        out.chirp_mass.push(chirp_mass(m1, m2));
        out.luminosity_distance.push(samples.luminosity_distance[i]);
        if let (Some(spins), Some(chi)) = (&samples.spins, out.chi_eff.as_mut()) {
            chi.push(chi_effective(
                m1,
                m2,
                spins.spin1[i],
                spins.spin2[i],
                spins.cos_tilt1[i],
                spins.cos_tilt2[i],
            ));
        }
        if let (Some(sky), Some(out_sky)) = (&samples.sky, out.sky.as_mut()) {
            out_sky.ra.push(sky.ra[i]);
            out_sky.dec.push(sky.dec[i]);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmology::Cosmology;

    fn event() -> (Cosmology, DetectorFrameSamples) {
        let c = Cosmology::default();
        let samples = DetectorFrameSamples {
            luminosity_distance: vec![
                c.luminosity_distance(0.1),
                c.luminosity_distance(0.5),
                c.luminosity_distance(1.0),
            ],
            m1_detector: vec![33.0, 45.0, 60.0],
            m2_detector: vec![22.0, 30.0, 40.0],
            spins: None,
            sky: None,
        };
        (c, samples)
    }

    #[test]
    fn test_source_masses() {
        let (c, s) = event();
        let out = to_source_frame(&s, &c, FailurePolicy::Abort).unwrap();
        assert_eq!(out.len(), 3);
        assert!((out.redshift[2] - 1.0).abs() < 1e-8);
        assert!((out.m1[0] - 30.0).abs() < 1e-6);
        assert!((out.m2[1] - 20.0).abs() < 1e-6);
        assert!((out.m1[2] - 30.0).abs() < 1e-6);
        assert!((out.chirp_mass[0] - chirp_mass(30.0, 20.0)).abs() < 1e-6);
        assert!(out.chi_eff.is_none());
    }

    #[test]
    fn test_chirp_mass_equal_masses() {
        // Equal masses: mc = m · 2^{-1/5}.
        assert!((chirp_mass(10.0, 10.0) - 10.0 * 2f64.powf(-0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_chi_effective() {
        assert!((chi_effective(10.0, 10.0, 0.5, 0.5, 1.0, 1.0) - 0.5).abs() < 1e-12);
        assert!(chi_effective(10.0, 10.0, 0.5, 0.5, 1.0, -1.0).abs() < 1e-12);
    }

    #[test]
    fn test_policy_abort_and_skip() {
        let (c, mut s) = event();
        s.luminosity_distance[1] = -5.0;

        let err = to_source_frame(&s, &c, FailurePolicy::Abort).unwrap_err();
        assert!(matches!(err, RedshiftError::AtSample { index: 1, .. }));

        let out = to_source_frame(&s, &c, FailurePolicy::Skip).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.skipped, vec![1]);
        assert!((out.redshift[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_spins_and_select() {
        let (c, mut s) = event();
        s.spins = Some(SpinSamples {
            spin1: vec![0.1, 0.2, 0.3],
            spin2: vec![0.0, 0.0, 0.0],
            cos_tilt1: vec![1.0, 1.0, 1.0],
            cos_tilt2: vec![1.0, 1.0, 1.0],
        });
        let out = to_source_frame(&s, &c, FailurePolicy::Abort).unwrap();
        let chi = out.chi_eff.as_ref().unwrap();
        assert!((chi[0] - 0.1 / (1.0 + 2.0 / 3.0)).abs() < 1e-12);

        let set = out.select(&[Parameter::M1, Parameter::ChiEff]).unwrap();
        assert_eq!(set.dim(), 2);
        assert_eq!(set.len(), 3);
        assert_eq!(set.row(2)[1], chi[2]);
    }

    #[test]
    fn test_select_missing_spin() {
        let (c, s) = event();
        let out = to_source_frame(&s, &c, FailurePolicy::Abort).unwrap();
        assert_eq!(
            out.select(&[Parameter::ChiEff]),
            Err(InputError::MissingColumn("chi_eff"))
        );
    }

    #[test]
    fn test_column_length_mismatch() {
        let (c, mut s) = event();
        s.m2_detector.pop();
        assert!(matches!(
            to_source_frame(&s, &c, FailurePolicy::Skip),
            Err(RedshiftError::ColumnLength { column: "m2_detector", .. })
        ));
    }

    #[test]
    fn test_sky_position_follows_kept_samples() {
        let (c, mut s) = event();
        s.luminosity_distance[0] = f64::NAN;
        s.sky = Some(SkyPosition {
            ra: vec![0.5, 1.5, 2.5],
            dec: vec![-0.1, 0.2, -0.3],
        });
        let out = to_source_frame(&s, &c, FailurePolicy::Skip).unwrap();
        assert_eq!(out.skipped, vec![0]);
        let sky = out.sky.as_ref().unwrap();
        assert_eq!(sky.ra, vec![1.5, 2.5]);
        assert_eq!(sky.dec, vec![0.2, -0.3]);

        let set = out
            .select(&[Parameter::RightAscension, Parameter::Declination, Parameter::Redshift])
            .unwrap();
        assert_eq!(set.row(1), &[2.5, -0.3, out.redshift[1]]);
    }

    #[test]
    fn test_sky_position_checks() {
        let (c, mut s) = event();
        let out = to_source_frame(&s, &c, FailurePolicy::Abort).unwrap();
        assert_eq!(
            out.select(&[Parameter::Declination]),
            Err(InputError::MissingColumn("dec"))
        );

        s.sky = Some(SkyPosition {
            ra: vec![0.0; 3],
            dec: vec![0.0; 2],
        });
        assert!(matches!(
            to_source_frame(&s, &c, FailurePolicy::Abort),
            Err(RedshiftError::ColumnLength { column: "dec", expected: 3, found: 2 })
        ));
    }
}
