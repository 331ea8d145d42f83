//! Pairwise transmission and recovery matrices for a village.
//!
//! Entry `[i][j]` of the infection matrix is the probability that agent `j` (the carrier)
//! infects agent `i` (the victim). Off-diagonal entries start at the base transmission rate and
//! are scaled by one multiplier for each covariate that applies:
//!
//! * carrier and victim share a household,
//! * the carrier shows TI,
//! * the carrier has ocular discharge.
//!
//! The infection matrix has a zero diagonal. The recovery matrix carries the base recovery rate
//! on its diagonal and zeros elsewhere. Covariates come from each agent's baseline record.

use serde::{Deserialize, Serialize};

use crate::error::TrachomaError;
use crate::log::debug;
use crate::matrix::DenseMatrix;
use crate::village::{Agent, Village};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransmissionParameters {
    pub base_transmission_rate: f64,
    pub base_recovery_rate: f64,
    /// Applied when carrier and victim share a household.
    pub household_multiplier: f64,
    /// Applied when the carrier shows TI.
    pub ti_multiplier: f64,
    /// Applied when the carrier has ocular discharge.
    pub ocular_multiplier: f64,
}

impl Default for TransmissionParameters {
    fn default() -> Self {
        TransmissionParameters {
            base_transmission_rate: 0.1,
            base_recovery_rate: 0.2,
            household_multiplier: 1.0,
            ti_multiplier: 1.0,
            ocular_multiplier: 1.0,
        }
    }
}

impl TransmissionParameters {
    /// # Errors
    ///
    /// Returns `TrachomaError::InvalidParameter` if any value is negative, infinite or NaN.
    pub fn validate(&self) -> Result<(), TrachomaError> {
        let values = [
            ("base_transmission_rate", self.base_transmission_rate),
            ("base_recovery_rate", self.base_recovery_rate),
            ("household_multiplier", self.household_multiplier),
            ("ti_multiplier", self.ti_multiplier),
            ("ocular_multiplier", self.ocular_multiplier),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(TrachomaError::InvalidParameter(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// The probability that `carrier` infects `victim`.
    #[must_use]
    pub fn transmission_rate(&self, carrier: &Agent, victim: &Agent) -> f64 {
        let mut rate = self.base_transmission_rate;
        if carrier.household == victim.household {
            rate *= self.household_multiplier;
        }
        if carrier.ti {
            rate *= self.ti_multiplier;
        }
        if carrier.ocular {
            rate *= self.ocular_multiplier;
        }
        rate
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransmissionMatrices {
    pub infection: DenseMatrix,
    pub recovery: DenseMatrix,
}

impl Village {
    /// Builds the infection and recovery matrices. Rows and columns follow the order in which
    /// agents were first seen.
    ///
    /// # Errors
    ///
    /// Returns `TrachomaError::InvalidParameter` if `parameters` fail validation.
    pub fn matrices(
        &self,
        parameters: &TransmissionParameters,
    ) -> Result<TransmissionMatrices, TrachomaError> {
        parameters.validate()?;

        let baselines: Vec<&Agent> = self
            .agents()
            .filter_map(|agent| self.baseline(agent))
            .collect();
        let n = baselines.len();
        debug!("Building {n}x{n} matrices for village {}", self.id());

        let mut infection = DenseMatrix::zeros(n);
        let mut recovery = DenseMatrix::zeros(n);

        for (j, carrier) in baselines.iter().enumerate() {
            for (i, victim) in baselines.iter().enumerate() {
                if i == j {
                    recovery.set(i, j, parameters.base_recovery_rate);
                } else {
                    infection.set(i, j, parameters.transmission_rate(carrier, victim));
                }
            }
        }

        Ok(TransmissionMatrices {
            infection,
            recovery,
        })
    }
}
