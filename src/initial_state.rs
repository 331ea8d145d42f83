use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::TrachomaError;
use crate::village::Village;

/// Checks that `fraction` is a valid share of initially infected agents.
///
/// # Errors
///
/// Returns `TrachomaError::InvalidParameter` if `fraction` is outside `[0, 1]` or NaN.
pub fn validate_infected_fraction(fraction: f64) -> Result<(), TrachomaError> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(TrachomaError::InvalidParameter(format!(
            "initial infected fraction must lie in [0, 1], got {fraction}"
        )))
    }
}

impl Village {
    /// A random initial infection state, one entry per agent in matrix order. Exactly
    /// `fraction * num_agents` agents (rounded half to even) start infected.
    ///
    /// # Errors
    ///
    /// Returns `TrachomaError::InvalidParameter` if `fraction` is outside `[0, 1]`.
    pub fn random_initial_state<R: Rng + ?Sized>(
        &self,
        fraction: f64,
        rng: &mut R,
    ) -> Result<Vec<bool>, TrachomaError> {
        validate_infected_fraction(fraction)?;

        let n = self.num_agents();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let infected = (fraction * n as f64).round_ties_even() as usize;

        let mut state = vec![true; infected];
        state.resize(n, false);
        state.shuffle(rng);
        Ok(state)
    }
}
