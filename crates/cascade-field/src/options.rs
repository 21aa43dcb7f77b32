//! Field driver options.

use crate::error::FieldError;

/// Controls for the adaptive field driver.
#[derive(Clone, Copy, Debug)]
pub struct FieldDriverOptions {
    /// Relative momentum error tolerated per substep.
    pub epsilon_rel_momentum: f64,
    /// Relative position error tolerated per substep.
    pub epsilon_rel_position: f64,
    /// Smallest substep the driver will attempt [cm].
    pub minimum_step: f64,
    /// Substep budget for a single advance call.
    pub max_nsteps: u32,
    /// Maximum sagitta between the curved path and its chord [cm].
    pub delta_chord: f64,
}

impl Default for FieldDriverOptions {
    fn default() -> Self {
        Self {
            epsilon_rel_momentum: 1e-5,
            epsilon_rel_position: 1e-5,
            minimum_step: 1e-6,
            max_nsteps: 128,
            delta_chord: 0.025,
        }
    }
}

impl FieldDriverOptions {
    /// Check every option against its contract.
    pub fn validate(&self) -> Result<(), FieldError> {
        let positive = [
            ("epsilon_rel_momentum", self.epsilon_rel_momentum),
            ("epsilon_rel_position", self.epsilon_rel_position),
            ("minimum_step", self.minimum_step),
            ("delta_chord", self.delta_chord),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(FieldError::InvalidOptions {
                    reason: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }
        if self.max_nsteps == 0 {
            return Err(FieldError::InvalidOptions {
                reason: "max_nsteps must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(FieldDriverOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_minimum_step_rejected() {
        let opts = FieldDriverOptions {
            minimum_step: 0.0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn zero_substep_budget_rejected() {
        let opts = FieldDriverOptions {
            max_nsteps: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }
}
