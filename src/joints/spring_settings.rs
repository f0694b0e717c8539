use crate::math::Real;

/// The stiffness of a joint, turned into an error reduction and a softness every step.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum SpringSettings {
    /// A spring with the given stiffness and damping constants.
    Stiffness {
        /// How strongly the error is corrected.
        stiffness: Real,
        /// How strongly the relative velocity along the constraint is damped.
        damping: Real,
    },
    /// The error reduction and softness given directly, as fractions of a step.
    Advanced {
        /// The fraction of the error corrected during one step.
        error_reduction_factor: Real,
        /// The softness of the constraint for a step of one second.
        softness: Real,
    },
}

impl Default for SpringSettings {
    fn default() -> Self {
        SpringSettings::Stiffness {
            stiffness: 600_000.0,
            damping: 90_000.0,
        }
    }
}

impl SpringSettings {
    /// Computes the error reduction (in `1/s`) and the softness used during a step of
    /// duration `dt`.
    pub fn error_reduction_and_softness(&self, dt: Real) -> (Real, Real) {
        match *self {
            SpringSettings::Stiffness { stiffness, damping } => {
                let denominator = dt * stiffness + damping;
                if denominator <= 0.0 || dt <= 0.0 {
                    return (0.0, 0.0);
                }

                let factor = 1.0 / denominator;
                (stiffness * factor, factor / dt)
            }
            SpringSettings::Advanced {
                error_reduction_factor,
                softness,
            } => {
                if dt <= 0.0 {
                    return (0.0, 0.0);
                }

                (error_reduction_factor / dt, softness / dt)
            }
        }
    }
}

/// The configuration shared by every joint.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct JointSettings {
    /// The stiffness of the joint.
    pub spring: SpringSettings,
    max_corrective_velocity: Real,
}

impl Default for JointSettings {
    fn default() -> Self {
        Self {
            spring: SpringSettings::default(),
            max_corrective_velocity: Real::MAX,
        }
    }
}

impl JointSettings {
    /// The largest velocity used to correct the error of the joint.
    pub fn max_corrective_velocity(&self) -> Real {
        self.max_corrective_velocity
    }

    /// Sets the largest velocity used to correct the error of the joint.
    ///
    /// Negative values are replaced by zero.
    pub fn set_max_corrective_velocity(&mut self, velocity: Real) {
        self.max_corrective_velocity = velocity.max(0.0);
    }
}
