//! Fixed-timestep accumulator
//!
//! Frame deltas are accumulated and consumed in whole fixed steps. At most
//! `max_substeps` steps run per frame; any backlog beyond that is dropped so a
//! long stall does not make the simulation spiral.

/// How many fixed steps to run this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Number of fixed steps to run
    pub steps: u32,
    /// Fraction of a step left in the accumulator, in `[0, 1)`
    pub alpha: f32,
}

/// Accumulates frame time and hands out fixed steps
#[derive(Debug, Clone)]
pub struct FixedStepper {
    fixed_dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStepper {
    /// Create a stepper; non-positive steps fall back to 1/60 s
    pub fn new(fixed_dt: f32, max_substeps: u32) -> Self {
        let fixed_dt = if fixed_dt.is_finite() && fixed_dt > 0.0 {
            fixed_dt
        } else {
            1.0 / 60.0
        };
        Self {
            fixed_dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Fixed step length in seconds
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Feed one frame's elapsed time
    pub fn advance(&mut self, frame_dt: f32) -> StepPlan {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < self.max_substeps {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }

        self.accumulator %= self.fixed_dt;

        StepPlan {
            steps,
            alpha: (self.accumulator / self.fixed_dt).clamp(0.0, 1.0 - f32::EPSILON),
        }
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_frames_accumulate() {
        let mut stepper = FixedStepper::new(0.01, 3);
        assert_eq!(stepper.advance(0.004).steps, 0);
        assert_eq!(stepper.advance(0.004).steps, 0);
        assert_eq!(stepper.advance(0.004).steps, 1);
    }

    #[test]
    fn test_substeps_are_capped_and_backlog_dropped() {
        let mut stepper = FixedStepper::new(1.0 / 60.0, 3);
        let plan = stepper.advance(0.5);
        assert_eq!(plan.steps, 3);
        assert!(plan.alpha < 1.0);

        // The stall does not carry over into the next frame
        assert!(stepper.advance(0.001).steps <= 1);
    }

    #[test]
    fn test_alpha_reports_remainder() {
        let mut stepper = FixedStepper::new(0.01, 3);
        let plan = stepper.advance(0.025);
        assert_eq!(plan.steps, 2);
        assert!((plan.alpha - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_deltas_run_nothing() {
        let mut stepper = FixedStepper::new(1.0 / 60.0, 3);
        assert_eq!(stepper.advance(0.0).steps, 0);
        assert_eq!(stepper.advance(-1.0).steps, 0);
        assert_eq!(stepper.advance(f32::NAN).steps, 0);
        assert_eq!(stepper.advance(f32::INFINITY).steps, 0);
    }

    #[test]
    fn test_invalid_fixed_step_falls_back() {
        let stepper = FixedStepper::new(0.0, 0);
        assert!((stepper.fixed_dt() - 1.0 / 60.0).abs() < f32::EPSILON);
    }
}
