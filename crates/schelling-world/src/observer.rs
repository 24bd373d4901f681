//! Seams between the engine and its host: world observers and stop signals.

use crate::grid::World;

/// Receives a read-only snapshot after every completed step.
///
/// Observers run synchronously inside the step, in registration order.
pub trait WorldObserver: Send {
    fn on_world_update(&mut self, world: &World);
}

/// Polled once per run-loop iteration, after the step; `true` ends the run.
pub trait StopSignal {
    fn should_stop(&mut self) -> bool;
}

impl<F> StopSignal for F
where
    F: FnMut() -> bool,
{
    fn should_stop(&mut self) -> bool {
        self()
    }
}

/// Stops after a fixed number of steps
#[derive(Debug, Clone)]
pub struct StepLimit {
    remaining: u64,
}

impl StepLimit {
    pub fn new(steps: u64) -> Self {
        Self { remaining: steps }
    }
}

impl StopSignal for StepLimit {
    fn should_stop(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit() {
        let mut limit = StepLimit::new(3);
        assert!(!limit.should_stop());
        assert!(!limit.should_stop());
        assert!(limit.should_stop());
        assert!(limit.should_stop());
    }

    #[test]
    fn test_closure_stop_signal() {
        let mut polls = 0;
        let mut signal = || {
            polls += 1;
            polls >= 2
        };
        assert!(!signal.should_stop());
        assert!(signal.should_stop());
    }
}
