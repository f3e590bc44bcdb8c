/// Counts observed steps until decisions are allowed.
#[derive(Debug, Clone)]
pub struct WarmupState {
    warmup_steps: usize,
    steps_observed: usize,
}

impl WarmupState {
    pub fn new(warmup_steps: usize) -> Self {
        Self {
            warmup_steps,
            steps_observed: 0,
        }
    }

    pub fn process_step(&mut self) {
        self.steps_observed += 1;
    }

    pub fn is_warm(&self) -> bool {
        self.steps_observed >= self.warmup_steps
    }

    pub fn steps_until_warm(&self) -> usize {
        self.warmup_steps.saturating_sub(self.steps_observed)
    }
}
