//! Guarded teardown: every step runs even when an earlier one fails.

pub type StepResult = anyhow::Result<()>;

struct Step<'a> {
    label: &'static str,
    run: Box<dyn FnOnce() -> StepResult + 'a>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub completed: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered list of cleanup steps, consumed by [`Teardown::run`] so it can only
/// execute once.
#[derive(Default)]
pub struct Teardown<'a> {
    steps: Vec<Step<'a>>,
}

impl<'a> Teardown<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn step(mut self, label: &'static str, run: impl FnOnce() -> StepResult + 'a) -> Self {
        self.steps.push(Step {
            label,
            run: Box::new(run),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(self) -> TeardownReport {
        let mut report = TeardownReport::default();
        for step in self.steps {
            match (step.run)() {
                Ok(()) => report.completed.push(step.label),
                Err(e) => {
                    log::warn!("[teardown] {} failed: {:#}", step.label, e);
                    report.failed.push((step.label, format!("{:#}", e)));
                }
            }
        }
        report
    }
}
