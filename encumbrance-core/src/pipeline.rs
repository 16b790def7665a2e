//! Derived-data pipeline.
//!
//! The host prepares derived data for an actor in its own step; extensions run
//! afterwards in registration order, each seeing the same immutable context.
use crate::actor::Actor;
use crate::calculator::{InclusionPolicy, calculate};
use crate::config::{EncumbranceConfig, EncumbranceRule};
use crate::constants::LOG_TARGET;

/// Inputs shared by every step of one preparation pass.
#[derive(Debug, Clone, Copy)]
pub struct PrepareContext<'a> {
    pub config: &'a EncumbranceConfig,
    pub rule: EncumbranceRule,
    /// Whether the actor's sheet is currently displayed.
    pub sheet_rendered: bool,
}

/// What a step did to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Unchanged,
    Updated { refresh_sheet: bool },
}

impl StepOutcome {
    #[must_use]
    pub const fn wants_refresh(self) -> bool {
        matches!(
            self,
            Self::Updated {
                refresh_sheet: true
            }
        )
    }
}

/// One stage of derived-data preparation.
pub trait DerivedDataStep {
    fn name(&self) -> &'static str;

    fn apply(&self, actor: &mut Actor, ctx: &PrepareContext<'_>) -> StepOutcome;
}

/// A step backed by a plain function, used to slot the host's own
/// computation into a pipeline.
pub struct FnStep<F> {
    name: &'static str,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(&mut Actor, &PrepareContext<'_>) -> StepOutcome,
{
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> DerivedDataStep for FnStep<F>
where
    F: Fn(&mut Actor, &PrepareContext<'_>) -> StepOutcome,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, actor: &mut Actor, ctx: &PrepareContext<'_>) -> StepOutcome {
        (self.func)(actor, ctx)
    }
}

/// Recomputes encumbrance after the host's own derived data, but only when
/// unequipped items are excluded. Otherwise the host's values stand.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncumbranceStep;

impl DerivedDataStep for EncumbranceStep {
    fn name(&self) -> &'static str {
        "encumbrance"
    }

    fn apply(&self, actor: &mut Actor, ctx: &PrepareContext<'_>) -> StepOutcome {
        if ctx.config.count_unequipped {
            return StepOutcome::Unchanged;
        }
        let Some(report) = calculate(
            actor,
            ctx.config,
            ctx.rule,
            InclusionPolicy::ContainerAware,
        ) else {
            return StepOutcome::Unchanged;
        };

        let statuses = actor.encumbrance.statuses.clone();
        actor.encumbrance = report.to_data();
        // Status tags are owned by the update path.
        actor.encumbrance.statuses = statuses;
        log::debug!(
            target: LOG_TARGET,
            "derived encumbrance for {}: {} / {}",
            actor.id,
            actor.encumbrance.value,
            report.max
        );
        StepOutcome::Updated {
            refresh_sheet: ctx.sheet_rendered,
        }
    }
}

/// Ordered derived-data steps: the host step first, extensions after it.
#[derive(Default)]
pub struct DerivedDataPipeline {
    steps: Vec<Box<dyn DerivedDataStep>>,
}

impl DerivedDataPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with only the encumbrance extension, for hosts whose own step
    /// already ran.
    #[must_use]
    pub fn with_encumbrance() -> Self {
        Self::new().then(EncumbranceStep)
    }

    /// Append a step after the existing ones.
    #[must_use]
    pub fn then<S>(mut self, step: S) -> Self
    where
        S: DerivedDataStep + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step in order. Returns whether any step asked for a sheet
    /// refresh.
    pub fn run(&self, actor: &mut Actor, ctx: &PrepareContext<'_>) -> bool {
        let mut refresh = false;
        for step in &self.steps {
            refresh |= step.apply(actor, ctx).wants_refresh();
        }
        refresh
    }
}
