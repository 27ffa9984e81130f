use super::resolver;
use crate::error::Result;
use crate::models::{Action, DerivedBuckets, ModelOutput, Priority, RawInputs, Reason};

/// Candidate actions collected while a model's rules run.
///
/// Rules append in declaration order; a rule emits either a recommendation
/// or a disallow, never both. Repeated codes are allowed here and merged
/// (reasons concatenated) before conflict resolution.
#[derive(Debug, Default)]
pub struct RuleOutcome {
    recommended: Vec<Action>,
    disallowed: Vec<Action>,
}

impl RuleOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommend(&mut self, code: &str, reasons: Vec<Reason>) {
        self.recommended.push(Action::new(code, reasons));
    }

    pub fn forbid(&mut self, code: &str, reasons: Vec<Reason>) {
        self.disallowed.push(Action::new(code, reasons));
    }

    pub fn into_parts(self) -> (Vec<Action>, Vec<Action>) {
        (self.recommended, self.disallowed)
    }
}

/// Capability interface implemented once per farm type.
///
/// Models are stateless values; every method is a pure function of its
/// arguments. The shared call sequence (derive, build context, apply rules,
/// resolve, rank, sort) lives in [`run_model`], not in the models.
pub trait FarmModel: Send + Sync {
    /// Immutable snapshot type consumed by this model's rules.
    type Context;

    /// Stable farm-type identifier used for registry and template lookup.
    fn farm_type(&self) -> &'static str;

    /// Bucketize raw readings into categorical decision buckets.
    fn derive(&self, raw: &RawInputs) -> Result<DerivedBuckets>;

    /// Assemble the typed rule-evaluation snapshot. Fails if any attribute
    /// consumed by the rules cannot be populated.
    fn build_context(&self, raw: &RawInputs, derived: &DerivedBuckets) -> Result<Self::Context>;

    /// Evaluate every rule, in declaration order, against the context.
    fn apply_rules(&self, ctx: &Self::Context) -> RuleOutcome;

    /// Total priority ranking over surviving recommendation codes.
    fn rank(&self, ctx: &Self::Context, code: &str) -> Priority;
}

/// Run the full pipeline for one model over one snapshot of inputs.
pub fn run_model<M: FarmModel>(model: &M, raw: &RawInputs) -> Result<ModelOutput> {
    let derived = model.derive(raw)?;
    let ctx = model.build_context(raw, &derived)?;
    let outcome = model.apply_rules(&ctx);
    let (recommendations, not_recommended) =
        resolver::resolve(outcome, |code| model.rank(&ctx, code));

    tracing::debug!(
        farm_type = model.farm_type(),
        recommendations = recommendations.len(),
        not_recommended = not_recommended.len(),
        "rules evaluated"
    );

    Ok(ModelOutput {
        derived,
        recommendations,
        not_recommended,
    })
}

/// Object-safe form of [`FarmModel`], stored by the registry. The blanket
/// impl routes every model through the shared [`run_model`] orchestration.
pub trait DynFarmModel: Send + Sync {
    fn farm_type(&self) -> &'static str;
    fn run(&self, raw: &RawInputs) -> Result<ModelOutput>;
}

impl std::fmt::Debug for dyn DynFarmModel + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynFarmModel")
            .field("farm_type", &self.farm_type())
            .finish()
    }
}

impl<M: FarmModel> DynFarmModel for M {
    fn farm_type(&self) -> &'static str {
        FarmModel::farm_type(self)
    }

    fn run(&self, raw: &RawInputs) -> Result<ModelOutput> {
        run_model(self, raw)
    }
}
