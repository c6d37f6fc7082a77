//! Input providers — where per-round / per-cycle input values come from.

use cm_core::{StateMap, Value};
use indexmap::IndexMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{ModelError, ModelResult};

/// Supplies a value for every declared input name, once per synchronous
/// round or per event-driven input cycle.
///
/// `round` is 1-based and counts generation calls, not processed events.
/// Providers may inspect the live `state` (e.g. to generate adaptive
/// workloads) but must not assume it is stable across calls.
pub trait InputProvider: Send {
    fn generate(
        &mut self,
        input_names: &[String],
        round: u64,
        state: &StateMap,
    ) -> ModelResult<StateMap>;
}

// ── NoInputs ──────────────────────────────────────────────────────────────────

/// Provider for components that declare no inputs.
pub struct NoInputs;

impl InputProvider for NoInputs {
    fn generate(&mut self, _: &[String], _: u64, _: &StateMap) -> ModelResult<StateMap> {
        Ok(StateMap::new())
    }
}

// ── ConstantInputs ────────────────────────────────────────────────────────────

/// The same input values every round.
pub struct ConstantInputs(pub StateMap);

impl InputProvider for ConstantInputs {
    fn generate(&mut self, _: &[String], _: u64, _: &StateMap) -> ModelResult<StateMap> {
        Ok(self.0.clone())
    }
}

// ── FixedInputs ───────────────────────────────────────────────────────────────

/// A predetermined per-round input sequence.
///
/// Round `n` (1-based) takes the `n`-th entry; running past the end is a
/// configuration error — set a round limit no longer than the sequence.
pub struct FixedInputs {
    sequence: Vec<StateMap>,
}

impl FixedInputs {
    pub fn new(sequence: Vec<StateMap>) -> Self {
        Self { sequence }
    }
}

impl InputProvider for FixedInputs {
    fn generate(&mut self, _: &[String], round: u64, _: &StateMap) -> ModelResult<StateMap> {
        self.sequence
            .get((round.max(1) - 1) as usize)
            .cloned()
            .ok_or(ModelError::InputExhausted(round))
    }
}

// ── RandomInputs ──────────────────────────────────────────────────────────────

/// What kind of value to generate for one input name.
#[derive(Clone, Debug)]
pub enum InputSpec {
    /// Uniform integer in `min..=max`.
    Int { min: i64, max: i64 },
    /// Uniform float in `min..max`.
    Float { min: f64, max: f64 },
    /// `true` or `false`, even odds.
    Bool,
    /// One of the given strings, uniform.
    Choice(Vec<String>),
}

/// Seeded pseudo-random inputs from per-name specifications.
///
/// The same seed always yields the same input sequence, so randomized runs
/// stay reproducible.
pub struct RandomInputs {
    specs: IndexMap<String, InputSpec>,
    rng:   SmallRng,
}

impl RandomInputs {
    pub fn new(specs: IndexMap<String, InputSpec>, seed: u64) -> Self {
        Self {
            specs,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl InputProvider for RandomInputs {
    fn generate(
        &mut self,
        input_names: &[String],
        _round: u64,
        _state: &StateMap,
    ) -> ModelResult<StateMap> {
        let mut out = StateMap::with_capacity(input_names.len());
        for name in input_names {
            let spec = self
                .specs
                .get(name)
                .ok_or_else(|| ModelError::MissingInputSpec(name.clone()))?;
            let value = match spec {
                InputSpec::Int { min, max } => Value::from(self.rng.gen_range(*min..=*max)),
                InputSpec::Float { min, max } => Value::from(self.rng.gen_range(*min..*max)),
                InputSpec::Bool => Value::from(self.rng.gen_bool(0.5)),
                InputSpec::Choice(options) => {
                    let i = self.rng.gen_range(0..options.len());
                    Value::from(options[i].clone())
                }
            };
            out.insert(name.clone(), value);
        }
        Ok(out)
    }
}
