//! `SyncExecutor` — the dependency-ordered round loop.

use std::time::Instant;

use cm_core::{CmError, RunConfig, RunCounters, SimTime, TerminationEvaluator};
use cm_model::{Component, ComponentKind, InputProvider, TaskContext};

use crate::{EngineError, EngineResult, RunObserver, RunReport, StepRecord, topological_order};

/// Runs a synchronous component: rounds of sequential, dependency-ordered
/// task execution until a termination condition holds.
///
/// Single-threaded end to end.  Given the same component and the same input
/// sequence, two runs produce identical traces.
pub struct SyncExecutor<P: InputProvider> {
    component: Component,
    provider:  P,
    config:    RunConfig,
}

impl<P: InputProvider> SyncExecutor<P> {
    /// Validate the configuration and component kind.
    ///
    /// Requires at least one of `max_rounds` / `stop_condition` — a
    /// synchronous run with neither would never stop.
    pub fn new(component: Component, provider: P, config: RunConfig) -> EngineResult<Self> {
        if component.kind != ComponentKind::Synchronous {
            return Err(EngineError::WrongKind {
                component: component.name.clone(),
                required:  ComponentKind::Synchronous,
                actual:    component.kind,
            });
        }
        config.validate()?;
        if config.max_rounds.is_none() && config.stop_condition.is_none() {
            return Err(CmError::Config(
                "synchronous execution needs max_rounds or a stop condition".into(),
            )
            .into());
        }
        Ok(Self { component, provider, config })
    }

    /// The live component (final state/outputs after a run).
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Run rounds until termination; return the trace.
    ///
    /// The topological order is computed once, before the first round.  A
    /// task failure aborts the run with the task name and round number;
    /// steps completed before the failure have already reached the
    /// observer.
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> EngineResult<RunReport> {
        let order = topological_order(&self.component)?;
        let evaluator = TerminationEvaluator::from_config(&self.config)?;
        let ordered_names: Vec<String> = order
            .iter()
            .map(|&i| self.component.tasks()[i].name.clone())
            .collect();

        let started = Instant::now();
        let mut counters = RunCounters::default();
        let mut records = Vec::new();
        observer.on_run_start();

        let stop = loop {
            if let Some(limit) = self.config.wall_clock_timeout {
                if started.elapsed() >= limit {
                    return Err(EngineError::WallClockTimeout(limit));
                }
            }

            let round = counters.rounds + 1;

            // ── Gather this round's inputs ────────────────────────────────
            let inputs = self.provider.generate(
                &self.component.input_names,
                round,
                &self.component.state,
            )?;
            for name in &self.component.input_names {
                if !inputs.contains_key(name) {
                    return Err(EngineError::MissingInput { input: name.clone(), round });
                }
            }

            // ── Run tasks sequentially in topological order ───────────────
            //
            // Effects apply immediately after each task, so writes are
            // visible to every later task in the same round.
            for &i in &order {
                let task = &self.component.tasks()[i];
                let mut ctx = TaskContext::for_round(
                    inputs.clone(),
                    self.component.state.clone(),
                    self.component.outputs.clone(),
                );
                task.run(&mut ctx).map_err(|source| EngineError::TaskFailedInRound {
                    task: task.name.clone(),
                    round,
                    source,
                })?;
                ctx.into_effects()
                    .apply_writes(&mut self.component.state, &mut self.component.outputs);
            }
            counters.rounds = round;

            // ── Snapshot and check termination ────────────────────────────
            let record = StepRecord {
                index:      round,
                round:      Some(round),
                time:       None,
                event:      None,
                inputs,
                outputs:    self.component.outputs.clone(),
                state:      self.component.state.clone(),
                task_order: self.config.track_task_order.then(|| ordered_names.clone()),
            };
            observer.on_step(&record);
            records.push(record);

            if let Some(reason) =
                evaluator.evaluate(&counters, SimTime::ZERO, &self.component.state, None)
            {
                break reason;
            }
        };

        let report = RunReport {
            records,
            stop,
            rounds:        counters.rounds,
            events:        0,
            final_time:    SimTime::ZERO,
            final_state:   self.component.state.clone(),
            final_outputs: self.component.outputs.clone(),
        };
        observer.on_run_end(&report);
        Ok(report)
    }
}
