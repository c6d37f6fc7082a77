//! `EventExecutor` — the discrete-event simulation loop.

use std::time::Instant;

use cm_core::{
    CmError, RunConfig, RunCounters, SimClock, SimTime, StateMap, StopReason,
    TerminationEvaluator, Value,
};
use cm_event::{Event, EventQueue};
use cm_model::{ActionError, Component, ComponentKind, InputProvider, TaskContext, TaskEffects, Trigger};

use crate::matcher::{TriggerMatcher, periodic_event_name};
use crate::{EngineError, EngineResult, RunObserver, RunReport, StepRecord};

/// Name of the synthetic event that opens every run — the carrier for
/// `Immediate` triggers.
pub const START_EVENT: &str = "_start";

/// Name of the internal input-regeneration event.  Never dispatched to
/// tasks and never counted as a processed step; tasks see the configured
/// `input_event` instead.
const INPUT_CYCLE_EVENT: &str = "_input_cycle";

/// Where the executor is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Runs an event-driven component: drains the event queue in
/// `(time, priority, sequence)` order, advances the simulated clock, and
/// dispatches all tasks matched by each event concurrently.
///
/// Scheduling decisions — queue pops, trigger matching, clock advancement,
/// termination checks — are single-threaded; only the dispatch of one
/// event's matched batch fans out, and the executor joins the whole batch
/// before touching the next event.
pub struct EventExecutor {
    component:      Component,
    provider:       Option<Box<dyn InputProvider>>,
    config:         RunConfig,
    queue:          EventQueue,
    clock:          SimClock,
    matcher:        TriggerMatcher,
    state:          RunState,
    /// Inputs visible to tasks: the initial values overlaid with every
    /// generated batch so far.
    current_inputs: StateMap,
    initial_inputs: StateMap,
    input_round:    u64,
    #[cfg(feature = "parallel")]
    pool:           Option<rayon::ThreadPool>,
}

impl EventExecutor {
    /// Validate the configuration and component kind; build the worker pool
    /// if a bound is configured.
    pub fn new(component: Component, config: RunConfig) -> EngineResult<Self> {
        if component.kind != ComponentKind::EventDriven {
            return Err(EngineError::WrongKind {
                component: component.name.clone(),
                required:  ComponentKind::EventDriven,
                actual:    component.kind,
            });
        }
        config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = match config.max_workers {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| CmError::Config(format!("worker pool: {e}")))?,
            ),
            None => None,
        };

        let matcher = TriggerMatcher::new(&component);
        Ok(Self {
            component,
            provider: None,
            config,
            queue: EventQueue::new(),
            clock: SimClock::default(),
            matcher,
            state: RunState::Idle,
            current_inputs: StateMap::new(),
            initial_inputs: StateMap::new(),
            input_round: 0,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// Attach an input provider.  With `RunConfig::input_interval` set it is
    /// polled on that simulated-time cycle; otherwise once at run start.
    pub fn with_input_provider(mut self, provider: Box<dyn InputProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Input values available from the very first event, before any
    /// provider cycle.
    pub fn with_initial_inputs(mut self, inputs: StateMap) -> Self {
        self.initial_inputs = inputs;
        self
    }

    /// The executor's lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The live component (final state/outputs after a run).
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Run the simulation to completion; return the trace.
    ///
    /// Component state carries over from any previous run (it is the live
    /// model); the clock, queue, counters, and trigger state are reset.
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> EngineResult<RunReport> {
        self.reset_run();
        self.state = RunState::Running;
        match self.run_inner(observer) {
            Ok(report) => {
                self.state = RunState::Completed;
                observer.on_run_end(&report);
                Ok(report)
            }
            Err(e) => {
                self.state = RunState::Aborted;
                Err(e)
            }
        }
    }

    fn reset_run(&mut self) {
        self.queue = EventQueue::new();
        self.clock = SimClock::default();
        self.matcher = TriggerMatcher::new(&self.component);
        self.current_inputs = self.initial_inputs.clone();
        self.input_round = 0;
    }

    fn run_inner<O: RunObserver>(&mut self, observer: &mut O) -> EngineResult<RunReport> {
        let evaluator = TerminationEvaluator::from_config(&self.config)?;
        let started = Instant::now();
        let mut counters = RunCounters::default();
        let mut records = Vec::new();

        observer.on_run_start();
        self.seed_queue()?;

        let stop = loop {
            if let Some(limit) = self.config.wall_clock_timeout {
                if started.elapsed() >= limit {
                    return Err(EngineError::WallClockTimeout(limit));
                }
            }

            // ── 1+2: pop the minimum event, advance the clock ─────────────
            let Some(event) = self.queue.pop() else {
                break StopReason::QueueEmpty;
            };
            self.clock.advance_to(event.time);

            if event.name == INPUT_CYCLE_EVENT {
                self.cycle_inputs()?;
                continue;
            }
            counters.events += 1;

            // ── 3: collect every task made ready by this event ────────────
            let ready = self.matcher.collect_ready(
                self.component.tasks(),
                &event,
                &self.component.state,
            );

            // ── 4: dispatch the batch concurrently, join, surface failures ─
            let effects = self.dispatch(&ready, &event)?;

            // ── 5: apply writes and schedule emitted events, match order ──
            for (&i, mut eff) in ready.iter().zip(effects) {
                eff.apply_writes(&mut self.component.state, &mut self.component.outputs);
                let source = self.component.tasks()[i].name.clone();
                for emit in eff.emits {
                    // Delay was validated ≥ 0 at emit time.
                    let e = Event::new(event.time.offset(emit.delay), emit.name)
                        .with_payload(emit.payload)
                        .with_priority(emit.priority)
                        .from_task(source.clone());
                    self.queue.push(e);
                }
            }

            // ── 6: re-enqueue the next occurrence of matched periodics ────
            for &i in &ready {
                let task = &self.component.tasks()[i];
                if let Some(Trigger::Periodic { interval }) = &task.trigger {
                    let next =
                        Event::new(event.time.offset(*interval), periodic_event_name(&task.name));
                    self.queue.push(next);
                }
            }

            // ── 7: snapshot ───────────────────────────────────────────────
            let record = StepRecord {
                index:      counters.events,
                round:      None,
                time:       Some(event.time.secs()),
                event:      Some(event.name.clone()),
                inputs:     self.current_inputs.clone(),
                outputs:    self.component.outputs.clone(),
                state:      self.component.state.clone(),
                task_order: self.config.track_task_order.then(|| {
                    ready
                        .iter()
                        .map(|&i| self.component.tasks()[i].name.clone())
                        .collect()
                }),
            };
            observer.on_step(&record);
            records.push(record);

            // ── 8: termination ────────────────────────────────────────────
            if let Some(reason) = evaluator.evaluate(
                &counters,
                self.clock.now(),
                &self.component.state,
                Some(self.queue.is_empty()),
            ) {
                break reason;
            }
        };

        Ok(RunReport {
            records,
            stop,
            rounds:        0,
            events:        counters.events,
            final_time:    self.clock.now(),
            final_state:   self.component.state.clone(),
            final_outputs: self.component.outputs.clone(),
        })
    }

    /// Enqueue the run's opening events: the `Immediate` carrier first (so
    /// it holds the lowest sequence number and pops before everything else
    /// at t=0), then the first occurrence of every periodic task, then the
    /// input machinery.
    fn seed_queue(&mut self) -> EngineResult<()> {
        self.queue.push(Event::new(SimTime::ZERO, START_EVENT));

        let periodic: Vec<String> = self
            .component
            .tasks()
            .iter()
            .filter(|t| matches!(t.trigger, Some(Trigger::Periodic { .. })))
            .map(|t| periodic_event_name(&t.name))
            .collect();
        for name in periodic {
            self.queue.push(Event::new(SimTime::ZERO, name));
        }

        if self.provider.is_some() {
            if self.config.input_interval.is_some() {
                self.queue.push(Event::new(SimTime::ZERO, INPUT_CYCLE_EVENT));
            } else {
                // No interval: generate one batch up front.
                self.cycle_inputs()?;
            }
        }
        Ok(())
    }

    /// Generate a fresh input batch, overlay it on the current inputs,
    /// announce it with the configured input-ready event, and (if cycling)
    /// schedule the next regeneration.
    fn cycle_inputs(&mut self) -> EngineResult<()> {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(());
        };
        self.input_round += 1;
        let batch = provider.generate(
            &self.component.input_names,
            self.input_round,
            &self.component.state,
        )?;

        let payload: serde_json::Map<String, Value> =
            batch.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        for (k, v) in batch {
            self.current_inputs.insert(k, v);
        }
        self.queue.push(
            Event::new(self.clock.now(), self.config.input_event.clone())
                .with_payload(Value::Object(payload)),
        );

        if let Some(interval) = self.config.input_interval {
            self.queue
                .push(Event::new(self.clock.now().offset(interval), INPUT_CYCLE_EVENT));
        }
        Ok(())
    }

    /// Run the matched batch and convert any action failure into an abort
    /// carrying the task name, event name, and simulated time.
    fn dispatch(&self, ready: &[usize], event: &Event) -> EngineResult<Vec<TaskEffects>> {
        self.run_batch(ready, event)
            .into_iter()
            .map(|r| {
                r.map_err(|(task, source)| EngineError::TaskFailedOnEvent {
                    task,
                    event: event.name.clone(),
                    time: event.time,
                    source,
                })
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn run_batch(
        &self,
        ready: &[usize],
        event: &Event,
    ) -> Vec<Result<TaskEffects, (String, ActionError)>> {
        use rayon::prelude::*;

        // Capture only Sync data: the boxed input provider in `self` is
        // Send-only and must not cross into the worker closure.
        let component = &self.component;
        let inputs = &self.current_inputs;

        if ready.len() <= 1 {
            return ready.iter().map(|&i| run_task(component, inputs, i, event)).collect();
        }
        let job = || {
            ready
                .par_iter()
                .map(|&i| run_task(component, inputs, i, event))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(job),
            None => job(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_batch(
        &self,
        ready: &[usize],
        event: &Event,
    ) -> Vec<Result<TaskEffects, (String, ActionError)>> {
        ready
            .iter()
            .map(|&i| run_task(&self.component, &self.current_inputs, i, event))
            .collect()
    }
}

/// One task invocation: snapshot context in, effects out.
fn run_task(
    component: &Component,
    inputs: &StateMap,
    index: usize,
    event: &Event,
) -> Result<TaskEffects, (String, ActionError)> {
    let task = &component.tasks()[index];
    let mut ctx = TaskContext::for_event(
        inputs.clone(),
        component.state.clone(),
        component.outputs.clone(),
        event.time,
        event.name.clone(),
        event.payload.clone(),
    );
    task.run(&mut ctx).map_err(|e| (task.name.clone(), e))?;
    Ok(ctx.into_effects())
}
