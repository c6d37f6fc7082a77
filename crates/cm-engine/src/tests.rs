//! Integration tests for both executors.

use std::time::Duration;

use serde_json::json;

use cm_core::{RunConfig, SimTime, StateMap, StatePredicate, StopReason, Value};
use cm_model::{
    ActionError, Component, ComponentKind, ConstantInputs, FixedInputs, NoInputs, Task,
    TaskContext, Trigger,
};

use crate::{
    EngineError, EventExecutor, NoopObserver, RunObserver, StepRecord, SyncExecutor,
    event_loop::RunState, topological_order,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn state(pairs: &[(&str, i64)]) -> StateMap {
    pairs.iter().map(|(k, v)| (k.to_string(), json!(v))).collect()
}

fn i64_of(map: &StateMap, key: &str) -> i64 {
    map.get(key).and_then(|v| v.as_i64()).unwrap_or_else(|| panic!("no i64 at '{key}'"))
}

fn noop() -> impl cm_model::TaskAction {
    |_: &mut TaskContext| -> Result<(), ActionError> { Ok(()) }
}

/// Action that adds `by` to the integer state field `key`.
fn add_to(key: &'static str, by: i64) -> impl cm_model::TaskAction {
    move |ctx: &mut TaskContext| -> Result<(), ActionError> {
        let current = ctx.state(key).and_then(|v| v.as_i64()).unwrap_or(0);
        ctx.set_state(key, current + by);
        Ok(())
    }
}

/// Action that appends the current simulated time to the array field `key`.
fn record_time(key: &'static str) -> impl cm_model::TaskAction {
    move |ctx: &mut TaskContext| -> Result<(), ActionError> {
        let mut times = ctx.state(key).and_then(|v| v.as_array().cloned()).unwrap_or_default();
        times.push(json!(ctx.now().secs()));
        ctx.set_state(key, Value::Array(times));
        Ok(())
    }
}

/// Action that appends a string tag to the array field `key`.
fn record_tag(key: &'static str, tag: &'static str) -> impl cm_model::TaskAction {
    move |ctx: &mut TaskContext| -> Result<(), ActionError> {
        let mut tags = ctx.state(key).and_then(|v| v.as_array().cloned()).unwrap_or_default();
        tags.push(json!(tag));
        ctx.set_state(key, Value::Array(tags));
        Ok(())
    }
}

// ── Topological ordering ──────────────────────────────────────────────────────

#[cfg(test)]
mod ordering {
    use super::*;

    fn diamond() -> Component {
        // Declared d, b, a, c — the valid orders are constrained by deps,
        // ties break by declaration index.
        Component::new(
            "diamond",
            ComponentKind::Synchronous,
            StateMap::new(),
            vec![],
            vec![],
            vec![
                Task::synchronous("d", ["c", "b"], noop()),
                Task::synchronous("b", ["a"], noop()),
                Task::synchronous("a", Vec::<String>::new(), noop()),
                Task::synchronous("c", ["a"], noop()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn order_is_valid_and_breaks_ties_by_declaration() {
        let c = diamond();
        let order = topological_order(&c).unwrap();
        // a first (only root), then b (declared before c), then c, then d.
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn order_is_identical_across_repeated_computation() {
        let c = diamond();
        let first = topological_order(&c).unwrap();
        for _ in 0..10 {
            assert_eq!(topological_order(&c).unwrap(), first);
        }
    }

    #[test]
    fn independent_tasks_run_in_declaration_order() {
        let c = Component::new(
            "flat",
            ComponentKind::Synchronous,
            StateMap::new(),
            vec![],
            vec![],
            vec![
                Task::synchronous("z", Vec::<String>::new(), noop()),
                Task::synchronous("m", Vec::<String>::new(), noop()),
                Task::synchronous("a", Vec::<String>::new(), noop()),
            ],
        )
        .unwrap();
        assert_eq!(topological_order(&c).unwrap(), vec![0, 1, 2]);
    }
}

// ── Synchronous executor ──────────────────────────────────────────────────────

#[cfg(test)]
mod sync_executor {
    use super::*;

    #[test]
    fn counter_increments_over_five_rounds() {
        let component = Component::new(
            "counter",
            ComponentKind::Synchronous,
            state(&[("count", 0)]),
            vec!["increment".into()],
            vec![],
            vec![Task::synchronous(
                "add",
                Vec::<String>::new(),
                |ctx: &mut TaskContext| -> Result<(), ActionError> {
                    let count = ctx.state("count").and_then(|v| v.as_i64()).unwrap_or(0);
                    let inc = ctx.input("increment").and_then(|v| v.as_i64()).unwrap_or(0);
                    ctx.set_state("count", count + inc);
                    Ok(())
                },
            )],
        )
        .unwrap();

        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(5);
        let mut exec =
            SyncExecutor::new(component, ConstantInputs(state(&[("increment", 1)])), cfg).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.stop, StopReason::MaxRounds);
        assert_eq!(report.rounds, 5);
        assert_eq!(report.records.len(), 5);
        assert_eq!(i64_of(&report.final_state, "count"), 5);
        assert_eq!(report.records[0].round, Some(1));
        assert_eq!(i64_of(&report.records[2].state, "count"), 3);
    }

    #[test]
    fn writes_are_visible_within_the_same_round() {
        let component = Component::new(
            "pipeline",
            ComponentKind::Synchronous,
            state(&[("x", 0)]),
            vec![],
            vec!["y".into()],
            vec![
                Task::synchronous(
                    "reader",
                    ["writer"],
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        let x = ctx.state("x").and_then(|v| v.as_i64()).unwrap_or(-1);
                        ctx.set_output("y", x);
                        Ok(())
                    },
                ),
                Task::synchronous(
                    "writer",
                    Vec::<String>::new(),
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        ctx.set_state("x", 5);
                        Ok(())
                    },
                ),
            ],
        )
        .unwrap();

        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(1);
        cfg.track_task_order = true;
        let mut exec = SyncExecutor::new(component, NoInputs, cfg).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.final_outputs.get("y"), Some(&json!(5)));
        assert_eq!(
            report.records[0].task_order,
            Some(vec!["writer".to_string(), "reader".to_string()])
        );
    }

    #[test]
    fn state_condition_outranks_round_limit() {
        let component = Component::new(
            "until",
            ComponentKind::Synchronous,
            state(&[("count", 0)]),
            vec![],
            vec![],
            vec![Task::synchronous("add", Vec::<String>::new(), add_to("count", 1))],
        )
        .unwrap();

        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(100);
        cfg.stop_condition = Some(StatePredicate::new(|s| {
            s.get("count").and_then(|v| v.as_i64()).unwrap_or(0) >= 3
        }));
        let mut exec = SyncExecutor::new(component, NoInputs, cfg).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.stop, StopReason::StateCondition);
        assert_eq!(report.rounds, 3);
    }

    #[test]
    fn task_failure_aborts_with_task_and_round() {
        let component = Component::new(
            "flaky",
            ComponentKind::Synchronous,
            state(&[("round", 0)]),
            vec![],
            vec![],
            vec![Task::synchronous(
                "boom",
                Vec::<String>::new(),
                |ctx: &mut TaskContext| -> Result<(), ActionError> {
                    let r = ctx.state("round").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
                    if r >= 3 {
                        return Err(ActionError::msg("deliberate failure"));
                    }
                    ctx.set_state("round", r);
                    Ok(())
                },
            )],
        )
        .unwrap();

        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(10);
        let mut exec = SyncExecutor::new(component, NoInputs, cfg).unwrap();

        let mut seen = Vec::new();
        struct Collect<'a>(&'a mut Vec<u64>);
        impl RunObserver for Collect<'_> {
            fn on_step(&mut self, record: &StepRecord) {
                self.0.push(record.index);
            }
        }

        let err = exec.run(&mut Collect(&mut seen)).unwrap_err();
        match err {
            EngineError::TaskFailedInRound { task, round, .. } => {
                assert_eq!(task, "boom");
                assert_eq!(round, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The two completed rounds were logged before the abort.
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn missing_declared_input_is_an_error() {
        let component = Component::new(
            "needs-input",
            ComponentKind::Synchronous,
            StateMap::new(),
            vec!["v".into()],
            vec![],
            vec![Task::synchronous("t", Vec::<String>::new(), noop())],
        )
        .unwrap();

        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(1);
        let mut exec = SyncExecutor::new(component, NoInputs, cfg).unwrap();
        assert!(matches!(
            exec.run(&mut NoopObserver),
            Err(EngineError::MissingInput { input, round: 1 }) if input == "v"
        ));
    }

    #[test]
    fn refuses_to_run_without_any_stop_condition() {
        let component = Component::new(
            "forever",
            ComponentKind::Synchronous,
            StateMap::new(),
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        assert!(SyncExecutor::new(component, NoInputs, RunConfig::new()).is_err());
    }

    #[test]
    fn rejects_event_driven_components() {
        let component = Component::new(
            "wrong",
            ComponentKind::EventDriven,
            StateMap::new(),
            vec![],
            vec![],
            vec![Task::event_driven("t", Trigger::Immediate, noop())],
        )
        .unwrap();
        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(1);
        assert!(matches!(
            SyncExecutor::new(component, NoInputs, cfg),
            Err(EngineError::WrongKind { .. })
        ));
    }

    #[test]
    fn wall_clock_timeout_aborts_the_run() {
        let component = Component::new(
            "slow",
            ComponentKind::Synchronous,
            state(&[("n", 0)]),
            vec![],
            vec![],
            vec![Task::synchronous("t", Vec::<String>::new(), add_to("n", 1))],
        )
        .unwrap();

        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(1_000_000);
        cfg.wall_clock_timeout = Some(Duration::ZERO);
        let mut exec = SyncExecutor::new(component, NoInputs, cfg).unwrap();
        assert!(matches!(
            exec.run(&mut NoopObserver),
            Err(EngineError::WallClockTimeout(_))
        ));
    }

    #[test]
    fn repeated_runs_yield_byte_identical_traces() {
        let build = || {
            let component = Component::new(
                "det",
                ComponentKind::Synchronous,
                state(&[("acc", 0)]),
                vec!["step".into()],
                vec!["acc_out".into()],
                vec![
                    Task::synchronous(
                        "apply",
                        Vec::<String>::new(),
                        |ctx: &mut TaskContext| -> Result<(), ActionError> {
                            let acc = ctx.state("acc").and_then(|v| v.as_i64()).unwrap_or(0);
                            let step = ctx.input("step").and_then(|v| v.as_i64()).unwrap_or(0);
                            ctx.set_state("acc", acc + step);
                            Ok(())
                        },
                    ),
                    Task::synchronous(
                        "publish",
                        ["apply"],
                        |ctx: &mut TaskContext| -> Result<(), ActionError> {
                            let acc = ctx.state("acc").cloned().unwrap_or(Value::Null);
                            ctx.set_output("acc_out", acc);
                            Ok(())
                        },
                    ),
                ],
            )
            .unwrap();
            let inputs = FixedInputs::new(vec![
                state(&[("step", 3)]),
                state(&[("step", -1)]),
                state(&[("step", 4)]),
            ]);
            let mut cfg = RunConfig::new();
            cfg.max_rounds = Some(3);
            cfg.track_task_order = true;
            SyncExecutor::new(component, inputs, cfg).unwrap()
        };

        let a = build().run(&mut NoopObserver).unwrap();
        let b = build().run(&mut NoopObserver).unwrap();
        assert_eq!(a.records, b.records);
        assert_eq!(
            serde_json::to_string(&a.records).unwrap(),
            serde_json::to_string(&b.records).unwrap()
        );
        assert_eq!(i64_of(&a.final_state, "acc"), 6);
    }
}

// ── Event-driven executor ─────────────────────────────────────────────────────

#[cfg(test)]
mod event_executor {
    use super::*;

    fn event_component(initial: StateMap, tasks: Vec<Task>) -> Component {
        Component::new("ev", ComponentKind::EventDriven, initial, vec![], vec![], tasks).unwrap()
    }

    #[test]
    fn immediate_task_fires_exactly_once() {
        let component = event_component(
            state(&[("count", 0)]),
            vec![Task::event_driven("init", Trigger::Immediate, add_to("count", 1))],
        );
        let mut exec = EventExecutor::new(component, RunConfig::new()).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.stop, StopReason::QueueEmpty);
        assert_eq!(report.events, 1); // just the start event
        assert_eq!(i64_of(&report.final_state, "count"), 1);
        assert_eq!(exec.state(), RunState::Completed);
    }

    #[test]
    fn periodic_fires_at_interval_multiples_inclusive_of_max_time() {
        let component = event_component(
            StateMap::new(),
            vec![Task::event_driven(
                "pulse",
                Trigger::Periodic { interval: 2.0 },
                record_time("times"),
            )],
        );
        let mut cfg = RunConfig::new();
        cfg.max_time = Some(10.0);
        let mut exec = EventExecutor::new(component, cfg).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.stop, StopReason::MaxTime);
        // The occurrence at exactly t=10 is still processed: 6 firings.
        assert_eq!(
            report.final_state.get("times"),
            Some(&json!([0.0, 2.0, 4.0, 6.0, 8.0, 10.0]))
        );
        assert_eq!(report.final_time, SimTime::new(10.0).unwrap());
    }

    #[test]
    fn co_triggered_tasks_writing_distinct_keys_lose_nothing() {
        let component = event_component(
            state(&[("a", 0), ("b", 0)]),
            vec![
                Task::event_driven(
                    "kick",
                    Trigger::Immediate,
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        ctx.emit("read_all", json!(null), 0.0, 0)?;
                        Ok(())
                    },
                ),
                Task::event_driven("left", Trigger::on_event("read_all"), add_to("a", 10)),
                Task::event_driven("right", Trigger::on_event("read_all"), add_to("b", 20)),
            ],
        );
        let mut cfg = RunConfig::new();
        cfg.max_workers = Some(2);
        let mut exec = EventExecutor::new(component, cfg).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.stop, StopReason::QueueEmpty);
        assert_eq!(i64_of(&report.final_state, "a"), 10);
        assert_eq!(i64_of(&report.final_state, "b"), 20);
    }

    #[test]
    fn zero_delay_self_triggering_drains_and_stops() {
        let component = event_component(
            state(&[("count", 3)]),
            vec![
                Task::event_driven(
                    "kick",
                    Trigger::Immediate,
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        ctx.emit("tick", json!(null), 0.0, 0)?;
                        Ok(())
                    },
                ),
                Task::event_driven(
                    "ticker",
                    Trigger::on_event("tick"),
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        let count = ctx.state("count").and_then(|v| v.as_i64()).unwrap_or(0);
                        if count > 0 {
                            ctx.set_state("count", count - 1);
                            ctx.emit("tick", json!(null), 0.0, 0)?;
                        }
                        Ok(())
                    },
                ),
            ],
        );
        let mut exec = EventExecutor::new(component, RunConfig::new()).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.stop, StopReason::QueueEmpty);
        assert_eq!(i64_of(&report.final_state, "count"), 0);
        // start + 4 ticks: three decrementing re-emissions, one final no-op.
        assert_eq!(report.events, 5);
        assert_eq!(report.final_time, SimTime::ZERO);
    }

    #[test]
    fn condition_trigger_fires_once_per_false_true_edge() {
        let component = event_component(
            state(&[("x", 0), ("fires", 0)]),
            vec![
                Task::event_driven("inc", Trigger::Periodic { interval: 1.0 }, add_to("x", 1)),
                Task::event_driven(
                    "edge",
                    Trigger::on_condition(|s| {
                        let x = s.get("x").and_then(|v| v.as_i64()).unwrap_or(0);
                        x > 0 && x % 2 == 0
                    }),
                    add_to("fires", 1),
                ),
            ],
        );
        let mut cfg = RunConfig::new();
        cfg.max_time = Some(5.0);
        let mut exec = EventExecutor::new(component, cfg).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        // x is even at 2 and 4 when occurrences are collected; each is one
        // edge, and the level staying true never re-fires.
        assert_eq!(i64_of(&report.final_state, "fires"), 2);
        assert_eq!(i64_of(&report.final_state, "x"), 6);
        assert_eq!(report.stop, StopReason::MaxTime);
    }

    #[test]
    fn same_time_events_order_by_priority_then_fifo() {
        let component = event_component(
            StateMap::new(),
            vec![
                Task::event_driven(
                    "kick",
                    Trigger::Immediate,
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        ctx.emit("b", json!(null), 1.0, 0)?;
                        ctx.emit("a", json!(null), 1.0, -1)?;
                        ctx.emit("c", json!(null), 1.0, 0)?;
                        Ok(())
                    },
                ),
                Task::event_driven("on_a", Trigger::on_event("a"), record_tag("order", "a")),
                Task::event_driven("on_b", Trigger::on_event("b"), record_tag("order", "b")),
                Task::event_driven("on_c", Trigger::on_event("c"), record_tag("order", "c")),
            ],
        );
        let mut exec = EventExecutor::new(component, RunConfig::new()).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();

        // "a" wins on priority; "b" vs "c" falls back to emit order.
        assert_eq!(report.final_state.get("order"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn event_payload_reaches_the_task() {
        let component = event_component(
            state(&[("got", 0)]),
            vec![
                Task::event_driven(
                    "send",
                    Trigger::Immediate,
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        ctx.emit("data", json!({"value": 41}), 0.5, 0)?;
                        Ok(())
                    },
                ),
                Task::event_driven(
                    "recv",
                    Trigger::on_event("data"),
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        let v = ctx.event_payload()["value"].as_i64().unwrap_or(0);
                        ctx.set_state("got", v + 1);
                        Ok(())
                    },
                ),
            ],
        );
        let mut exec = EventExecutor::new(component, RunConfig::new()).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();
        assert_eq!(i64_of(&report.final_state, "got"), 42);
        assert_eq!(report.final_time, SimTime::new(0.5).unwrap());
    }

    #[test]
    fn max_events_limit_stops_the_run() {
        let component = event_component(
            StateMap::new(),
            vec![Task::event_driven("pulse", Trigger::Periodic { interval: 1.0 }, noop())],
        );
        let mut cfg = RunConfig::new();
        cfg.max_events = Some(3);
        let mut exec = EventExecutor::new(component, cfg).unwrap();
        let report = exec.run(&mut NoopObserver).unwrap();
        assert_eq!(report.stop, StopReason::MaxEvents);
        assert_eq!(report.events, 3);
    }

    #[test]
    fn input_cycling_announces_fresh_inputs() {
        let component = Component::new(
            "with-inputs",
            ComponentKind::EventDriven,
            state(&[("last", 0)]),
            vec!["v".into()],
            vec![],
            vec![Task::event_driven(
                "on_input",
                Trigger::on_event("input_ready"),
                |ctx: &mut TaskContext| -> Result<(), ActionError> {
                    let v = ctx.input("v").and_then(|x| x.as_i64()).unwrap_or(-1);
                    ctx.set_state("last", v);
                    Ok(())
                },
            )],
        )
        .unwrap();

        let mut cfg = RunConfig::new();
        cfg.max_time = Some(2.5);
        cfg.input_interval = Some(1.0);
        let mut exec = EventExecutor::new(component, cfg)
            .unwrap()
            .with_input_provider(Box::new(ConstantInputs(state(&[("v", 7)]))));
        let report = exec.run(&mut NoopObserver).unwrap();

        assert_eq!(report.stop, StopReason::MaxTime);
        assert_eq!(i64_of(&report.final_state, "last"), 7);
        // Internal input-cycle events are not processed steps: only the
        // start event and the input_ready announcements count.
        assert_eq!(report.events, 5);
    }

    #[test]
    fn task_failure_aborts_with_event_and_time() {
        let component = event_component(
            StateMap::new(),
            vec![
                Task::event_driven(
                    "kick",
                    Trigger::Immediate,
                    |ctx: &mut TaskContext| -> Result<(), ActionError> {
                        ctx.emit("doom", json!(null), 2.0, 0)?;
                        Ok(())
                    },
                ),
                Task::event_driven(
                    "fragile",
                    Trigger::on_event("doom"),
                    |_: &mut TaskContext| -> Result<(), ActionError> {
                        Err(ActionError::msg("kaput"))
                    },
                ),
            ],
        );
        let mut exec = EventExecutor::new(component, RunConfig::new()).unwrap();
        let err = exec.run(&mut NoopObserver).unwrap_err();
        match err {
            EngineError::TaskFailedOnEvent { task, event, time, .. } => {
                assert_eq!(task, "fragile");
                assert_eq!(event, "doom");
                assert_eq!(time, SimTime::new(2.0).unwrap());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(exec.state(), RunState::Aborted);
    }

    #[test]
    fn negative_emit_delay_surfaces_as_action_failure() {
        let component = event_component(
            StateMap::new(),
            vec![Task::event_driven(
                "bad",
                Trigger::Immediate,
                |ctx: &mut TaskContext| -> Result<(), ActionError> {
                    ctx.emit("e", json!(null), -1.0, 0)?;
                    Ok(())
                },
            )],
        );
        let mut exec = EventExecutor::new(component, RunConfig::new()).unwrap();
        let err = exec.run(&mut NoopObserver).unwrap_err();
        assert!(err.to_string().contains("negative delay"), "got: {err}");
    }

    #[test]
    fn wall_clock_timeout_aborts_the_run() {
        let component = event_component(
            StateMap::new(),
            vec![Task::event_driven("pulse", Trigger::Periodic { interval: 1.0 }, noop())],
        );
        let mut cfg = RunConfig::new();
        cfg.wall_clock_timeout = Some(Duration::ZERO);
        let mut exec = EventExecutor::new(component, cfg).unwrap();
        assert!(matches!(
            exec.run(&mut NoopObserver),
            Err(EngineError::WallClockTimeout(_))
        ));
        assert_eq!(exec.state(), RunState::Aborted);
    }

    #[test]
    fn rejects_synchronous_components() {
        let component = Component::new(
            "wrong",
            ComponentKind::Synchronous,
            StateMap::new(),
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        assert!(matches!(
            EventExecutor::new(component, RunConfig::new()),
            Err(EngineError::WrongKind { .. })
        ));
    }

    #[test]
    fn repeated_runs_yield_byte_identical_traces() {
        let run_once = || {
            let component = event_component(
                state(&[("count", 3)]),
                vec![
                    Task::event_driven(
                        "kick",
                        Trigger::Immediate,
                        |ctx: &mut TaskContext| -> Result<(), ActionError> {
                            ctx.emit("tick", json!(null), 0.0, 0)?;
                            Ok(())
                        },
                    ),
                    Task::event_driven(
                        "ticker",
                        Trigger::on_event("tick"),
                        |ctx: &mut TaskContext| -> Result<(), ActionError> {
                            let count = ctx.state("count").and_then(|v| v.as_i64()).unwrap_or(0);
                            if count > 0 {
                                ctx.set_state("count", count - 1);
                                ctx.emit("tick", json!(null), 0.0, 0)?;
                            }
                            Ok(())
                        },
                    ),
                ],
            );
            let mut cfg = RunConfig::new();
            cfg.track_task_order = true;
            let mut exec = EventExecutor::new(component, cfg).unwrap();
            exec.run(&mut NoopObserver).unwrap()
        };

        let a = run_once();
        let b = run_once();
        assert_eq!(
            serde_json::to_string(&a.records).unwrap(),
            serde_json::to_string(&b.records).unwrap()
        );
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_hooks {
    use super::*;

    #[derive(Default)]
    struct Counting {
        starts: usize,
        steps:  Vec<u64>,
        ends:   usize,
    }

    impl RunObserver for Counting {
        fn on_run_start(&mut self) {
            self.starts += 1;
        }
        fn on_step(&mut self, record: &StepRecord) {
            self.steps.push(record.index);
        }
        fn on_run_end(&mut self, _report: &crate::RunReport) {
            self.ends += 1;
        }
    }

    #[test]
    fn hooks_fire_in_order_and_match_the_trace() {
        let component = Component::new(
            "obs",
            ComponentKind::Synchronous,
            state(&[("n", 0)]),
            vec![],
            vec![],
            vec![Task::synchronous("t", Vec::<String>::new(), add_to("n", 1))],
        )
        .unwrap();
        let mut cfg = RunConfig::new();
        cfg.max_rounds = Some(4);
        let mut exec = SyncExecutor::new(component, NoInputs, cfg).unwrap();

        let mut obs = Counting::default();
        let report = exec.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 1);
        assert_eq!(obs.ends, 1);
        assert_eq!(obs.steps, vec![1, 2, 3, 4]);
        assert_eq!(report.records.len(), 4);
    }
}
