//! thermostat — smallest example for the rust_cm component framework.
//!
//! Runs the same domain through both execution models:
//!
//! 1. A synchronous moving-average filter over noisy temperature samples,
//!    ten dependency-ordered rounds, trace exported to CSV.
//! 2. An event-driven thermostat: a periodic drift task cools the room, a
//!    condition trigger detects "too cold" and fires the heater through an
//!    emitted event, trace exported as JSON Lines.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use cm_core::{RunConfig, StateMap};
use cm_engine::{EventExecutor, SyncExecutor};
use cm_model::{
    ActionError, Component, ComponentKind, InputSpec, RandomInputs, Task, TaskContext, Trigger,
};
use cm_output::{CsvTraceWriter, JsonLinesWriter, RunLogObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64 = 42;
const FILTER_ROUNDS:  u64 = 10;
const WINDOW:         usize = 4;
const SIM_SECONDS:    f64 = 20.0;
const DRIFT_INTERVAL: f64 = 1.0;
const COLD_THRESHOLD: f64 = 19.0;

fn f64_state(ctx: &TaskContext, key: &str) -> f64 {
    ctx.state(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

// ── Synchronous mode: moving-average filter ───────────────────────────────────

fn build_filter() -> Result<Component> {
    let mut state = StateMap::new();
    state.insert("window".into(), json!([]));

    let ingest = Task::synchronous(
        "ingest",
        Vec::<String>::new(),
        |ctx: &mut TaskContext| -> Result<(), ActionError> {
            let sample = ctx.input("sample").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let mut window = ctx
                .state("window")
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            window.push(json!(sample));
            if window.len() > WINDOW {
                window.remove(0);
            }
            ctx.set_state("window", serde_json::Value::Array(window));
            Ok(())
        },
    );

    let average = Task::synchronous(
        "average",
        ["ingest"],
        |ctx: &mut TaskContext| -> Result<(), ActionError> {
            let window = ctx
                .state("window")
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            let sum: f64 = window.iter().filter_map(|v| v.as_f64()).sum();
            let mean = if window.is_empty() { 0.0 } else { sum / window.len() as f64 };
            ctx.set_output("mean", mean);
            Ok(())
        },
    );

    Ok(Component::new(
        "filter",
        ComponentKind::Synchronous,
        state,
        vec!["sample".into()],
        vec!["mean".into()],
        vec![ingest, average],
    )?)
}

fn run_filter(out_dir: &Path) -> Result<()> {
    let component = build_filter()?;

    let mut specs = indexmap::IndexMap::new();
    specs.insert("sample".to_string(), InputSpec::Float { min: 15.0, max: 25.0 });
    let inputs = RandomInputs::new(specs, SEED);

    let mut config = RunConfig::new();
    config.max_rounds = Some(FILTER_ROUNDS);
    config.track_task_order = true;

    let writer = CsvTraceWriter::new(&out_dir.join("filter_trace.csv"), &component)?;
    let mut obs = RunLogObserver::new(writer);

    let mut exec = SyncExecutor::new(component, inputs, config)?;
    let report = exec.run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        return Err(e.into());
    }

    println!(
        "filter: {} rounds, stopped because {}, final mean = {}",
        report.rounds,
        report.stop,
        report.final_outputs.get("mean").unwrap_or(&json!(null)),
    );
    Ok(())
}

// ── Event-driven mode: thermostat ─────────────────────────────────────────────

fn build_thermostat() -> Result<Component> {
    let mut state = StateMap::new();
    state.insert("temp".into(), json!(21.0));
    state.insert("heater_cycles".into(), json!(0));

    let drift = Task::event_driven(
        "drift",
        Trigger::Periodic { interval: DRIFT_INTERVAL },
        |ctx: &mut TaskContext| -> Result<(), ActionError> {
            let temp = f64_state(ctx, "temp");
            ctx.set_state("temp", temp - 0.7);
            Ok(())
        },
    );

    let too_cold = Task::event_driven(
        "too_cold",
        Trigger::on_condition(|s| {
            s.get("temp").and_then(|v| v.as_f64()).unwrap_or(f64::MAX) < COLD_THRESHOLD
        }),
        |ctx: &mut TaskContext| -> Result<(), ActionError> {
            let temp = f64_state(ctx, "temp");
            ctx.emit("heat", json!({ "observed": temp }), 0.0, 0)?;
            Ok(())
        },
    );

    let heater = Task::event_driven(
        "heater",
        Trigger::on_event("heat"),
        |ctx: &mut TaskContext| -> Result<(), ActionError> {
            let temp = f64_state(ctx, "temp");
            let cycles = ctx.state("heater_cycles").and_then(|v| v.as_i64()).unwrap_or(0);
            let observed = ctx.event_payload()["observed"].clone();
            ctx.set_state("temp", temp + 3.0);
            ctx.set_state("heater_cycles", cycles + 1);
            ctx.set_output("last_heat_observed", observed);
            Ok(())
        },
    );

    Ok(Component::new(
        "thermostat",
        ComponentKind::EventDriven,
        state,
        vec![],
        vec!["last_heat_observed".into()],
        vec![drift, too_cold, heater],
    )?)
}

fn run_thermostat(out_dir: &Path) -> Result<()> {
    let component = build_thermostat()?;

    let mut config = RunConfig::new();
    config.max_time = Some(SIM_SECONDS);
    config.max_workers = Some(2);

    let writer = JsonLinesWriter::from_path(&out_dir.join("thermostat_trace.jsonl"))?;
    let mut obs = RunLogObserver::new(writer);

    let mut exec = EventExecutor::new(component, config)?;
    let report = exec.run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        return Err(e.into());
    }

    println!(
        "thermostat: {} events over {}, stopped because {}, heater ran {} times",
        report.events,
        report.final_time,
        report.stop,
        report.final_state.get("heater_cycles").unwrap_or(&json!(0)),
    );
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = Path::new("./output");
    std::fs::create_dir_all(out_dir)?;

    run_filter(out_dir)?;
    run_thermostat(out_dir)?;
    Ok(())
}
