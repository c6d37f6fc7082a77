//! Topological task ordering for synchronous components.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use cm_model::{Component, ModelError};

use crate::EngineResult;

/// Compute a topological order over the `depends_on` relation, as task
/// indices into `component.tasks()`.
///
/// Kahn's algorithm with the ready set held in a min-heap of declaration
/// indices: tasks with no relative ordering constraint come out in
/// declaration order, so the result is the *same* valid order on every run
/// of the same component.
///
/// Cycles are caught at component construction, but the engine refuses them
/// here too rather than looping forever on a hand-built task list.
pub fn topological_order(component: &Component) -> EngineResult<Vec<usize>> {
    let tasks = component.tasks();
    let index_of: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    // dependents[d] = tasks that must wait for d; in_degree[t] = unmet deps.
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    let mut in_degree: Vec<usize> = vec![0; tasks.len()];
    for (i, task) in tasks.iter().enumerate() {
        for dep in &task.depends_on {
            let d = index_of[dep.as_str()];
            dependents[d].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(tasks.len());
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        for &dep in &dependents[i] {
            in_degree[dep] -= 1;
            if in_degree[dep] == 0 {
                ready.push(Reverse(dep));
            }
        }
    }

    if order.len() != tasks.len() {
        return Err(ModelError::DependencyCycle(component.name.clone()).into());
    }
    Ok(order)
}
