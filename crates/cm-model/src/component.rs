//! The component model: named state, declared I/O, and a task list.

use std::collections::HashSet;

use cm_core::{StateMap, Value};

use crate::{ModelError, ModelResult, Task, Trigger};

/// Which execution model a component runs under.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    /// Deterministic dependency-ordered rounds.
    Synchronous,
    /// Discrete-event simulation over simulated time.
    EventDriven,
}

/// A component: a named bundle of state, inputs, outputs, and tasks.
///
/// Built once by the (external) parser or by hand, validated in
/// [`Component::new`], then read/write-shared with one executor for the
/// duration of a run.  `state` and `outputs` are the live maps the executor
/// mutates; the declared initial state is cloned in, never mutated.
#[derive(Debug)]
pub struct Component {
    pub name:         String,
    pub kind:         ComponentKind,
    /// Live state, seeded from the declared initial values.
    pub state:        StateMap,
    /// Declared input names, in declaration order.
    pub input_names:  Vec<String>,
    /// Declared output names, in declaration order.
    pub output_names: Vec<String>,
    /// Live output accumulator, one `Null` slot per declared output.
    pub outputs:      StateMap,
    tasks:            Vec<Task>,
}

impl Component {
    /// Build and validate a component.
    ///
    /// Definition errors — duplicate task names, unknown or cyclic
    /// dependencies, a trigger on a synchronous task, a missing trigger or
    /// dependencies on an event-driven task, a non-positive periodic
    /// interval — are all rejected here, before any executor sees the
    /// component.
    pub fn new(
        name:         impl Into<String>,
        kind:         ComponentKind,
        initial_state: StateMap,
        input_names:  Vec<String>,
        output_names: Vec<String>,
        tasks:        Vec<Task>,
    ) -> ModelResult<Self> {
        let name = name.into();
        validate_tasks(&name, kind, &tasks)?;

        let outputs = output_names
            .iter()
            .map(|n| (n.clone(), Value::Null))
            .collect();

        Ok(Component {
            name,
            kind,
            state: initial_state,
            input_names,
            output_names,
            outputs,
            tasks,
        })
    }

    /// The component's tasks, in declaration order.
    #[inline]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Declaration index of the task named `name`.
    pub fn task_index(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

fn validate_tasks(component: &str, kind: ComponentKind, tasks: &[Task]) -> ModelResult<()> {
    let mut names: HashSet<&str> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !names.insert(&task.name) {
            return Err(ModelError::DuplicateTask(task.name.clone()));
        }
    }

    for task in tasks {
        match kind {
            ComponentKind::Synchronous => {
                if task.trigger.is_some() {
                    return Err(ModelError::UnexpectedTrigger(task.name.clone()));
                }
                for dep in &task.depends_on {
                    if !names.contains(dep.as_str()) {
                        return Err(ModelError::UnknownDependency {
                            task:       task.name.clone(),
                            dependency: dep.clone(),
                        });
                    }
                }
            }
            ComponentKind::EventDriven => {
                if !task.depends_on.is_empty() {
                    return Err(ModelError::UnexpectedDependencies(task.name.clone()));
                }
                match &task.trigger {
                    None => return Err(ModelError::MissingTrigger(task.name.clone())),
                    Some(Trigger::Periodic { interval }) => {
                        if !interval.is_finite() || *interval <= 0.0 {
                            return Err(ModelError::InvalidInterval {
                                task:     task.name.clone(),
                                interval: *interval,
                            });
                        }
                    }
                    Some(_) => {}
                }
            }
        }
    }

    if kind == ComponentKind::Synchronous && has_cycle(tasks) {
        return Err(ModelError::DependencyCycle(component.to_string()));
    }
    Ok(())
}

/// Iterative three-color DFS over the `depends_on` graph.
fn has_cycle(tasks: &[Task]) -> bool {
    #[derive(Copy, Clone, PartialEq)]
    enum Mark {
        White,
        Gray,
        Black,
    }

    let index_of = |name: &str| tasks.iter().position(|t| t.name == name);
    let mut marks = vec![Mark::White; tasks.len()];

    for start in 0..tasks.len() {
        if marks[start] != Mark::White {
            continue;
        }
        // (node, next dependency position) pairs form the explicit stack.
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::Gray;

        while let Some(&(node, next)) = stack.last() {
            let deps = &tasks[node].depends_on;
            if next < deps.len() {
                stack.last_mut().expect("stack is non-empty").1 += 1;
                let dep = index_of(&deps[next]).expect("dependencies validated to exist");
                match marks[dep] {
                    Mark::Gray => return true,
                    Mark::White => {
                        marks[dep] = Mark::Gray;
                        stack.push((dep, 0));
                    }
                    Mark::Black => {}
                }
            } else {
                marks[node] = Mark::Black;
                stack.pop();
            }
        }
    }
    false
}
