//! Update-queue replay scripts
//!
//! A script enqueues updates on a host root and runs a sequence of render
//! passes at chosen priorities, committing or abandoning each one. It is
//! what the `fiber-replay` binary executes, and a compact way to exercise
//! skip-and-rebase behaviour end to end.
//!
//! ```json
//! {
//!   "base_state": "",
//!   "updates": [
//!     { "priority": 1, "kind": "append", "payload": "A", "callback": "a" },
//!     { "priority": 2, "kind": "append", "payload": "B" }
//!   ],
//!   "passes": [{ "priority": 1 }, { "priority": 2 }]
//! }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::error::ReconcileError;
use crate::fiber::{ExpirationTime, FiberArena, FiberRoot};
use crate::host::HostNodeId;
use crate::update_queue::{
    commit_update_queue, enqueue_update, process_update_queue, ProcessState, Update, UpdateTag,
};
use crate::util::config::ReconcilerConfig;
use crate::value::{Function, Value};

/// How a scripted update changes the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    /// Shallow-merge the payload
    Merge,
    /// Replace the state with the payload
    Replace,
    /// Concatenate the payload onto a string state, or push it onto a list
    Append,
    /// Force a re-render without changing state
    Force,
}

/// One scripted update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptUpdate {
    pub priority: u32,
    pub kind: UpdateKind,
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Label recorded when the callback fires
    #[serde(default)]
    pub callback: Option<String>,
}

/// One scripted render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptPass {
    pub priority: u32,
    #[serde(default = "default_commit")]
    pub commit: bool,
    #[serde(default)]
    pub abandon: bool,
    /// Updates enqueued right before this pass
    #[serde(default)]
    pub updates: Vec<ScriptUpdate>,
}

fn default_commit() -> bool {
    true
}

/// A complete replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub base_state: serde_json::Value,
    #[serde(default)]
    pub updates: Vec<ScriptUpdate>,
    #[serde(default)]
    pub passes: Vec<ScriptPass>,
}

impl Script {
    pub fn from_json_str(input: &str) -> Result<Self, ReplayError> {
        serde_json::from_str(input).map_err(ReplayError::Parse)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = fs::read_to_string(path).map_err(ReplayError::Io)?;
        Self::from_json_str(&content)
    }
}

/// What happened to a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Committed; labels of the callbacks that fired, in order
    Committed(Vec<String>),
    Abandoned,
}

/// Result of one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub index: usize,
    pub priority: ExpirationTime,
    pub state: Value,
    pub base_state: Value,
    pub remaining: ExpirationTime,
    pub force_update: bool,
    pub outcome: PassOutcome,
}

impl fmt::Display for PassReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "pass {} @ {}: state = {}, base = {}, remaining = {}",
            self.index, self.priority, self.state, self.base_state, self.remaining
        )?;
        if self.force_update {
            write!(f, ", forced")?;
        }
        match &self.outcome {
            PassOutcome::Committed(fired) if fired.is_empty() => write!(f, " [committed]"),
            PassOutcome::Committed(fired) => write!(f, " [committed, fired {}]", fired.join(", ")),
            PassOutcome::Abandoned => write!(f, " [abandoned]"),
        }
    }
}

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script: {0}")]
    Io(std::io::Error),

    #[error("Failed to parse script: {0}")]
    Parse(serde_json::Error),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

fn append_payload(payload: Value) -> Function {
    Function::new("append", move |args: &[Value]| {
        let previous = args.first().cloned().unwrap_or(Value::Null);
        match previous {
            Value::List(mut items) => {
                items.push(payload.clone());
                Value::List(items)
            }
            Value::Null => match &payload {
                Value::String(_) => payload.clone(),
                other => Value::List(vec![other.clone()]),
            },
            other => Value::from(format!("{}{}", other.to_host_string(), payload.to_host_string())),
        }
    })
}

fn build_update(
    scripted: &ScriptUpdate,
    fired: &Rc<RefCell<Vec<String>>>,
) -> Update {
    let payload = Value::from(scripted.payload.clone());
    let update = Update::new(ExpirationTime::new(scripted.priority));
    let update = match scripted.kind {
        UpdateKind::Merge => update.with_payload(payload),
        UpdateKind::Replace => update.with_tag(UpdateTag::ReplaceState).with_payload(payload),
        UpdateKind::Append => update
            .with_tag(UpdateTag::ReplaceState)
            .with_payload(append_payload(payload)),
        UpdateKind::Force => update.with_tag(UpdateTag::ForceUpdate),
    };
    match &scripted.callback {
        Some(label) => {
            let log = Rc::clone(fired);
            let label = label.clone();
            update.with_callback(Function::new(label.clone(), move |_: &[Value]| {
                log.borrow_mut().push(label.clone());
                Value::Null
            }))
        }
        None => update,
    }
}

/// Run `script` against a fresh host root.
pub fn run_script(
    script: &Script,
    config: &ReconcilerConfig,
) -> Result<Vec<PassReport>, ReplayError> {
    let mut arena = FiberArena::from_config(config);
    let mut root = FiberRoot::new(&mut arena, HostNodeId(0), config);
    arena
        .get_mut(root.current())?
        .set_memoized_state(Value::from(script.base_state.clone()));

    let fired = Rc::new(RefCell::new(Vec::new()));
    for scripted in &script.updates {
        enqueue_update(&mut arena, root.current(), build_update(scripted, &fired).into_ref())?;
    }

    let mut reports = Vec::with_capacity(script.passes.len());
    let mut state = ProcessState::new();
    for (index, pass) in script.passes.iter().enumerate() {
        for scripted in &pass.updates {
            enqueue_update(&mut arena, root.current(), build_update(scripted, &fired).into_ref())?;
        }

        let priority = ExpirationTime::new(pass.priority);
        let wip = root.create_work_in_progress(&mut arena, priority)?;
        process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, priority, &mut state)?;

        let fiber = arena.get(wip)?;
        let queue = fiber.update_queue().cloned();
        let base_state = queue
            .as_ref()
            .map(|q| q.borrow().base_state().clone())
            .unwrap_or(Value::Null);
        let mut report = PassReport {
            index,
            priority,
            state: fiber.memoized_state().clone(),
            base_state,
            remaining: fiber.expiration_time(),
            force_update: state.has_force_update,
            outcome: PassOutcome::Abandoned,
        };

        if pass.commit && !pass.abandon {
            fired.borrow_mut().clear();
            if let Some(queue) = &queue {
                commit_update_queue(&arena, wip, queue, &Value::Null)?;
            }
            root.commit(wip);
            report.outcome = PassOutcome::Committed(fired.borrow().clone());
        } else {
            root.abandon();
        }

        info!("{}", report);
        reports.push(report);
    }
    Ok(reports)
}
