//! The event loop state: raw input, the debounced pipeline, the published
//! output and the collapse flags of the tree view.

use std::time::Duration;

use tracing::debug;

use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::tree::{self, CollapseState, KeyOrder, TreeLine, TreePath};
use crate::validator::{validate, JsonError, Validation};
use crate::value::JsonValue;

/// What the display layer shows. At most one of the formatted text and the
/// error is present; both are absent for blank input.
#[derive(Debug, Clone, Default)]
pub struct Output {
    formatted: String,
    value: Option<JsonValue>,
    error: Option<JsonError>,
}

impl Output {
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    pub fn value(&self) -> Option<&JsonValue> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&JsonError> {
        self.error.as_ref()
    }

    pub fn error_text(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_none() && self.error.is_none()
    }
}

impl From<Validation> for Output {
    fn from(validation: Validation) -> Self {
        match validation {
            Validation::Empty => Self::default(),
            Validation::Valid(formatted) => Self {
                formatted: formatted.text,
                value: Some(formatted.value),
                error: None,
            },
            Validation::Invalid(err) => Self {
                formatted: String::new(),
                value: None,
                error: Some(err),
            },
        }
    }
}

pub struct Session<C = SystemClock> {
    clock: C,
    input: String,
    pending: Debouncer<String>,
    output: Output,
    collapsed: CollapseState,
    key_order: KeyOrder,
    passes: u64,
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C, quiet: Duration) -> Self {
        Self {
            clock,
            input: String::new(),
            pending: Debouncer::new(quiet),
            output: Output::default(),
            collapsed: CollapseState::default(),
            key_order: KeyOrder::default(),
            passes: 0,
        }
    }

    pub fn with_key_order(mut self, order: KeyOrder) -> Self {
        self.key_order = order;
        self
    }

    pub fn set_key_order(&mut self, order: KeyOrder) {
        self.key_order = order;
    }

    pub fn key_order(&self) -> KeyOrder {
        self.key_order
    }

    /// Records new input and (re)arms the quiet period.
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.input.clone_from(&text);
        self.pending.arm(text, self.clock.now());
    }

    /// Runs the pipeline if the quiet period has elapsed. Returns whether a
    /// pass ran.
    pub fn tick(&mut self) -> bool {
        match self.pending.poll(self.clock.now()) {
            Some(text) => {
                self.run(&text);
                true
            }
            None => false,
        }
    }

    /// Runs a pending pass immediately.
    pub fn flush(&mut self) -> bool {
        match self.pending.flush() {
            Some(text) => {
                self.run(&text);
                true
            }
            None => false,
        }
    }

    /// Replaces the input and validates it without waiting.
    pub fn submit(&mut self, text: impl Into<String>) {
        self.pending.cancel();
        self.input = text.into();
        let text = self.input.clone();
        self.run(&text);
    }

    fn run(&mut self, text: &str) {
        let validation = validate(text);
        debug!(
            bytes = text.len(),
            valid = validation.is_valid(),
            "validated input"
        );
        let output = Output::from(validation);
        if output.value() != self.output.value() {
            self.collapsed.clear();
        }
        self.output = output;
        self.passes += 1;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Number of validate/format passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn collapse_state(&self) -> &CollapseState {
        &self.collapsed
    }

    pub fn toggle(&mut self, path: &TreePath) -> bool {
        self.collapsed.toggle(path)
    }

    /// Sets a node's flag. Returns false when `path` does not name a
    /// container in the current value.
    pub fn set_collapsed(&mut self, path: &TreePath, collapsed: bool) -> bool {
        let is_container = self
            .output
            .value()
            .and_then(|value| path.resolve(value))
            .is_some_and(JsonValue::is_container);
        if is_container {
            self.collapsed.set(path.clone(), collapsed);
        }
        is_container
    }

    pub fn tree(&self) -> Vec<TreeLine> {
        self.output
            .value()
            .map(|value| tree::render(value, &self.collapsed, self.key_order))
            .unwrap_or_default()
    }
}
