//! Execution context for script variables, stacks and budget.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::ScriptEngine;
use crate::host::Actor;
use crate::result::{ScriptError, StackKind};
use crate::script::budget::Budget;
use crate::script::control::ConditionStack;
use crate::script::value::Value;
use crate::script::{condition, placeholder};

/// State of one top-level script execution.
///
/// A context is created per trigger by [`ScriptEngine::create_context`] and
/// dropped once the result is produced. Nested `include` calls run against
/// the same context, so they share variables, stacks and budget.
pub struct ScriptContext {
    engine: ScriptEngine,
    actor: Arc<dyn Actor>,
    variables: HashMap<String, Value>,
    result: Value,
    cancelled: bool,
    budget: Budget,
    data_stack: Vec<Value>,
    conditions: ConditionStack,
    include_depth: u32,
}

impl ScriptContext {
    pub(crate) fn new(
        engine: ScriptEngine,
        actor: Arc<dyn Actor>,
        variables: HashMap<String, Value>,
        command_limit: u32,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            engine,
            actor,
            variables,
            result: Value::Null,
            cancelled: false,
            budget: Budget::new(command_limit, timeout),
            data_stack: Vec::new(),
            conditions: ConditionStack::new(),
            include_depth: 0,
        }
    }

    /// The player the script runs as.
    pub fn actor(&self) -> &Arc<dyn Actor> {
        &self.actor
    }

    /// The engine that created this context.
    pub fn engine(&self) -> &ScriptEngine {
        &self.engine
    }

    /// All variables.
    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.variables
    }

    /// Get a variable.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Set a variable, replacing any previous value.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Remove a variable, returning its old value.
    pub fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    /// Last value produced by an executed line.
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// Overwrite the last value.
    pub fn set_result(&mut self, value: Value) {
        self.result = value;
    }

    /// Whether the script has been asked to stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stop after the current line. The execution still succeeds.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Count one command-like action against the budget.
    pub fn increment_command_count(&mut self) -> Result<(), ScriptError> {
        self.budget.charge_command()
    }

    /// Command-like actions performed so far.
    pub fn command_count(&self) -> u32 {
        self.budget.command_count()
    }

    /// Whether the wall-clock deadline has passed.
    pub fn is_timed_out(&self) -> bool {
        self.budget.is_timed_out()
    }

    /// Restart the deadline clock.
    pub fn reset_start_time(&mut self) {
        self.budget.reset_clock();
    }

    pub(crate) fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Push a value onto the data stack.
    pub fn push_data(&mut self, value: impl Into<Value>) {
        self.data_stack.push(value.into());
    }

    /// Pop the top of the data stack.
    pub fn pop_data(&mut self) -> Result<Value, ScriptError> {
        self.data_stack
            .pop()
            .ok_or(ScriptError::StackUnderflow(StackKind::Data))
    }

    /// Look at the top of the data stack.
    pub fn peek_data(&self) -> Result<&Value, ScriptError> {
        self.data_stack
            .last()
            .ok_or(ScriptError::StackUnderflow(StackKind::Data))
    }

    /// Number of values on the data stack.
    pub fn data_len(&self) -> usize {
        self.data_stack.len()
    }

    /// Open a conditional branch.
    pub fn push_condition(&mut self, taken: bool) {
        self.conditions.push(taken);
    }

    /// Close the innermost conditional branch.
    pub fn pop_condition(&mut self) -> Result<bool, ScriptError> {
        self.conditions.pop()
    }

    /// Flip the innermost conditional branch. No-op without an open branch.
    pub fn flip_condition(&mut self) -> bool {
        self.conditions.flip()
    }

    /// Innermost branch state; `None` when no `if` is open.
    pub fn peek_condition(&self) -> Option<bool> {
        self.conditions.peek()
    }

    /// Number of open `if` blocks.
    pub fn condition_depth(&self) -> usize {
        self.conditions.depth()
    }

    /// Whether lines are currently skipped by a false branch.
    pub fn is_skipping(&self) -> bool {
        self.conditions.is_skipping()
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut ConditionStack {
        &mut self.conditions
    }

    /// Current `include` nesting level (0 at top level).
    pub fn include_depth(&self) -> u32 {
        self.include_depth
    }

    pub(crate) fn enter_include(&mut self) {
        self.include_depth += 1;
    }

    pub(crate) fn leave_include(&mut self) {
        self.include_depth = self.include_depth.saturating_sub(1);
    }

    /// Substitute `{name}` placeholders in `text`.
    pub fn resolve(&self, text: &str) -> String {
        placeholder::resolve(text, self.actor.as_ref(), &self.variables)
    }

    /// Resolve placeholders in `text`, then evaluate it as a condition.
    pub fn evaluate_condition(&self, text: &str) -> bool {
        condition::evaluate(&self.resolve(text))
    }

    /// Extract all variables.
    pub fn into_variables(self) -> HashMap<String, Value> {
        self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{MemoryActor, MemoryServer};

    fn context() -> ScriptContext {
        let engine = ScriptEngine::builder(MemoryServer::new().host()).build();
        engine.create_context(Arc::new(MemoryActor::new("Steve")))
    }

    #[test]
    fn test_data_stack_is_lifo() {
        let mut ctx = context();
        ctx.push_data("first");
        ctx.push_data(2);
        assert_eq!(ctx.data_len(), 2);

        assert_eq!(ctx.pop_data().unwrap(), Value::Integer(2));
        assert_eq!(ctx.pop_data().unwrap(), Value::from("first"));
        assert_eq!(ctx.data_len(), 0);
    }

    #[test]
    fn test_peek_data_keeps_value() {
        let mut ctx = context();
        ctx.push_data("kept");
        assert_eq!(ctx.peek_data().unwrap(), &Value::from("kept"));
        assert_eq!(ctx.data_len(), 1);
        assert_eq!(ctx.pop_data().unwrap(), Value::from("kept"));
    }

    #[test]
    fn test_empty_data_stack_underflows() {
        let mut ctx = context();
        assert!(matches!(
            ctx.peek_data(),
            Err(ScriptError::StackUnderflow(StackKind::Data))
        ));
        assert!(matches!(
            ctx.pop_data(),
            Err(ScriptError::StackUnderflow(StackKind::Data))
        ));

        ctx.push_data(1);
        ctx.pop_data().unwrap();
        assert!(matches!(
            ctx.pop_data(),
            Err(ScriptError::StackUnderflow(StackKind::Data))
        ));
    }
}
