//! Top-level program runs.
//!
//! A run starts from the empty environment and hands the final value, type
//! and environment back to the caller. Errors abort the run and surface here
//! unchanged.

use crate::config::EvalConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::{Evaluated, Evaluator};
use crate::output::Output;
use stimpl_types::Expr;

/// Run a program, printing to standard output.
pub fn run(program: &Expr) -> EvalResult<Evaluated> {
    run_with(&mut Evaluator::new(), program)
}

/// Run a program and return the printed lines alongside the result.
pub fn run_captured(program: &Expr, config: &EvalConfig) -> EvalResult<(Evaluated, Vec<String>)> {
    let mut evaluator = Evaluator::with_config(config, Vec::new());
    let result = run_with(&mut evaluator, program)?;
    Ok((result, evaluator.into_output()))
}

/// Run a program on a caller-supplied evaluator.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run_with<O: Output>(evaluator: &mut Evaluator<O>, program: &Expr) -> EvalResult<Evaluated> {
    let result = evaluator.evaluate(program, Environment::empty());

    match &result {
        Ok(done) if evaluator.debug() => {
            tracing::debug!(program = %program, "program");
            tracing::debug!(value = %done.value, ty = %done.ty(), "final_value");
            tracing::debug!(state = %done.env, gas = evaluator.gas_used(), "final_state");
        }
        Ok(_) => {}
        Err(err) => tracing::debug!(error = %err, "run aborted"),
    }

    result
}

/// Load a program from its JSON form.
///
/// Malformed JSON and node kinds outside the known set are syntax errors.
pub fn load_program(json: &str) -> EvalResult<Expr> {
    serde_json::from_str(json).map_err(|e| EvalError::Syntax(format!("Unhandled! {e}")))
}
