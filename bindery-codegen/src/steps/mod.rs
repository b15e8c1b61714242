//! Built-in generation steps.
//!
//! Each step is an independent pass over the marked elements of a round.
//! They share nothing but the emitter, and run in the order returned by
//! [`builtin`].

mod bindable;
mod expressions;
mod method_adapters;

pub use bindable::BindableStep;
pub use expressions::ExpressionStep;
pub use method_adapters::MethodAdapterStep;

use crate::processor::Step;

/// The built-in steps in execution order.
pub fn builtin() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(MethodAdapterStep::new()),
        Box::new(ExpressionStep::new()),
        Box::new(BindableStep::new()),
    ]
}
