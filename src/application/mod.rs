//! Application layer: the evaluators invoked by the pricing pipeline and
//! the controllers backing the checkout widget.

pub mod evaluator;
pub mod remover;
pub mod widget;
