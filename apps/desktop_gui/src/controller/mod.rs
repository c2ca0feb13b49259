//! Controller layer: UI events, error modeling and the reconciler-driven
//! command orchestration.

pub mod events;
pub mod orchestration;
