//! Reference problem domains used to exercise the engine.

pub mod drift;
