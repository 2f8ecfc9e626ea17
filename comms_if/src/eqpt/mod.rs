//! # Equipment module

pub mod actuator;
