//! Shared primitives: coordinates and canvas constants, errors and spherical math.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
