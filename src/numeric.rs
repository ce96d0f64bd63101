//! Basic numerical concepts used throughout the program

#![allow(missing_docs)]

// Floating-point precision is configured here
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// Number of MeV in a GeV, used when converting at the store boundary and
/// when a histogram axis is expressed in GeV
pub const MEV_PER_GEV: Float = 1000.;
