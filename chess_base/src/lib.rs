//! # Base types for arbiter
//!
//! This is an auxiliary crate for `arbiter`, which contains the plain value types of the rules
//! engine. It was split from the main crate, so everything declared here can be used in the
//! build script for `arbiter`.
//!
//! Normally you don't want to use this crate directly. Use `arbiter` instead, which re-exports
//! everything from here.

pub mod geometry;
pub mod types;
