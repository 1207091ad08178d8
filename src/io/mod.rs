//! Readers for external inputs

pub mod metadata;
