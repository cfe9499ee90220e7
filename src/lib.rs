//! Solara - Astrological State Engine
//!
//! This crate turns raw ecliptic longitudes into structured chart data,
//! detects aspects within and between charts, locates solar-return moments
//! by root-finding, ranks which bodies a yearly cycle activates, and caches
//! generated interpretations under a per-subject annual budget.
//!
//! Ephemeris computation and narrative text generation are external
//! collaborators behind ports; the engine owns the semantics in between.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
