//! Afterlife Triage - Bereavement Questionnaire Engine
//!
//! This crate implements the branching triage questionnaire a bereaved
//! person answers before receiving practical guidance: a validated question
//! graph, a wizard controller with back navigation and resumable sessions,
//! and postcode-based UK jurisdiction resolution.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
