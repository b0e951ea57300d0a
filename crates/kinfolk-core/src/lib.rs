//! Kinfolk Core Types and Definitions
//!
//! This crate provides the foundational types for Kinfolk family charts.
//! It includes:
//!
//! - **Identifiers**: String-interned person identifiers ([`identifier::PersonId`])
//! - **Colors**: CSS color handling for chart styling ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **People**: The person model and its spouse links ([`person`] module)
//! - **Records**: Raw tabular rows before normalization ([`record::PersonRecord`])
//! - **Store**: The relationship store answering structural queries ([`store`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod person;
pub mod record;
pub mod store;
