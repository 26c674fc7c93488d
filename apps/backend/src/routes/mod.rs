//! HTTP handlers

pub mod catalog;
pub mod flashcards;
pub mod plan;
pub mod progress;
