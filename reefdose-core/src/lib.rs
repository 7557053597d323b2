pub mod assembler;
pub mod config;
pub mod corrector;
pub mod engine;
pub mod error;
pub mod gate;
pub mod potency;
pub mod presentation;
pub mod trend;
