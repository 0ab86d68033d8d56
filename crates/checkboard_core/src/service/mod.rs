//! Core use-case services.
//!
//! # Responsibility
//! - Combine the board engine with its store and prompter collaborators.
//! - Keep presentation layers decoupled from persistence details.

pub mod board_service;
