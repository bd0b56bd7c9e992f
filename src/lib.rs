//! Alumni Connect - outreach service for students
//!
//! Turns a student's profile and objective into a people search (Gemini
//! writes the query, Linkd runs it), drafts one personalized message per
//! profile, and can send those messages through an automated LinkedIn browser.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{merge_results, OutreachDispatcher, OutreachPipeline, LoginPolicy};
pub use models::{OutreachMessage, SearchResponse, UiState, UserProfile, UserResult};
pub use routes::{configure_routes, AppState};
