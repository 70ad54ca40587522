//! # FitCoach Core
//!
//! Domain types and pure scheduling logic for the FitCoach coaching service.
//! Nothing in this crate performs I/O; persistence lives in `fitcoach-db` and
//! the HTTP surface in `fitcoach-api`.
//!
//! - [`models`]: calendar events, chat delivery state, sessions, workout drafts
//! - [`calendar`]: overlap detection, conflict marking, column packing,
//!   recurrence expansion and duplicate suppression
//! - [`errors`]: the shared error taxonomy

pub mod calendar;
pub mod errors;
pub mod models;
