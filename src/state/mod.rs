//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `UnitState`: Tracks the state of one identity's crawl unit (pending, fetching, recorded, etc.)

mod unit_state;

pub use unit_state::UnitState;
