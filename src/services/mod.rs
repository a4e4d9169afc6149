//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and upstream calls so route handlers can
//! stay focused on protocol translation and status mapping.

pub mod fact_check;
pub mod speech;
pub mod video;
pub mod video_stream;
