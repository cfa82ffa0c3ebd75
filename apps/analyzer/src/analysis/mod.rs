// Resume analysis: the three-agent pipeline, its run-state tracker, and HTTP handlers.

pub mod handlers;
pub mod pipeline;
pub mod tracker;
