//! Frame submission seam: the draw-batching protocol and the sink trait
//! GPU backends implement.
//!
//! # Invariants
//! - Draw order and first-instance offsets come from the same layout
//!   table the scene packed from; the batcher never re-derives ordering.
//! - A sink consumes one snapshot per tick and must not retain it.

mod submit;

pub use submit::{
    DrawCall, FrameSink, ProjectionConfig, RecordedFrame, RecordingSink, SubmitError, batch_draws,
};
