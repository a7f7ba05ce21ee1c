//! Catch-line hit tests
//!
//! The two tests are deliberately asymmetric, matching observed gameplay:
//! drops compare the bucket's left edge to the drop's left edge with a
//! strict distance tolerance, while stones use true interval overlap
//! against the bucket's full span. Do not unify them.

use crate::consts::{CATCH_TOLERANCE, OBJECT_WIDTH};

/// A drop landing at the catch line counts as caught when the bucket's
/// left edge is strictly within the tolerance of the drop's left edge.
pub fn drop_caught(bucket_position: f32, drop_x: f32) -> bool {
    (bucket_position - drop_x).abs() < CATCH_TOLERANCE
}

/// A stone hits when its span `[x, x + 32]` overlaps the bucket's span
/// `[position, position + width]`, both bounds strict.
pub fn stone_hits_bucket(bucket_position: f32, bucket_width: f32, stone_x: f32) -> bool {
    stone_x + OBJECT_WIDTH > bucket_position && stone_x < bucket_position + bucket_width
}
