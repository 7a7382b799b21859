// error.rs - Drop construction and texturing errors

use thiserror::Error;

use crate::shape::DropKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DropError {
    #[error("radius must be positive, got {radius}")]
    InvalidRadius { radius: u32 },

    #[error("radius range [{lo}, {hi}] is unusable (need 0 < lo <= hi)")]
    InvalidRange { lo: u32, hi: u32 },

    #[error("label map is {label:?} but alpha map is {alpha:?}")]
    DimensionMismatch {
        label: (usize, usize),
        alpha: (usize, usize),
    },

    #[error("label map of {rows}x{cols} is too small to infer a radius (need at least 4x4)")]
    LabelTooSmall { rows: usize, cols: usize },

    #[error("no shape generator for drop kind {0:?}")]
    UnsupportedShape(DropKind),

    /// Sizes are (width, height).
    #[error("background is {got:?} but the drop needs at least {needed:?}")]
    BackgroundTooSmall {
        needed: (u32, u32),
        got: (u32, u32),
    },

    #[error("pixel buffer holds {got} bytes, expected {expected}")]
    BufferSize { expected: usize, got: usize },

    #[error("invalid config: {0}")]
    Config(String),
}

pub type DropResult<T> = Result<T, DropError>;
