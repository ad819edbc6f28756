//! Overlap removal passes
//!
//! An overlap removal algorithm moves sized rectangles, keyed by whatever
//! owns them, until every pair with a positive area is separated by at least
//! the configured horizontal gap horizontally or the vertical gap vertically.
//! Keys and sizes are left untouched.

mod scan;

pub use scan::ScanOverlapRemoval;

use crate::parameters::{assign, Parameters};
use crate::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by overlap removal passes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlapError {
    #[error("the {field:?} gap must be a finite, non-negative number (got {value})")]
    InvalidGap { field: OverlapField, value: f64 },

    #[error("rectangle {0:?} has a non-finite or negative geometry")]
    InvalidRectangle(Rect),

    #[error("the overlap removal has not been initialized")]
    NotInitialized,
}

/// Directions rectangles may be moved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapAxis {
    /// Pick, for each conflict, whichever direction moves the rectangle less
    #[default]
    Both,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapField {
    HorizontalGap,
    VerticalGap,
    Axis,
}

/// Minimum gaps to keep between rectangles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapParameters {
    horizontal_gap: f64,
    vertical_gap: f64,
    axis: OverlapAxis,
}

impl Default for OverlapParameters {
    fn default() -> Self {
        Self {
            horizontal_gap: 10.0,
            vertical_gap: 10.0,
            axis: OverlapAxis::Both,
        }
    }
}

fn check_gap(field: OverlapField, value: f64) -> Result<f64, OverlapError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(OverlapError::InvalidGap { field, value })
    }
}

impl OverlapParameters {
    /// # Errors
    /// Gaps must be finite and non-negative
    pub fn new(horizontal_gap: f64, vertical_gap: f64) -> Result<Self, OverlapError> {
        Ok(Self {
            horizontal_gap: check_gap(OverlapField::HorizontalGap, horizontal_gap)?,
            vertical_gap: check_gap(OverlapField::VerticalGap, vertical_gap)?,
            axis: OverlapAxis::Both,
        })
    }

    pub fn with_axis(mut self, axis: OverlapAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn horizontal_gap(&self) -> f64 {
        self.horizontal_gap
    }

    pub fn vertical_gap(&self) -> f64 {
        self.vertical_gap
    }

    pub fn axis(&self) -> OverlapAxis {
        self.axis
    }

    pub fn set_horizontal_gap(&mut self, gap: f64) -> Result<Option<OverlapField>, OverlapError> {
        let gap = check_gap(OverlapField::HorizontalGap, gap)?;
        Ok(assign(&mut self.horizontal_gap, gap, OverlapField::HorizontalGap))
    }

    pub fn set_vertical_gap(&mut self, gap: f64) -> Result<Option<OverlapField>, OverlapError> {
        let gap = check_gap(OverlapField::VerticalGap, gap)?;
        Ok(assign(&mut self.vertical_gap, gap, OverlapField::VerticalGap))
    }

    pub fn set_axis(&mut self, axis: OverlapAxis) -> Option<OverlapField> {
        assign(&mut self.axis, axis, OverlapField::Axis)
    }

    /// Check the gaps again, e.g. after deserializing
    pub fn validate(&self) -> Result<(), OverlapError> {
        check_gap(OverlapField::HorizontalGap, self.horizontal_gap)?;
        check_gap(OverlapField::VerticalGap, self.vertical_gap)?;
        Ok(())
    }
}

impl Parameters for OverlapParameters {
    type Field = OverlapField;
}

/// A pass removing overlaps between sized rectangles
pub trait OverlapRemovalAlgorithm<K> {
    /// # Errors
    /// Fails on invalid parameters or rectangles, leaving the algorithm
    /// uninitialized
    fn initialize(
        &mut self,
        rectangles: HashMap<K, Rect>,
        parameters: OverlapParameters,
    ) -> Result<(), OverlapError>;

    /// Move the rectangles until none overlap
    ///
    /// # Errors
    /// Returns [`OverlapError::NotInitialized`] when called before
    /// [`OverlapRemovalAlgorithm::initialize`].
    fn compute(&mut self) -> Result<(), OverlapError>;

    /// The rectangles, at their adjusted positions once computed
    fn rectangles(&self) -> &HashMap<K, Rect>;
}

/// Whether the two rectangles are separated by at least one of the gaps
///
/// Rectangles without area never conflict with anything.
pub fn separated(a: &Rect, b: &Rect, horizontal_gap: f64, vertical_gap: f64) -> bool {
    const EPSILON: f64 = 1e-9;
    !a.has_area()
        || !b.has_area()
        || a.horizontal_separation(b) >= horizontal_gap - EPSILON
        || a.vertical_separation(b) >= vertical_gap - EPSILON
}
