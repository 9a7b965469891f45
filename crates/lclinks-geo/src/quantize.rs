//! Grid quantization.
//!
//! Most archives partition the globe into fixed-size cells (10° for the
//! FROM_GLC 2015 and Hansen tree-cover tiles, 10° longitude strips for the
//! GLC_FCS30D zips). Resolving an AOI starts by snapping its bounds outward
//! to that grid, clamped to the axis range each archive actually covers.

/// Snap `value` to a multiple of `step`.
///
/// - `round_down`: `max(axis_min, floor(value / step) * step)`
/// - otherwise: `min(axis_max, floor((value + step - 1) / step) * step)`
///
/// The upward branch uses the integer-degree ceiling form, so a value just
/// above a grid line by less than one degree stays on that line
/// (`10.5` with step 10 maps to `10`).
pub fn quantize(value: f64, step: f64, axis_min: f64, axis_max: f64, round_down: bool) -> f64 {
    if round_down {
        axis_min.max((value / step).floor() * step)
    } else {
        axis_max.min(((value + step - 1.0) / step).floor() * step)
    }
}

/// One quantized axis: its step and the range the archive covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAxis {
    /// Lowest grid line.
    pub min: f64,
    /// Highest grid line.
    pub max: f64,
    /// Grid step in degrees.
    pub step: f64,
}

impl GridAxis {
    /// Full longitude range on a 10° grid.
    pub const LON_10: GridAxis = GridAxis::new(-180.0, 180.0, 10.0);

    /// Create an axis description.
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Snap a lower bound down.
    pub fn floor(&self, value: f64) -> i32 {
        quantize(value, self.step, self.min, self.max, true) as i32
    }

    /// Snap an upper bound up.
    pub fn ceil(&self, value: f64) -> i32 {
        quantize(value, self.step, self.min, self.max, false) as i32
    }

    /// Snap a `(low, high)` pair outward.
    pub fn bounds(&self, low: f64, high: f64) -> (i32, i32) {
        (self.floor(low), self.ceil(high))
    }

    /// Grid step as an integer stride.
    pub fn stride(&self) -> usize {
        self.step as usize
    }
}

/// Snap a coordinate to the 10° line at or below it, after truncating it to
/// whole degrees.
///
/// Used by the GSW tile index. The truncation happens first, so `-5.5`
/// becomes `-5` and then `-10`, while `-10.5` becomes `-10` and stays there.
pub fn left_decade(value: f64) -> i32 {
    let val = value.trunc() as i32;
    if val % 10 == 0 {
        val
    } else if val > 0 {
        val / 10 * 10
    } else {
        -(1 + val.abs() / 10) * 10
    }
}
