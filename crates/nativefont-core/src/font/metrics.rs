//! Width and weight classification
//!
//! The native engine reports width and weight as scalars in roughly
//! `-1.0..=1.0`, zero being normal. Callers expect the OpenType width
//! classes `1..=9` (from 50% to 200% of normal width) and weights on a
//! `0..=1000` scale with 500 as regular.

use crate::constants::{
    FWEIGHT_MAX, FWEIGHT_MIN, FWEIGHT_NORMAL, FWIDTH_NORMAL, FWIDTH_ULTRA_EXPANDED,
    WIDTH_CLASS_BOUNDS,
};

/// Maps a native width scalar onto a width class in `1..=9`
pub fn width_class(scalar: f32) -> u8 {
    if scalar == 0.0 {
        return FWIDTH_NORMAL;
    }

    let percent = (scalar + 1.0) * 100.0;
    WIDTH_CLASS_BOUNDS
        .iter()
        .position(|&bound| percent <= bound)
        .map(|index| index as u8 + 1)
        .unwrap_or(FWIDTH_ULTRA_EXPANDED)
}

/// Maps a native weight scalar onto `0..=1000`, truncating toward zero
pub fn weight_class(scalar: f32) -> u16 {
    if scalar == 0.0 {
        return FWEIGHT_NORMAL;
    }

    let weight = ((scalar + 1.0) * 500.0) as i32;
    weight.clamp(FWEIGHT_MIN as i32, FWEIGHT_MAX as i32) as u16
}
