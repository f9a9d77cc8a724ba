//! Proptest strategies for grid configurations.

use proptest::prelude::*;
use riverwar_core::grid::Coord;

/// Grid dimensions between 2 and 12 tiles a side.
pub fn grid_dims() -> impl Strategy<Value = (u16, u16)> {
    (2u16..=12, 2u16..=12)
}

/// A coordinate within the given dimensions.
pub fn coord_in(width: u16, height: u16) -> impl Strategy<Value = Coord> {
    (0..width, 0..height).prop_map(|(x, y)| Coord::new(x, y))
}

/// Dimensions plus two coordinates on the grid (possibly equal).
pub fn dims_with_two_coords() -> impl Strategy<Value = ((u16, u16), Coord, Coord)> {
    grid_dims().prop_flat_map(|(w, h)| {
        (Just((w, h)), coord_in(w, h), coord_in(w, h))
    })
}
