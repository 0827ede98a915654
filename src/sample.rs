//! Built-in 16 x 16 grayscale test image.

use crate::grid::{Grid, Raster};

pub const SIZE: usize = 16;

#[rustfmt::skip]
const PIXELS: [[i32; SIZE]; SIZE] = [
    [ 88,  88,  88,  89,  90,  91,  92,  93,  94,  95,  93,  95,  96,  98,  97,  94],
    [ 93,  91,  91,  90,  92,  93,  94,  94,  95,  95,  92,  93,  95,  95,  95,  96],
    [ 95,  95,  95,  95,  96,  97,  94,  96,  97,  96,  98,  97,  98,  99,  95,  97],
    [ 97,  96,  98,  97,  98,  94,  95,  97,  99, 100,  99, 101, 100, 100,  98,  98],
    [ 99, 100,  97,  99, 100, 100,  98,  98, 100, 101, 100,  99, 101, 102,  99, 100],
    [100, 101, 100,  99, 101, 102,  99, 100, 103, 102, 103, 101, 101, 100, 102, 101],
    [100, 102, 103, 101, 101, 100, 102, 103, 103, 105, 104, 104, 103, 104, 104, 103],
    [103, 105, 103, 105, 105, 104, 104, 104, 102, 101, 100, 100, 100, 101, 102, 103],
    [104, 104, 105, 105, 105, 104, 104, 106, 102, 103, 101, 101, 102, 101, 102, 102],
    [102, 105, 105, 105, 106, 104, 106, 104, 103, 101, 100, 100, 101, 102, 102, 103],
    [102, 105, 105, 105, 106, 104, 106, 104, 103, 101, 100, 100, 101, 102, 102, 103],
    [102, 105, 105, 105, 106, 104, 105, 104, 103, 101, 102, 100, 102, 102, 102, 103],
    [104, 105, 106, 105, 106, 104, 106, 103, 103, 102, 100, 100, 101, 102, 102, 103],
    [103, 105, 107, 107, 106, 104, 106, 104, 103, 101, 100, 100, 101, 102, 102, 103],
    [103, 105, 106, 108, 106, 104, 106, 105, 103, 101, 101, 100, 101, 103, 102, 105],
    [102, 105, 105, 105, 106, 104, 106, 107, 104, 103, 102, 100, 101, 104, 102, 104],
];

/// The sample image as a raster.
pub fn image() -> Raster {
    Grid::from_rows(&PIXELS).expect("sample image is SIZE x SIZE")
}
