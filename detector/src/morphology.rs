use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

/// Rounds of 3x3 dilation, then of 3x3 erosion.
pub const ITERATIONS: u8 = 2;

/// Close small gaps and drop speckle: `ITERATIONS` dilations with the full
/// 3x3 neighbourhood followed by as many erosions.
///
/// Repeating a 3x3 square `k` times is the same as one pass with a square of
/// chessboard radius `k`, which is what the `LInf` norm gives us.
pub fn clean(mask: &GrayImage) -> GrayImage {
    let grown = dilate(mask, Norm::LInf, ITERATIONS);
    erode(&grown, Norm::LInf, ITERATIONS)
}
