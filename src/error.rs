use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuantizeError {
    #[error("cannot quantize an empty pixel sequence")]
    EmptyPixels,

    #[error("max_colors must be between 2 and 256, got {0}")]
    InvalidMaxColors(u32),

    #[error("significant bits must be between 1 and 8, got {0}")]
    InvalidSignificantBits(u32),

    #[error("iteration cap must be at least 1")]
    InvalidIterationCap,

    #[error("population fraction must be in (0, 1], got {0}")]
    InvalidPopulationFraction(f64),

    #[error("sampling quality must be at least 1")]
    InvalidQuality,

    /// The median cut found no cut point in a box known to hold pixels.
    /// This is a bug in the cut-point search, not a property of the input.
    #[error("no median cut point in populated box {bounds}")]
    NoCutPoint { bounds: alloc::string::String },
}
