//! # Error Types
//!
//! Every fallible operation in the crate returns [`LifeResult`]. Variants are
//! grouped the way failures are reported to the operator: graphics capability,
//! resource allocation, shader build, input validation and runtime drawing.
//! None of them are retried.

use thiserror::Error;

/// Main error type for simulation, grid and GPU operations
#[derive(Error, Debug)]
pub enum LifeError {
    /// No usable graphics adapter
    #[error("Graphics unavailable: {0}")]
    GraphicsUnavailable(String),

    /// Adapter found but the device could not be opened
    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(String),

    /// Texture dimensions rejected by the device
    #[error(
        "Failed to create texture (requested texture size {width} x {height}, \
         max supported texture size is {max} x {max})"
    )]
    TextureAllocation { width: u32, height: u32, max: u32 },

    /// Shader compile or pipeline link failure
    #[error("Error compiling or linking program '{program}': {message}")]
    ShaderBuild { program: String, message: String },

    /// GPU error observed after issuing a draw
    #[error("Drawing failed in program '{program}': {message}")]
    Draw { program: String, message: String },

    /// Mapping a readback buffer failed
    #[error("Readback failed: {0}")]
    Readback(String),

    /// Coordinate outside a grid or the simulation state
    #[error("Invalid cell coord ({x}, {y}): dimensions are {width} x {height}")]
    CellOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// Bool array length does not match the requested dimensions
    #[error("Grid dimensions ({width} x {height} = {expected}) do not match total number of cells ({actual})")]
    GridSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// Grid does not have the simulation state dimensions
    #[error("Grid is {actual_width} x {actual_height} but the state is {expected_width} x {expected_height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// Pasted grid would not fit in the target
    #[error("With offset ({x}, {y}), a {paste_width} x {paste_height} grid will not fit within a {width} x {height} grid")]
    PasteOutOfBounds {
        x: i64,
        y: i64,
        paste_width: usize,
        paste_height: usize,
        width: usize,
        height: usize,
    },

    /// Text grid contains a character that is neither the live nor dead char
    #[error("Invalid character found at row {row} column {column}: '{found}'")]
    InvalidTextCharacter { row: usize, column: usize, found: char },

    /// Text grid rows differ in length
    #[error("Inconsistent row lengths: first row is {expected} chars, row {row} is {actual} chars")]
    InconsistentRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Text grid has no cells
    #[error("Text grid is empty")]
    EmptyTextGrid,

    /// Live and dead characters are the same
    #[error("Live and dead characters must differ (both are '{0}')")]
    AmbiguousTextChars(char),

    /// Uniform name not declared by the program
    #[error("Program '{program}' has no uniform named '{name}'")]
    UnknownUniform { program: String, name: String },

    /// Uniform value of the wrong kind
    #[error("Uniform '{name}' expects {expected}, got {actual}")]
    UniformKindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Pixel buffer length does not match the region being written
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    PixelBufferSize { expected: usize, actual: usize },

    /// Configuration rejected by validation
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

/// Result type for simulation operations
pub type LifeResult<T> = Result<T, LifeError>;

impl LifeError {
    /// Create a graphics-unavailable error
    pub fn graphics(msg: impl Into<String>) -> Self {
        Self::GraphicsUnavailable(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a drawing error for the named program
    pub fn draw(program: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Draw {
            program: program.into(),
            message: msg.into(),
        }
    }

    /// Create a shader build error for the named program
    pub fn shader(program: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ShaderBuild {
            program: program.into(),
            message: msg.into(),
        }
    }

    /// Whether the error is a caller-side precondition violation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::CellOutOfBounds { .. }
                | Self::GridSizeMismatch { .. }
                | Self::DimensionMismatch { .. }
                | Self::PasteOutOfBounds { .. }
                | Self::InvalidTextCharacter { .. }
                | Self::InconsistentRowLength { .. }
                | Self::EmptyTextGrid
                | Self::AmbiguousTextChars(_)
                | Self::UnknownUniform { .. }
                | Self::UniformKindMismatch { .. }
                | Self::PixelBufferSize { .. }
                | Self::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_allocation_names_dimensions() {
        let err = LifeError::TextureAllocation {
            width: 9000,
            height: 20,
            max: 8192,
        };
        let msg = err.to_string();
        assert!(msg.contains("9000 x 20"));
        assert!(msg.contains("8192 x 8192"));
        assert!(!err.is_validation());
    }

    #[test]
    fn text_errors_are_validation() {
        let err = LifeError::InvalidTextCharacter {
            row: 2,
            column: 3,
            found: 'x',
        };
        assert_eq!(
            err.to_string(),
            "Invalid character found at row 2 column 3: 'x'"
        );
        assert!(err.is_validation());
    }
}
