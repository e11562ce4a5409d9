use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    RangeRejected { param: &'static str, value: f32 },
    NonFiniteParam(&'static str),
    EmptyImage { width: u32, height: u32 },
    PixelBufferMismatch { expected: usize, actual: usize },
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RangeRejected { param, value } => {
                write!(f, "value {value} is outside the range of {param}")
            }
            Self::NonFiniteParam(name) => write!(f, "effect parameter {name} must be finite"),
            Self::EmptyImage { width, height } => {
                write!(f, "image dimensions must be non-zero, got {width}x{height}")
            }
            Self::PixelBufferMismatch { expected, actual } => write!(
                f,
                "pixel buffer length {actual} does not match dimensions (expected {expected})"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
