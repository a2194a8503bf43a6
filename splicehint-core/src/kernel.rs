//! Weighting kernels for boundary scoring.
//!
//! A kernel assigns a weight to every codon offset within the scoring
//! window around a feature boundary. Columns close to the boundary carry
//! the most information about whether the boundary is real, so all shapes
//! are monotonically non-increasing in the offset.

use std::str::FromStr;

/// Shape of the weighting function, selected once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelShape {
    /// Constant weight 1 over the whole window
    Box,
    /// Linear decay to 0 at the window edge
    #[default]
    Triangular,
    /// Quadratic decay to 0 at the window edge
    Parabolic,
    /// Cubic-power decay, concentrating weight near the boundary
    Triweight,
}

impl FromStr for KernelShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Self::Box),
            "triangular" => Ok(Self::Triangular),
            "parabolic" => Ok(Self::Parabolic),
            "triweight" => Ok(Self::Triweight),
            other => Err(format!(
                "invalid kernel \"{other}\"; valid options are \"box\", \"triangular\", \
                 \"parabolic\" and \"triweight\""
            )),
        }
    }
}

/// A weighting kernel with a fixed window width.
///
/// The width is set at construction, before any scoring runs, and cannot
/// change afterwards.
///
/// # Examples
///
/// ```rust
/// use splicehint_core::kernel::{Kernel, KernelShape};
///
/// let kernel = Kernel::new(KernelShape::Box, 4);
/// assert_eq!(kernel.weight(0), 1.0);
/// assert_eq!(kernel.weight_sum(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct Kernel {
    shape: KernelShape,
    width: usize,
}

impl Kernel {
    /// Creates a kernel of the given shape over a window of `width` codons.
    #[must_use]
    pub const fn new(shape: KernelShape, width: usize) -> Self {
        Self { shape, width }
    }

    /// Window width in codons.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Weight at `offset` codons away from the boundary.
    ///
    /// Offsets are zero-based; offsets at or beyond the window width have
    /// weight 0.
    #[must_use]
    pub fn weight(&self, offset: usize) -> f64 {
        if offset >= self.width {
            return 0.0;
        }
        let x = offset as f64 / self.width as f64;
        match self.shape {
            KernelShape::Box => 1.0,
            KernelShape::Triangular => 1.0 - x,
            KernelShape::Parabolic => 1.0 - x * x,
            KernelShape::Triweight => {
                let u = 1.0 - x * x;
                u * u * u
            }
        }
    }

    /// Total weight over the window, the area under the kernel.
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        (0..self.width).map(|offset| self.weight(offset)).sum()
    }
}
