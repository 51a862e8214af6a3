//! Floating-point scalar bound shared by the matrix and solver types.

use num_traits::Float;
use std::fmt::{Debug, Display, LowerExp};
use std::iter::Sum;

/// Real scalar usable in a parallel solve.
///
/// Implemented for every `Float` that can cross thread boundaries, which in
/// practice means `f32` and `f64`.
pub trait Real: Float + Sum + Send + Sync + Debug + Display + LowerExp + 'static {
    /// Lossy conversion used for error payloads and log output.
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T> Real for T where T: Float + Sum + Send + Sync + Debug + Display + LowerExp + 'static {}
