/// Settings for turning FSL `bvec`/`bval` files into a [`crate::Protocol`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolConfig {
    /// Multiplier applied to every b-value. FSL stores s/mm², the default
    /// parameter bounds are in SI so the default converts to s/m².
    pub b_scale: f32,
    /// Rescale non-zero gradient directions to unit length.
    pub normalize_gradients: bool,
    /// Gradients with a norm below this are b0 directions and stay zero.
    pub zero_gradient_tolerance: f32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            b_scale: 1e6,
            normalize_gradients: true,
            zero_gradient_tolerance: 1e-6,
        }
    }
}

impl ProtocolConfig {
    /// Keeps the file values untouched.
    pub fn raw() -> Self {
        Self {
            b_scale: 1.0,
            normalize_gradients: false,
            ..Self::default()
        }
    }

    pub fn with_b_scale(mut self, b_scale: f32) -> Self {
        self.b_scale = b_scale;
        self
    }

    pub fn with_normalize_gradients(mut self, normalize: bool) -> Self {
        self.normalize_gradients = normalize;
        self
    }

    pub fn with_zero_gradient_tolerance(mut self, tolerance: f32) -> Self {
        self.zero_gradient_tolerance = tolerance;
        self
    }
}
