//! Per-vendor parameter constraints
//!
//! Vendors accept narrower ranges than the generic config allows; adapters
//! clamp derived values into range instead of rejecting the request.

/// Numeric limits a vendor enforces on generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterConstraints {
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub top_p_min: f64,
    pub top_p_max: f64,
    /// Used when the vendor requires a token limit and none is configured
    pub default_max_tokens: Option<u32>,
}

impl Default for ParameterConstraints {
    fn default() -> Self {
        Self {
            temperature_min: 0.0,
            temperature_max: 2.0,
            top_p_min: 0.0,
            top_p_max: 1.0,
            default_max_tokens: None,
        }
    }
}

impl ParameterConstraints {
    pub fn anthropic() -> Self {
        Self {
            temperature_max: 1.0,
            default_max_tokens: Some(4096),
            ..Default::default()
        }
    }

    pub fn with_temperature_max(mut self, max: f64) -> Self {
        self.temperature_max = max;
        self
    }

    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = Some(max_tokens);
        self
    }

    pub fn clamp_temperature(&self, temperature: f64) -> f64 {
        temperature.clamp(self.temperature_min, self.temperature_max)
    }

    pub fn clamp_top_p(&self, top_p: f64) -> f64 {
        top_p.clamp(self.top_p_min, self.top_p_max)
    }
}
