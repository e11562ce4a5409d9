use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Inclusive bounds and UI stepping for one effect parameter. `step` is an
/// affordance for slider widgets; the model accepts any in-range real value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub identity: f32,
}

/// The eight adjustable parameters, in control-panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectParam {
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Blur,
    Opacity,
    Invert,
    Sepia,
}

impl EffectParam {
    pub const ALL: [EffectParam; 8] = [
        EffectParam::Brightness,
        EffectParam::Contrast,
        EffectParam::Saturation,
        EffectParam::Hue,
        EffectParam::Blur,
        EffectParam::Opacity,
        EffectParam::Invert,
        EffectParam::Sepia,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Hue => "hue",
            Self::Blur => "blur",
            Self::Opacity => "opacity",
            Self::Invert => "invert",
            Self::Sepia => "sepia",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|param| param.name() == lowered)
    }

    pub fn range(self) -> ParamRange {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturation => ParamRange {
                min: 0.0,
                max: 200.0,
                step: 1.0,
                identity: 100.0,
            },
            Self::Hue => ParamRange {
                min: 0.0,
                max: 360.0,
                step: 1.0,
                identity: 0.0,
            },
            Self::Blur => ParamRange {
                min: 0.0,
                max: 20.0,
                step: 0.5,
                identity: 0.0,
            },
            Self::Opacity => ParamRange {
                min: 0.0,
                max: 100.0,
                step: 1.0,
                identity: 100.0,
            },
            Self::Invert | Self::Sepia => ParamRange {
                min: 0.0,
                max: 100.0,
                step: 1.0,
                identity: 0.0,
            },
        }
    }
}

/// Current value of every adjustment. Percent parameters use 100 as the
/// no-op value, hue is degrees, blur is the Gaussian radius in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EffectParams {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub hue: f32,
    pub blur: f32,
    pub opacity: f32,
    pub invert: f32,
    pub sepia: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            hue: 0.0,
            blur: 0.0,
            opacity: 100.0,
            invert: 0.0,
            sepia: 0.0,
        }
    }
}

impl EffectParams {
    pub fn get(&self, param: EffectParam) -> f32 {
        match param {
            EffectParam::Brightness => self.brightness,
            EffectParam::Contrast => self.contrast,
            EffectParam::Saturation => self.saturation,
            EffectParam::Hue => self.hue,
            EffectParam::Blur => self.blur,
            EffectParam::Opacity => self.opacity,
            EffectParam::Invert => self.invert,
            EffectParam::Sepia => self.sepia,
        }
    }

    /// Structural update: returns a copy with `param` set to `value`, or
    /// rejects without touching the original. Bounds are inclusive; values
    /// typed halfway ("1" on the way to "15") land here as rejections, so
    /// this is a normal transient rather than a failure worth surfacing.
    pub fn with(&self, param: EffectParam, value: f32) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::NonFiniteParam(param.name()));
        }
        let range = param.range();
        if value < range.min || value > range.max {
            return Err(DomainError::RangeRejected {
                param: param.name(),
                value,
            });
        }

        let mut next = *self;
        match param {
            EffectParam::Brightness => next.brightness = value,
            EffectParam::Contrast => next.contrast = value,
            EffectParam::Saturation => next.saturation = value,
            EffectParam::Hue => next.hue = value,
            EffectParam::Blur => next.blur = value,
            EffectParam::Opacity => next.opacity = value,
            EffectParam::Invert => next.invert = value,
            EffectParam::Sepia => next.sepia = value,
        }
        Ok(next)
    }

    /// The identity tuple, unconditionally.
    pub fn reset() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Re-checks every field. `with` keeps constructed values in range, but
    /// preset files deserialized from JSON bypass it.
    pub fn validate(&self) -> Result<(), DomainError> {
        for param in EffectParam::ALL {
            let value = self.get(param);
            if !value.is_finite() {
                return Err(DomainError::NonFiniteParam(param.name()));
            }
            let range = param.range();
            if value < range.min || value > range.max {
                return Err(DomainError::RangeRejected {
                    param: param.name(),
                    value,
                });
            }
        }
        Ok(())
    }
}
