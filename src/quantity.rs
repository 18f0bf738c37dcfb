use crate::units::{self, VolumeUnit};

/// 단위가 붙은 체적 값.
///
/// `value`는 `unit` 기준 그대로 보관하고, 비율 계산 직전에만
/// 기준 단위(ml)로 환산한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub value: f64,
    pub unit: VolumeUnit,
}

impl Volume {
    pub fn new(value: f64, unit: VolumeUnit) -> Self {
        Self { value, unit }
    }

    /// 기준 단위(ml)로 환산한 값.
    pub fn base(&self) -> f64 {
        units::to_base(self.value, self.unit)
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
