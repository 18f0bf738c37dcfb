use serde::{Deserialize, Serialize};

/// 체적 단위. 내부 기준은 밀리리터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeUnit {
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "l")]
    Liter,
}

impl VolumeUnit {
    /// 선택 가능한 전체 단위 목록. 표시 순서와 같다.
    pub const ALL: [VolumeUnit; 2] = [VolumeUnit::Milliliter, VolumeUnit::Liter];

    /// 기준 단위(ml) 대비 배율.
    pub fn factor(self) -> f64 {
        match self {
            VolumeUnit::Milliliter => 1.0,
            VolumeUnit::Liter => 1000.0,
        }
    }

    /// 저장 포맷과 화면에 쓰는 짧은 코드.
    pub fn code(self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "ml",
            VolumeUnit::Liter => "l",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "Milliliters",
            VolumeUnit::Liter => "Liters",
        }
    }
}

impl std::fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// 주어진 값을 기준 단위(ml)로 환산한다.
pub fn to_base(value: f64, unit: VolumeUnit) -> f64 {
    value * unit.factor()
}

/// 기준 단위(ml) 값을 원하는 단위로 환산한다.
pub fn from_base(value_ml: f64, unit: VolumeUnit) -> f64 {
    value_ml / unit.factor()
}
