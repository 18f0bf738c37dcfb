//! 비율 계산기.
//!
//! 알려진 비율(물질 체적 : 매질 체적)을 목표 매질 체적으로 확장했을 때
//! 필요한 물질 체적을 구한다. 입력은 문자열 그대로 보관하고 결과는 매번
//! 입력에서 다시 계산한다.

use crate::conversion::parse_volume_text;
use crate::notify::Notice;
use crate::quantity::Volume;
use crate::record::{RecordId, SavedRecord};
use crate::units::{self, VolumeUnit};

/// 결과가 없을 때 값 자리에 보여줄 문자열.
pub const VALUE_PLACEHOLDER: &str = "XXX";
/// 결과 단위가 없을 때 보여줄 문자열.
pub const UNIT_PLACEHOLDER: &str = "xx";

/// 표시용 반올림. 소수점 셋째 자리까지, 이진 부동소수 오차를 피하려고
/// EPSILON을 더한 뒤 반올림(half-up)한다.
pub fn round_display(value: f64) -> f64 {
    ((value + f64::EPSILON) * 1000.0 + 0.5).floor() / 1000.0
}

/// 반올림한 값을 불필요한 0 없이 문자열로 만든다. 예: `20`, `1.5`
pub fn format_display(value: f64) -> String {
    round_display(value).to_string()
}

/// 필요한 물질 체적을 기준 단위(ml)로 계산한다.
///
/// 매질 체적이 0이면 결과가 유한하지 않으므로 None.
pub fn required_substance_base(substance: Volume, medium: Volume, target: Volume) -> Option<f64> {
    let required = (substance.base() / medium.base()) * target.base();
    required.is_finite().then_some(required)
}

/// 계산기 입력 상태.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatioCalculator {
    pub standard_substance_volume: String,
    pub standard_substance_unit: Option<VolumeUnit>,
    pub standard_medium_volume: String,
    pub standard_medium_unit: Option<VolumeUnit>,
    pub target_volume: String,
    pub target_unit: Option<VolumeUnit>,
    pub required_substance_unit: Option<VolumeUnit>,
    pub record_label: String,
}

impl RatioCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 결과 단위를 미리 정해 둔 계산기.
    pub fn with_output_unit(unit: Option<VolumeUnit>) -> Self {
        Self {
            required_substance_unit: unit,
            ..Self::default()
        }
    }

    /// 물질 단위를 고른다. 결과 단위가 아직 없으면 같은 단위로 맞춘다.
    pub fn select_substance_unit(&mut self, unit: VolumeUnit) {
        self.standard_substance_unit = Some(unit);
        if self.required_substance_unit.is_none() {
            self.required_substance_unit = Some(unit);
        }
    }

    pub fn standard_substance(&self) -> Option<Volume> {
        volume_of(&self.standard_substance_volume, self.standard_substance_unit)
    }

    pub fn standard_medium(&self) -> Option<Volume> {
        volume_of(&self.standard_medium_volume, self.standard_medium_unit)
    }

    pub fn target(&self) -> Option<Volume> {
        volume_of(&self.target_volume, self.target_unit)
    }

    /// 결과 단위로 표현한 필요한 물질 체적. 입력이 하나라도 없거나
    /// 숫자가 아니거나 결과가 유한하지 않으면 None.
    pub fn required_substance(&self) -> Option<f64> {
        let unit = self.required_substance_unit?;
        let base = required_substance_base(
            self.standard_substance()?,
            self.standard_medium()?,
            self.target()?,
        )?;
        Some(units::from_base(base, unit))
    }

    pub fn result(&self) -> Option<Volume> {
        Some(Volume::new(
            self.required_substance()?,
            self.required_substance_unit?,
        ))
    }

    /// 화면에 보여줄 결과 값. 결과가 없으면 `XXX`.
    pub fn display_value(&self) -> String {
        self.required_substance()
            .map(format_display)
            .unwrap_or_else(|| VALUE_PLACEHOLDER.to_string())
    }

    /// 화면에 보여줄 결과 단위. 단위가 없으면 `xx`.
    pub fn display_unit(&self) -> &'static str {
        self.required_substance_unit
            .map(VolumeUnit::code)
            .unwrap_or(UNIT_PLACEHOLDER)
    }

    /// 결과 값을 1 이상 1000 미만으로 보이게 결과 단위를 한 번 바꾼다.
    ///
    /// 바꾸기 전의 값과 단위로만 판단하며, 바뀐 경우에만 알림을 돌려준다.
    pub fn optimise(&mut self) -> Option<Notice> {
        let value = self.required_substance()?;
        match self.required_substance_unit? {
            VolumeUnit::Liter if value < 1.0 => {
                self.required_substance_unit = Some(VolumeUnit::Milliliter);
                tracing::info!(value, "optimised result unit to ml");
                Some(Notice::ConvertedToMilliliters)
            }
            VolumeUnit::Milliliter if value >= 1000.0 => {
                self.required_substance_unit = Some(VolumeUnit::Liter);
                tracing::info!(value, "optimised result unit to l");
                Some(Notice::ConvertedToLiters)
            }
            _ => None,
        }
    }

    /// 저장 가능 여부. 결과가 유한한 숫자이고 결과 단위와 라벨이 있어야 한다.
    pub fn can_save(&self) -> bool {
        self.required_substance().is_some()
            && self.required_substance_unit.is_some()
            && !self.record_label.is_empty()
    }

    /// 현재 입력으로 새 레코드를 만든다. 저장 조건을 못 맞추면 None.
    pub fn snapshot(&self) -> Option<SavedRecord> {
        if !self.can_save() {
            return None;
        }
        Some(SavedRecord {
            id: RecordId::generate(),
            standard_substance_volume: Some(self.standard_substance_volume.clone()),
            standard_substance_unit: self.standard_substance_unit,
            standard_medium_volume: Some(self.standard_medium_volume.clone()),
            standard_medium_unit: self.standard_medium_unit,
            target_volume: Some(self.target_volume.clone()),
            target_unit: self.target_unit,
            required_substance_unit: self.required_substance_unit,
            required_substance: self.required_substance(),
            record_label: Some(self.record_label.clone()),
        })
    }

    /// 레코드의 모든 필드를 입력 상태로 복사한다. 레코드는 그대로 둔다.
    pub fn load(&mut self, record: &SavedRecord) {
        self.standard_substance_volume =
            record.standard_substance_volume.clone().unwrap_or_default();
        self.standard_substance_unit = record.standard_substance_unit;
        self.standard_medium_volume = record.standard_medium_volume.clone().unwrap_or_default();
        self.standard_medium_unit = record.standard_medium_unit;
        self.target_volume = record.target_volume.clone().unwrap_or_default();
        self.target_unit = record.target_unit;
        self.required_substance_unit = record.required_substance_unit;
        self.record_label = record.record_label.clone().unwrap_or_default();
    }
}

fn volume_of(text: &str, unit: Option<VolumeUnit>) -> Option<Volume> {
    Some(Volume::new(parse_volume_text(text)?, unit?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RatioCalculator {
        let mut calc = RatioCalculator::new();
        calc.standard_substance_volume = "10".into();
        calc.select_substance_unit(VolumeUnit::Milliliter);
        calc.standard_medium_volume = "1000".into();
        calc.standard_medium_unit = Some(VolumeUnit::Milliliter);
        calc.target_volume = "2".into();
        calc.target_unit = Some(VolumeUnit::Liter);
        calc
    }

    #[test]
    fn rounding_is_half_up_with_epsilon() {
        assert_eq!(round_display(1.0005), 1.001);
        assert_eq!(round_display(2.0 / 3.0), 0.667);
        assert_eq!(round_display(20.0), 20.0);
        assert_eq!(format_display(1.5), "1.5");
        assert_eq!(format_display(20.0), "20");
        assert_eq!(format_display(1.0 / 3.0), "0.333");
    }

    #[test]
    fn first_substance_unit_sets_output_unit_once() {
        let mut calc = RatioCalculator::new();
        calc.select_substance_unit(VolumeUnit::Liter);
        assert_eq!(calc.required_substance_unit, Some(VolumeUnit::Liter));
        calc.select_substance_unit(VolumeUnit::Milliliter);
        assert_eq!(calc.standard_substance_unit, Some(VolumeUnit::Milliliter));
        assert_eq!(calc.required_substance_unit, Some(VolumeUnit::Liter));
    }

    #[test]
    fn preset_output_unit_is_not_overridden() {
        let mut calc = RatioCalculator::with_output_unit(Some(VolumeUnit::Liter));
        calc.select_substance_unit(VolumeUnit::Milliliter);
        assert_eq!(calc.required_substance_unit, Some(VolumeUnit::Liter));
    }

    #[test]
    fn computes_scaled_substance() {
        let calc = filled();
        let v = calc.required_substance().unwrap();
        assert!((v - 20.0).abs() < 1e-9);
        assert_eq!(calc.display_value(), "20");
        assert_eq!(calc.display_unit(), "ml");
    }

    #[test]
    fn zero_medium_has_no_result() {
        let mut calc = filled();
        calc.standard_medium_volume = "0".into();
        assert_eq!(calc.required_substance(), None);
        assert_eq!(calc.display_value(), VALUE_PLACEHOLDER);
        assert!(!calc.can_save());
    }

    #[test]
    fn unparseable_volume_has_no_result() {
        let mut calc = filled();
        calc.target_volume = "two".into();
        assert_eq!(calc.required_substance(), None);
    }

    #[test]
    fn snapshot_requires_label() {
        let mut calc = filled();
        assert!(calc.snapshot().is_none());
        calc.record_label = "Test".into();
        let rec = calc.snapshot().unwrap();
        assert_eq!(rec.required_substance, Some(20.0));
        assert_eq!(rec.record_label.as_deref(), Some("Test"));
        assert_eq!(rec.standard_medium_volume.as_deref(), Some("1000"));
    }

    #[test]
    fn load_copies_every_field() {
        let mut source = filled();
        source.record_label = "batch".into();
        let rec = source.snapshot().unwrap();

        let mut calc = RatioCalculator::new();
        calc.load(&rec);
        assert_eq!(calc, source);
    }

    #[test]
    fn optimise_keeps_unit_inside_range() {
        let mut calc = filled();
        assert_eq!(calc.optimise(), None);
        assert_eq!(calc.required_substance_unit, Some(VolumeUnit::Milliliter));
    }
}
