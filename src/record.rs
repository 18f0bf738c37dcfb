//! 저장된 계산 스냅샷(레코드) 정의.
//!
//! 저장 포맷은 JSON 객체 배열이며 필드명은 camelCase를 쓴다. 예전 형식의
//! 레코드도 읽을 수 있도록 모든 필드를 느슨하게 역직렬화한다. 빠진 필드는
//! None, 알 수 없는 단위 문자열도 None, `id`가 없으면 새로 발급한다.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::conversion;
use crate::units::VolumeUnit;

/// 레코드 식별자. 생성 시점에 한 번 발급되고 바뀌지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(RecordId)
    }
}

/// 저장된 계산 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecord {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_substance_volume: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_unit",
        skip_serializing_if = "Option::is_none"
    )]
    pub standard_substance_unit: Option<VolumeUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_medium_volume: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_unit",
        skip_serializing_if = "Option::is_none"
    )]
    pub standard_medium_unit: Option<VolumeUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_volume: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_unit",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_unit: Option<VolumeUnit>,
    #[serde(
        default,
        deserialize_with = "lenient_unit",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_substance_unit: Option<VolumeUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_substance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_label: Option<String>,
}

impl SavedRecord {
    /// 레코드 목록에 보여줄 "표준 비율" 문자열. 예: `10ml / 1l`
    pub fn standard_rate_summary(&self) -> String {
        format!(
            "{}{} / {}{}",
            text_or_empty(&self.standard_substance_volume),
            unit_or_empty(self.standard_substance_unit),
            text_or_empty(&self.standard_medium_volume),
            unit_or_empty(self.standard_medium_unit),
        )
    }

    /// 레코드 목록에 보여줄 목표 체적 문자열. 예: `2l`
    pub fn target_summary(&self) -> String {
        format!(
            "{}{}",
            text_or_empty(&self.target_volume),
            unit_or_empty(self.target_unit)
        )
    }

    /// 저장 당시 계산값과 단위. 예: `20 ml`
    pub fn result_summary(&self) -> String {
        let value = self
            .required_substance
            .map(|v| v.to_string())
            .unwrap_or_default();
        format!("{value} {}", unit_or_empty(self.required_substance_unit))
            .trim()
            .to_string()
    }

    pub fn label(&self) -> &str {
        self.record_label.as_deref().unwrap_or_default()
    }
}

fn text_or_empty(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or_default()
}

fn unit_or_empty(u: Option<VolumeUnit>) -> &'static str {
    u.map(VolumeUnit::code).unwrap_or_default()
}

fn lenient_unit<'de, D>(deserializer: D) -> Result<Option<VolumeUnit>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| conversion::parse_volume_unit(s).ok()))
}
