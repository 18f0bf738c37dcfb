use thiserror::Error;

use crate::quantity::Volume;
use crate::units::VolumeUnit;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    /// 숫자로 해석할 수 없는 체적 값
    #[error("invalid volume: {0}")]
    InvalidVolume(String),
}

/// 단위 문자열을 허용 집합 `{ml, l}` 안의 값으로 해석한다.
pub fn parse_volume_unit(s: &str) -> Result<VolumeUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
            Ok(VolumeUnit::Milliliter)
        }
        "l" | "liter" | "liters" | "litre" | "litres" => Ok(VolumeUnit::Liter),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

/// 입력란의 체적 문자열을 숫자로 해석한다.
///
/// 앞쪽 공백 뒤의 가장 긴 십진수 접두부만 읽고 나머지는 무시한다. `10ml`은 10,
/// `1,5`는 1이다. 숫자로 시작하지 않거나(`inf`, `nan` 포함) 유한하지 않으면 None.
pub fn parse_volume_text(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let end = decimal_prefix_len(trimmed);
    if end == 0 {
        return None;
    }
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `[+-]digits[.digits][(e|E)[+-]digits]` 꼴의 가장 긴 접두부 길이. 숫자가 하나도 없으면 0.
fn decimal_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }
    let int_end = digits_from(i);
    let mut end = int_end;
    let mut seen_digit = int_end > i;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        seen_digit |= frac_end > end + 1;
        end = frac_end;
    }
    if !seen_digit {
        return 0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    end
}

/// `10ml`, `2 l`, `0.5liter` 형태의 문자열을 값과 단위로 분리한다.
pub fn parse_volume(s: &str) -> Result<Volume, ConversionError> {
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| ConversionError::UnknownUnit(String::new()))?;
    let (num, unit) = trimmed.split_at(split);
    let value = parse_volume_text(num)
        .ok_or_else(|| ConversionError::InvalidVolume(num.trim().to_string()))?;
    let unit = parse_volume_unit(unit)?;
    Ok(Volume::new(value, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_aliases() {
        assert_eq!(parse_volume_unit("ML").unwrap(), VolumeUnit::Milliliter);
        assert_eq!(parse_volume_unit(" Litres ").unwrap(), VolumeUnit::Liter);
        assert!(matches!(
            parse_volume_unit("gal"),
            Err(ConversionError::UnknownUnit(u)) if u == "gal"
        ));
    }

    #[test]
    fn volume_text() {
        assert_eq!(parse_volume_text(" 12.5 "), Some(12.5));
        assert_eq!(parse_volume_text(""), None);
        assert_eq!(parse_volume_text("abc"), None);
        assert_eq!(parse_volume_text(".5"), Some(0.5));
        assert_eq!(parse_volume_text("5."), Some(5.0));
        assert_eq!(parse_volume_text("-2"), Some(-2.0));
        assert_eq!(parse_volume_text("1.5e3"), Some(1500.0));
        assert_eq!(parse_volume_text("-"), None);
        assert_eq!(parse_volume_text("."), None);
    }

    #[test]
    fn volume_text_reads_leading_number_only() {
        assert_eq!(parse_volume_text("10ml"), Some(10.0));
        assert_eq!(parse_volume_text("2 l"), Some(2.0));
        assert_eq!(parse_volume_text("1,5"), Some(1.0));
        assert_eq!(parse_volume_text("3e"), Some(3.0));
        assert_eq!(parse_volume_text("4e+x"), Some(4.0));
        assert_eq!(parse_volume_text("1.2.3"), Some(1.2));
    }

    #[test]
    fn volume_text_rejects_non_finite() {
        for text in ["inf", "-inf", "infinity", "Infinity", "NaN", "nan", "1e999"] {
            assert_eq!(parse_volume_text(text), None, "{text}");
        }
    }

    #[test]
    fn volume_with_unit_suffix() {
        let v = parse_volume("10ml").unwrap();
        assert_eq!(v, Volume::new(10.0, VolumeUnit::Milliliter));
        let v = parse_volume("0.5 liter").unwrap();
        assert_eq!(v, Volume::new(0.5, VolumeUnit::Liter));
        assert!(matches!(parse_volume("12"), Err(ConversionError::UnknownUnit(_))));
        assert!(matches!(parse_volume("2 cups"), Err(ConversionError::UnknownUnit(_))));
        assert!(matches!(parse_volume("..l"), Err(ConversionError::InvalidVolume(_))));
    }
}
