//! 비율 계산기와 레코드 저장 흐름 회귀 테스트.
use tristo_toolbox::{
    calculator::RatioCalculator,
    notify::Notice,
    record::RecordId,
    session::RatioSession,
    store::{FileRecordStore, RecordStore},
    units::VolumeUnit,
};

const ML: VolumeUnit = VolumeUnit::Milliliter;
const L: VolumeUnit = VolumeUnit::Liter;

/// id 없이 저장된 예전 형식의 레코드 목록.
const LEGACY_RECORDS: &str = r#"[{
    "standardSubstanceVolume": "2", "standardSubstanceUnit": "ml",
    "standardMediumVolume": "1", "standardMediumUnit": "l",
    "targetVolume": "10", "targetUnit": "l",
    "requiredSubstanceUnit": "ml", "requiredSubstance": 20, "recordLabel": "old"
}]"#;

fn filled(
    substance: (&str, VolumeUnit),
    medium: (&str, VolumeUnit),
    target: (&str, VolumeUnit),
) -> RatioCalculator {
    let mut calc = RatioCalculator::new();
    calc.standard_substance_volume = substance.0.into();
    calc.select_substance_unit(substance.1);
    calc.standard_medium_volume = medium.0.into();
    calc.standard_medium_unit = Some(medium.1);
    calc.target_volume = target.0.into();
    calc.target_unit = Some(target.1);
    calc
}

fn open_session(dir: &std::path::Path) -> RatioSession<FileRecordStore> {
    RatioSession::new(FileRecordStore::open_dir(dir).unwrap(), None)
}

#[test]
fn scales_ratio_across_units() {
    // 10ml : 1000ml => 2l 에는 20ml
    let calc = filled(("10", ML), ("1000", ML), ("2", L));
    assert_eq!(calc.required_substance_unit, Some(ML));
    assert_eq!(calc.display_value(), "20");
    assert_eq!(calc.display_unit(), "ml");
}

#[test]
fn optimise_moves_small_liters_to_milliliters() {
    let mut calc = filled(("0.5", L), ("1", L), ("1", L));
    assert_eq!(calc.display_value(), "0.5");
    assert_eq!(calc.optimise(), Some(Notice::ConvertedToMilliliters));
    assert_eq!(calc.display_value(), "500");
    assert_eq!(calc.display_unit(), "ml");
    // 이미 범위 안이면 그대로
    assert_eq!(calc.optimise(), None);
}

#[test]
fn optimise_moves_large_milliliters_to_liters() {
    let mut calc = filled(("1500", ML), ("1", L), ("1", L));
    assert_eq!(calc.optimise(), Some(Notice::ConvertedToLiters));
    assert_eq!(calc.display_value(), "1.5");
    assert_eq!(calc.display_unit(), "l");
}

#[test]
fn any_missing_input_means_no_result() {
    let complete = filled(("10", ML), ("1", L), ("2", L));
    assert!(complete.required_substance().is_some());

    let clears: [(&str, fn(&mut RatioCalculator)); 7] = [
        ("substance volume", |c| c.standard_substance_volume.clear()),
        ("substance unit", |c| c.standard_substance_unit = None),
        ("medium volume", |c| c.standard_medium_volume.clear()),
        ("medium unit", |c| c.standard_medium_unit = None),
        ("target volume", |c| c.target_volume.clear()),
        ("target unit", |c| c.target_unit = None),
        ("output unit", |c| c.required_substance_unit = None),
    ];
    for (input, clear) in clears {
        let mut calc = complete.clone();
        clear(&mut calc);
        assert_eq!(calc.required_substance(), None, "{input}");
        assert_eq!(calc.display_value(), "XXX", "{input}");
        assert!(!calc.can_save(), "{input}");
    }
}

#[test]
fn unusable_numbers_mean_no_result() {
    let complete = filled(("10", ML), ("1", L), ("2", L));

    let mut calc = complete.clone();
    calc.target_volume = "abc".into();
    assert_eq!(calc.display_value(), "XXX");

    let mut calc = complete.clone();
    calc.standard_medium_volume = "0".into();
    assert_eq!(calc.required_substance(), None);

    let mut calc = complete.clone();
    calc.standard_medium_volume = "inf".into();
    assert_eq!(calc.display_value(), "XXX");
    assert!(!calc.can_save());

    // 숫자 뒤에 붙은 글자는 무시한다
    let mut calc = complete;
    calc.standard_substance_volume = "10ml".into();
    assert_eq!(calc.display_value(), "20");
}

#[test]
fn saved_record_is_persisted_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(dir.path());
    session.calculator = filled(("10", ML), ("1", L), ("2", L));
    session.calculator.record_label = "Test".into();

    assert_eq!(session.save().unwrap(), Some(Notice::RecordSaved));
    assert_eq!(session.records().len(), 1);
    let saved = session.records()[0].clone();
    assert_eq!(saved.record_label.as_deref(), Some("Test"));
    assert_eq!(saved.required_substance, Some(20.0));

    let reopened = FileRecordStore::open_dir(dir.path()).unwrap();
    assert_eq!(reopened.list().unwrap(), vec![saved.clone()]);

    // 불러오면 입력이 복원되고 패널이 닫힌다
    let mut fresh = RatioSession::new(reopened, None);
    fresh.records_open = true;
    assert!(fresh.load(saved.id));
    assert!(!fresh.records_open);
    assert_eq!(fresh.calculator.display_value(), "20");
    assert_eq!(fresh.calculator.record_label, "Test");
}

#[test]
fn save_without_label_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(dir.path());
    session.calculator = filled(("10", ML), ("1", L), ("2", L));
    assert_eq!(session.save().unwrap(), None);
    assert!(!dir.path().join("records.json").exists());
}

#[test]
fn deleting_unknown_id_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(dir.path());
    session.calculator = filled(("1", L), ("10", L), ("5", L));
    session.calculator.record_label = "keep".into();
    session.save().unwrap();

    let path = dir.path().join("records.json");
    let before = std::fs::read_to_string(&path).unwrap();
    assert_eq!(session.delete(RecordId::generate()).unwrap(), None);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

    let id = session.records()[0].id;
    assert_eq!(session.delete(id).unwrap(), Some(Notice::RecordDeleted));
    assert!(session.records().is_empty());
}

#[test]
fn legacy_records_without_ids_still_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("records.json"), LEGACY_RECORDS).unwrap();
    let session = open_session(dir.path());
    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].result_summary(), "20 ml");
}

#[test]
fn legacy_record_can_be_deleted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("records.json"), LEGACY_RECORDS).unwrap();

    // 한 번 실행에서 본 id로 다음 실행에서도 지울 수 있어야 한다
    let first = open_session(dir.path());
    let id = first.records()[0].id;
    drop(first);

    let mut session = open_session(dir.path());
    assert_eq!(session.records()[0].id, id);
    assert_eq!(session.delete(id).unwrap(), Some(Notice::RecordDeleted));
    assert!(session.records().is_empty());

    let on_disk = FileRecordStore::open_dir(dir.path()).unwrap().list().unwrap();
    assert!(on_disk.is_empty());
}
