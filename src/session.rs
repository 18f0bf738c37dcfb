//! 계산기 입력 상태와 레코드 저장소를 묶은 화면 단위 세션.

use crate::calculator::RatioCalculator;
use crate::notify::Notice;
use crate::record::{RecordId, SavedRecord};
use crate::store::{RecordStore, StoreError};
use crate::units::VolumeUnit;

/// 비율 계산기 화면 하나의 상태.
#[derive(Debug)]
pub struct RatioSession<S> {
    pub calculator: RatioCalculator,
    /// 레코드 목록 패널 열림 여부
    pub records_open: bool,
    records: Vec<SavedRecord>,
    store: S,
}

impl<S: RecordStore> RatioSession<S> {
    /// 시작 시 저장된 목록을 한 번 읽는다. 읽지 못하면 경고만 남기고 빈 목록으로 시작한다.
    pub fn new(mut store: S, default_unit: Option<VolumeUnit>) -> Self {
        let records = match store.list_pinned() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved records, starting empty");
                Vec::new()
            }
        };
        tracing::info!(count = records.len(), "ratio session ready");
        Self {
            calculator: RatioCalculator::with_output_unit(default_unit),
            records_open: false,
            records,
            store,
        }
    }

    pub fn records(&self) -> &[SavedRecord] {
        &self.records
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn find(&self, id: RecordId) -> Option<&SavedRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// 현재 입력을 새 레코드로 저장한다. 저장 조건을 못 맞추면 아무것도 쓰지 않고 None.
    pub fn save(&mut self) -> Result<Option<Notice>, StoreError> {
        let Some(record) = self.calculator.snapshot() else {
            return Ok(None);
        };
        let id = record.id;
        self.records = self.store.append(record)?;
        tracing::info!(%id, label = %self.calculator.record_label, "record saved");
        Ok(Some(Notice::RecordSaved))
    }

    /// 레코드를 입력 상태로 불러오고 목록 패널을 닫는다. 없는 id면 false.
    pub fn load(&mut self, id: RecordId) -> bool {
        let Some(record) = self.records.iter().find(|r| r.id == id) else {
            return false;
        };
        self.calculator.load(record);
        self.records_open = false;
        tracing::debug!(%id, "record loaded");
        true
    }

    /// 레코드를 지운다. 저장된 목록에 없으면 아무 일도 하지 않고 None.
    pub fn delete(&mut self, id: RecordId) -> Result<Option<Notice>, StoreError> {
        if self.store.remove_where(|r| r.id == id)?.is_none() {
            tracing::debug!(%id, "delete requested for unknown record");
            return Ok(None);
        }
        self.records = self.store.list()?;
        tracing::info!(%id, "record deleted");
        Ok(Some(Notice::RecordDeleted))
    }

    pub fn optimise(&mut self) -> Option<Notice> {
        self.calculator.optimise()
    }
}

/// 저장소 결과를 알림 하나로 접는다. 오류는 로그를 남기고 오류 알림으로 바꾼다.
pub fn notice_from(result: Result<Option<Notice>, StoreError>) -> Option<Notice> {
    match result {
        Ok(notice) => notice,
        Err(e) => {
            tracing::error!(error = %e, "record store failure");
            Some(Notice::Error(e.to_string()))
        }
    }
}
