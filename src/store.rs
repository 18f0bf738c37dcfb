//! 로컬 키-값 저장소와 그 위의 레코드 저장소.
//!
//! `KeyValueStore`는 문자열 키마다 문자열 값 하나를 보관하는 가장 얇은
//! 계층이고, `RecordStore`는 `records` 키 하나에 레코드 배열 전체를 JSON으로
//! 읽고 쓰는 계층이다. 모든 쓰기는 목록 전체를 다시 쓴다.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::SavedRecord;

/// 레코드 배열이 저장되는 키.
pub const RECORDS_KEY: &str = "records";

/// 저장소 입출력 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 파일 입출력 오류
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON 직렬화/역직렬화 오류
    #[error("malformed value for key `{key}`: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// 파일명으로 쓸 수 없는 키
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// 문자열 키-값 저장소.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// 디렉터리 하나에 키마다 `<key>.json` 파일을 두는 저장소.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// 디렉터리가 없으면 만든다.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "opened file store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // 임시 파일에 쓴 뒤 rename 해서 반쯤 쓰인 파일이 남지 않게 한다.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// 메모리 저장소. 테스트와 임시 세션용.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 저장된 레코드의 순서 있는 목록을 다룬다. 삽입 순서가 곧 표시 순서이다.
pub trait RecordStore {
    /// 전체 목록. 키가 없으면 빈 목록.
    fn list(&self) -> Result<Vec<SavedRecord>, StoreError>;

    /// 목록 전체를 덮어쓴다.
    fn replace_all(&mut self, records: &[SavedRecord]) -> Result<(), StoreError>;

    /// 목록을 읽되, 읽으면서 새로 발급한 id가 있으면 바로 저장해 다음 읽기에도 같게 만든다.
    ///
    /// id를 읽을 때 발급하지 않는 저장소는 `list`와 같다.
    fn list_pinned(&mut self) -> Result<Vec<SavedRecord>, StoreError> {
        self.list()
    }

    /// 레코드를 끝에 추가하고 저장된 전체 목록을 돌려준다.
    fn append(&mut self, record: SavedRecord) -> Result<Vec<SavedRecord>, StoreError> {
        let mut records = self.list_pinned()?;
        records.push(record);
        self.replace_all(&records)?;
        Ok(records)
    }

    /// 조건에 맞는 첫 레코드를 지운다. 맞는 것이 없으면 아무것도 쓰지 않는다.
    fn remove_where<F>(&mut self, predicate: F) -> Result<Option<SavedRecord>, StoreError>
    where
        F: Fn(&SavedRecord) -> bool,
        Self: Sized,
    {
        let mut records = self.list_pinned()?;
        let Some(index) = records.iter().position(predicate) else {
            return Ok(None);
        };
        let removed = records.remove(index);
        self.replace_all(&records)?;
        Ok(Some(removed))
    }
}

/// `KeyValueStore`의 `records` 키 하나에 JSON 배열로 보관하는 레코드 저장소.
#[derive(Debug, Clone)]
pub struct KvRecordStore<S> {
    kv: S,
}

/// 파일 기반 레코드 저장소.
pub type FileRecordStore = KvRecordStore<FileStore>;

impl<S: KeyValueStore> KvRecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn inner(&self) -> &S {
        &self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }
}

impl FileRecordStore {
    /// 데이터 디렉터리의 파일 저장소를 연다.
    pub fn open_dir(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(FileStore::open(dir)?))
    }
}

impl<S: KeyValueStore> KvRecordStore<S> {
    /// 저장된 배열을 읽는다. 두 번째 값은 `id` 없이 저장돼 있던 레코드가 있었는지.
    fn read(&self) -> Result<(Vec<SavedRecord>, bool), StoreError> {
        let Some(raw) = self.kv.get(RECORDS_KEY)? else {
            return Ok((Vec::new(), false));
        };
        let json_err = |source: serde_json::Error| StoreError::Json {
            key: RECORDS_KEY.to_string(),
            source,
        };
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(json_err)?;
        let unpinned = values.iter().any(|v| v.get("id").is_none());
        let records = values
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<SavedRecord>, _>>()
            .map_err(json_err)?;
        tracing::debug!(count = records.len(), unpinned, "loaded records");
        Ok((records, unpinned))
    }
}

impl<S: KeyValueStore> RecordStore for KvRecordStore<S> {
    fn list(&self) -> Result<Vec<SavedRecord>, StoreError> {
        self.read().map(|(records, _)| records)
    }

    fn list_pinned(&mut self) -> Result<Vec<SavedRecord>, StoreError> {
        let (records, unpinned) = self.read()?;
        if unpinned {
            match self.replace_all(&records) {
                Ok(()) => tracing::info!(count = records.len(), "assigned ids to legacy records"),
                Err(e) => tracing::warn!(error = %e, "could not persist ids for legacy records"),
            }
        }
        Ok(records)
    }

    fn replace_all(&mut self, records: &[SavedRecord]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records).map_err(|source| StoreError::Json {
            key: RECORDS_KEY.to_string(),
            source,
        })?;
        self.kv.set(RECORDS_KEY, &raw)?;
        tracing::debug!(count = records.len(), "persisted records");
        Ok(())
    }
}
