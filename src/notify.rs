//! 저장/삭제/단위 변환 시 잠깐 띄우는 알림(토스트).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// 사용자에게 알릴 이벤트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    RecordSaved,
    RecordDeleted,
    ConvertedToMilliliters,
    ConvertedToLiters,
    /// 저장소 오류 등 사용자에게 보여줄 실패 메시지
    Error(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::RecordSaved => "Record saved".into(),
            Notice::RecordDeleted => "Record deleted".into(),
            Notice::ConvertedToMilliliters => "Converted to milliliters".into(),
            Notice::ConvertedToLiters => "Converted to liters".into(),
            Notice::Error(msg) => format!("Error: {msg}"),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// 일정 시간이 지나면 사라지는 알림 큐.
#[derive(Debug, Clone)]
pub struct Toasts {
    ttl: Duration,
    max_visible: usize,
    items: VecDeque<(Notice, Instant)>,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), 3)
    }
}

impl Toasts {
    pub fn new(ttl: Duration, max_visible: usize) -> Self {
        Self {
            ttl,
            max_visible: max_visible.max(1),
            items: VecDeque::new(),
        }
    }

    /// 알림을 추가한다. 한도를 넘으면 가장 오래된 것부터 버린다.
    pub fn push(&mut self, notice: Notice, now: Instant) {
        self.items.push_back((notice, now));
        while self.items.len() > self.max_visible {
            self.items.pop_front();
        }
    }

    /// 만료된 알림을 정리하고 남은 알림을 오래된 순으로 돌려준다.
    pub fn active(&mut self, now: Instant) -> impl Iterator<Item = &Notice> {
        let ttl = self.ttl;
        self.items
            .retain(|(_, at)| now.saturating_duration_since(*at) < ttl);
        self.items.iter().map(|(n, _)| n)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
