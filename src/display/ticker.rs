use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::grid::{lock_row, Grid};
use crate::config::GridConfig;

/// 여러 스레드가 공유하는 취소 신호.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (flag, cvar) = &*self.inner;
        *flag.lock().unwrap_or_else(|p| p.into_inner()) = true;
        cvar.notify_all();
    }

    /// 최대 `timeout` 동안 기다린다. 그 사이 취소되면 true.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(|p| p.into_inner());
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(|p| p.into_inner());
        *guard
    }
}

/// 행마다 하나씩 도는 주기 타이머 묶음.
///
/// 각 행은 250~350ms 사이에서 고른 자기만의 주기로 자기 행만 바꾼다.
/// `cancel` 하거나 값을 버리면 모든 스레드를 멈추고 합류한다.
#[derive(Debug)]
pub struct RowTickers {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl RowTickers {
    /// 그리드의 모든 행에 타이머를 띄운다. 칸이 바뀔 때마다 `on_change`를 부른다.
    pub fn spawn<F>(grid: &Grid, cfg: &GridConfig, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let on_change = Arc::new(on_change);
        let (min_ms, max_ms) = cfg.tick_range_ms();
        let lottery = cfg.lottery;
        let mut seed_rng = rand::thread_rng();

        let handles = (0..grid.lines())
            .filter_map(|line| grid.row_handle(line).map(|row| (line, row)))
            .map(|(line, row)| {
                let token = token.clone();
                let on_change = Arc::clone(&on_change);
                let mut rng = StdRng::seed_from_u64(seed_rng.gen());
                let interval = Duration::from_millis(rng.gen_range(min_ms..=max_ms));
                thread::Builder::new()
                    .name(format!("grid-row-{line}"))
                    .spawn(move || {
                        while !token.wait_timeout(interval) {
                            let changed = lock_row(&row).tick(&mut rng, lottery);
                            if changed {
                                on_change();
                            }
                        }
                    })
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::warn!(error = %e, "could not spawn row ticker");
                    None
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(rows = handles.len(), "row tickers started");
        Self { token, handles }
    }

    pub fn running(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// 모든 타이머를 멈추고 스레드가 끝날 때까지 기다린다.
    pub fn cancel(&mut self) {
        self.token.cancel();
        let stopped = self.handles.len();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("row ticker panicked");
            }
        }
        if stopped > 0 {
            tracing::debug!(rows = stopped, "row tickers stopped");
        }
    }
}

impl Drop for RowTickers {
    fn drop(&mut self) {
        self.cancel();
    }
}
