use std::time::Duration;

use crate::config::SplashConfig;

/// 깜빡이는 블록 커서.
pub const CURSOR: char = '█';

/// 스플래시 화면의 깜빡이는 커서. 주기의 앞 절반 동안 보인다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splash {
    text: String,
    period: Duration,
}

impl Splash {
    pub fn new(text: impl Into<String>, period: Duration) -> Self {
        Self {
            text: text.into(),
            period: period.max(Duration::from_millis(2)),
        }
    }

    pub fn from_config(cfg: &SplashConfig) -> Self {
        Self::new(cfg.text.clone(), Duration::from_millis(cfg.blink_ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn cursor_visible(&self, elapsed: Duration) -> bool {
        let period = self.period.as_millis();
        elapsed.as_millis() % period < period / 2
    }

    /// 경과 시간에 맞춘 화면 문자열. 커서가 숨은 동안에도 폭은 같다.
    pub fn render(&self, elapsed: Duration) -> String {
        let cursor = if self.cursor_visible(elapsed) { CURSOR } else { ' ' };
        format!("{}{cursor}", self.text)
    }

    /// 다음 깜빡임까지 남은 시간. 화면 갱신 예약에 쓴다.
    pub fn until_next_toggle(&self, elapsed: Duration) -> Duration {
        let period = self.period.as_millis();
        let half = period / 2;
        let into = elapsed.as_millis() % period;
        let boundary = if into < half { half } else { period };
        Duration::from_millis((boundary - into) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_blinks_each_half_period() {
        let splash = Splash::new("> tristo.dev ", Duration::from_millis(1000));
        assert!(splash.cursor_visible(Duration::ZERO));
        assert!(splash.cursor_visible(Duration::from_millis(499)));
        assert!(!splash.cursor_visible(Duration::from_millis(500)));
        assert!(splash.cursor_visible(Duration::from_millis(1000)));
        assert_eq!(splash.render(Duration::ZERO), "> tristo.dev █");
        assert_eq!(splash.render(Duration::from_millis(750)), "> tristo.dev  ");
    }

    #[test]
    fn next_toggle_is_within_half_period() {
        let splash = Splash::new("", Duration::from_millis(1000));
        let at = |ms| splash.until_next_toggle(Duration::from_millis(ms));
        assert_eq!(at(100), Duration::from_millis(400));
        assert_eq!(at(500), Duration::from_millis(500));
    }

    #[test]
    fn next_toggle_lands_on_visibility_change_for_odd_periods() {
        let splash = Splash::new("", Duration::from_millis(1001));
        let at = |ms| splash.until_next_toggle(Duration::from_millis(ms));
        assert_eq!(at(499), Duration::from_millis(1));
        assert_eq!(at(500), Duration::from_millis(501));
        for ms in 0..3003u64 {
            let now = Duration::from_millis(ms);
            let wait = splash.until_next_toggle(now);
            let before = now + wait - Duration::from_millis(1);
            assert_eq!(splash.cursor_visible(before), splash.cursor_visible(now), "{ms}");
            assert_ne!(splash.cursor_visible(now + wait), splash.cursor_visible(now), "{ms}");
        }
    }

    #[test]
    fn zero_period_is_clamped() {
        let splash = Splash::new("x", Duration::ZERO);
        assert_eq!(splash.period(), Duration::from_millis(2));
        let _ = splash.render(Duration::from_millis(3));
    }
}
