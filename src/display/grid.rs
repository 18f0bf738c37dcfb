use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;

use crate::config::GridConfig;

/// 빈 칸.
pub const BLANK: char = ' ';

/// 장식용 문자 풀.
pub const DECORATIVE_CHARS: [char; 27] = [
    '.', ',', '!', ';', ':', '~', '_', '-', '+', '*', '#', '@', '$', '%', '&', '(', ')', '[', ']',
    '{', '}', '<', '>', '?', '/', '|', '\\',
];

/// 목표 문자 풀. 이 문자가 든 칸만 목표 개수에 포함된다.
pub const TARGET_CHARS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// 행 양 끝의 테두리와 여백이 차지하는 칸 수.
const ROW_RESERVED: usize = 4;
/// 막대 제목의 `+`, `[`, `]`, `+`와 여백 두 칸.
const BAR_RESERVED: usize = 6;

/// 칸 문자의 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Blank,
    Decorative,
    Target,
}

pub fn classify(c: char) -> CellClass {
    if TARGET_CHARS.contains(&c) {
        CellClass::Target
    } else if c == BLANK {
        CellClass::Blank
    } else {
        CellClass::Decorative
    }
}

/// 그리드의 한 행. 각 행은 자기 칸만 바꾼다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<char>,
}

impl Row {
    pub fn blank(width: usize) -> Self {
        Self {
            cells: vec![BLANK; width],
        }
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn target_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| classify(**c) == CellClass::Target)
            .count()
    }

    /// 타이머 한 번의 변화. 임의 칸 하나를 `lottery` 확률로 장식 문자로,
    /// 나머지 확률로 빈 칸으로 바꾼다. 목표 칸은 빈 칸으로 지우지 않는다.
    ///
    /// 칸이 실제로 바뀌었으면 true.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, lottery: f64) -> bool {
        if self.cells.is_empty() {
            return false;
        }
        let index = rng.gen_range(0..self.cells.len());
        let next = if rng.gen::<f64>() > lottery {
            BLANK
        } else {
            DECORATIVE_CHARS[rng.gen_range(0..DECORATIVE_CHARS.len())]
        };
        let current = self.cells[index];
        if next == BLANK && classify(current) == CellClass::Target {
            return false;
        }
        self.cells[index] = next;
        current != next
    }

    /// 클릭한 칸을 임의의 목표 문자로 바꾼다. 범위를 벗어난 칸은 무시한다.
    pub fn click<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> bool {
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        *cell = TARGET_CHARS[rng.gen_range(0..TARGET_CHARS.len())];
        true
    }
}

/// 행마다 잠금을 따로 두는 문자 그리드.
///
/// 행 타이머는 자기 행의 잠금만 잡으므로 행끼리는 서로 기다리지 않는다.
#[derive(Debug, Clone)]
pub struct Grid {
    cols: usize,
    target_count: usize,
    rows: Vec<Arc<Mutex<Row>>>,
}

/// 한 시점의 그리드 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFrame {
    pub cols: usize,
    pub target_count: usize,
    pub rows: Vec<Row>,
}

impl Grid {
    pub fn new(cols: usize, lines: usize, target_count: usize) -> Self {
        let width = cols.saturating_sub(ROW_RESERVED);
        Self {
            cols,
            target_count,
            rows: (0..lines)
                .map(|_| Arc::new(Mutex::new(Row::blank(width))))
                .collect(),
        }
    }

    pub fn from_config(cfg: &GridConfig) -> Self {
        Self::new(cfg.cols, cfg.lines, cfg.target_count)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn lines(&self) -> usize {
        self.rows.len()
    }

    /// 행 타이머에 넘길 행 핸들.
    pub fn row_handle(&self, line: usize) -> Option<Arc<Mutex<Row>>> {
        self.rows.get(line).cloned()
    }

    pub fn click<R: Rng + ?Sized>(&self, line: usize, index: usize, rng: &mut R) -> bool {
        match self.rows.get(line) {
            Some(row) => lock_row(row).click(index, rng),
            None => false,
        }
    }

    pub fn snapshot(&self) -> GridFrame {
        GridFrame {
            cols: self.cols,
            target_count: self.target_count,
            rows: self.rows.iter().map(|r| lock_row(r).clone()).collect(),
        }
    }
}

/// 잠금이 오염돼도 행 데이터는 문자 배열뿐이라 그대로 쓴다.
pub(crate) fn lock_row(row: &Mutex<Row>) -> MutexGuard<'_, Row> {
    row.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl GridFrame {
    /// 모든 행의 목표 칸 합계.
    pub fn total_targets(&self) -> usize {
        self.rows.iter().map(Row::target_count).sum()
    }

    /// 합계가 기준 이상이면 테마가 바뀐다.
    pub fn target_hit(&self) -> bool {
        self.total_targets() >= self.target_count
    }

    /// 아래 막대 제목. 예: `stable: 003//010`
    pub fn status_title(&self) -> String {
        let state = if self.target_hit() { "unstable" } else { "stable" };
        format!(
            "{state}: {:03}//{:03}",
            self.total_targets(),
            self.target_count
        )
    }

    /// 그리드 아래의 연락처 줄. 기준을 넘기 전에는 가려져 있다.
    pub fn footer(&self) -> &'static str {
        if self.target_hit() {
            "[ hello@tristo.dev - github.com/r3oath ]"
        } else {
            "[ #####@######.### - ######.###/###### ]"
        }
    }

    /// 테두리 포함 전체 텍스트 줄.
    pub fn render_lines(&self, title: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render_bar(title, self.cols));
        lines.extend(self.rows.iter().map(render_row));
        lines.push(render_bar(&self.status_title(), self.cols));
        lines
    }
}

/// `+---[ title ]---+` 형태의 막대. 여백은 내림한다.
pub fn render_bar(title: &str, cols: usize) -> String {
    let padding = cols.saturating_sub(BAR_RESERVED + title.chars().count()) / 2;
    let dashes = "-".repeat(padding);
    format!("+{dashes}[ {title} ]{dashes}+")
}

/// `+ cells +` 형태의 행.
pub fn render_row(row: &Row) -> String {
    let cells: String = row.cells().iter().collect();
    format!("+ {cells} +")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn classifies_chars() {
        assert_eq!(classify(' '), CellClass::Blank);
        assert_eq!(classify('7'), CellClass::Target);
        assert_eq!(classify('#'), CellClass::Decorative);
        assert!(DECORATIVE_CHARS
            .iter()
            .all(|c| classify(*c) == CellClass::Decorative));
    }

    #[test]
    fn bar_matches_grid_width_for_even_padding() {
        let bar = render_bar("tristo.dev", 40);
        assert_eq!(bar, "+------------[ tristo.dev ]------------+");
        assert_eq!(bar.chars().count(), 40);
    }

    #[test]
    fn row_has_full_width() {
        let grid = Grid::new(40, 2, 10);
        let frame = grid.snapshot();
        assert_eq!(render_row(&frame.rows[0]).chars().count(), 40);
    }

    #[test]
    fn tick_never_blanks_a_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut row = Row::blank(3);
        for i in 0..3 {
            row.click(i, &mut rng);
        }
        let before = row.clone();
        for _ in 0..200 {
            assert!(!row.tick(&mut rng, 0.0));
        }
        assert_eq!(row, before);
        assert_eq!(row.target_count(), 3);
    }

    #[test]
    fn tick_with_zero_lottery_only_blanks() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut row = Row::blank(8);
        for _ in 0..100 {
            assert!(!row.tick(&mut rng, 0.0));
        }
        assert_eq!(row.target_count(), 0);
    }

    #[test]
    fn click_out_of_range_is_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = Grid::new(10, 1, 1);
        assert!(!grid.click(0, 99, &mut rng));
        assert!(!grid.click(5, 0, &mut rng));
        assert!(grid.click(0, 0, &mut rng));
        assert!(grid.snapshot().target_hit());
    }
}
