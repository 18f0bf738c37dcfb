use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crate::app::AppError;
use crate::config::Config;
use crate::display::{Grid, RowTickers, Splash, SITE_TITLE};
use crate::notify::Notice;
use crate::record::SavedRecord;
use crate::session::{notice_from, RatioSession};
use crate::store::RecordStore;
use crate::units::VolumeUnit;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RatioCalculator,
    Records,
    Landing,
    Splash,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu() -> Result<MenuChoice, AppError> {
    println!("\n=== {SITE_TITLE} ===");
    println!("1) Ratio calculator");
    println!("2) Saved records");
    println!("3) Landing animation");
    println!("4) Splash");
    println!("5) Settings");
    println!("0) Exit");
    loop {
        let sel = read_line("Select: ")?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::RatioCalculator),
            "2" => return Ok(MenuChoice::Records),
            "3" => return Ok(MenuChoice::Landing),
            "4" => return Ok(MenuChoice::Splash),
            "5" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("Invalid selection, try again."),
        }
    }
}

/// 비율 계산기 메뉴를 처리한다. 빈 입력은 현재 값을 유지한다.
pub fn handle_ratio_calculator<S: RecordStore>(
    session: &mut RatioSession<S>,
) -> Result<(), AppError> {
    println!("\n-- Ratio calculator --");
    println!("Press enter to keep the value shown in brackets.");
    let calc = &mut session.calculator;
    read_text_into("Standard substance", &mut calc.standard_substance_volume)?;
    if let Some(unit) = read_unit("Substance unit", calc.standard_substance_unit)? {
        calc.select_substance_unit(unit);
    }
    read_text_into("Standard medium", &mut calc.standard_medium_volume)?;
    calc.standard_medium_unit = read_unit("Medium unit", calc.standard_medium_unit)?;
    read_text_into("Target medium", &mut calc.target_volume)?;
    calc.target_unit = read_unit("Target unit", calc.target_unit)?;
    calc.required_substance_unit = read_unit("Result unit", calc.required_substance_unit)?;

    loop {
        print_result(session);
        println!("1) Optimise  2) Save record  0) Back");
        let sel = read_line("Select: ")?;
        match sel.trim() {
            "1" => match session.optimise() {
                Some(notice) => print_notice(&notice),
                None => println!("Nothing to optimise."),
            },
            "2" => {
                read_text_into("Record label", &mut session.calculator.record_label)?;
                if !session.calculator.can_save() {
                    println!("Cannot save: needs a valid result and a label.");
                    continue;
                }
                if let Some(notice) = notice_from(session.save()) {
                    print_notice(&notice);
                }
            }
            "0" | "" => break,
            _ => println!("Invalid selection."),
        }
    }
    Ok(())
}

/// 저장된 레코드 메뉴를 처리한다.
pub fn handle_records<S: RecordStore>(session: &mut RatioSession<S>) -> Result<(), AppError> {
    session.records_open = true;
    while session.records_open {
        println!("\n-- Records --");
        if session.records().is_empty() {
            println!("No records saved");
            session.records_open = false;
            break;
        }
        for (i, rec) in session.records().iter().enumerate() {
            println!("{}", format_record(i + 1, rec));
        }
        println!("1) Load  2) Delete  0) Back");
        let sel = read_line("Select: ")?;
        let action = sel.trim().to_string();
        if action == "0" || action.is_empty() {
            session.records_open = false;
            break;
        }
        if action != "1" && action != "2" {
            println!("Invalid selection.");
            continue;
        }
        let Some(index) = read_index(session.records().len())? else {
            println!("No such record.");
            continue;
        };
        let id = session.records()[index].id;
        if action == "1" {
            session.load(id);
            println!("Loaded \"{}\".", session.calculator.record_label);
            print_result(session);
        } else if let Some(notice) = notice_from(session.delete(id)) {
            print_notice(&notice);
        }
    }
    Ok(())
}

/// 랜딩 그리드 애니메이션을 터미널에 몇 프레임 보여준 뒤 칸 클릭을 받는다.
pub fn handle_landing_preview(cfg: &Config) -> Result<(), AppError> {
    let grid = Grid::from_config(&cfg.grid);
    {
        let _tickers = RowTickers::spawn(&grid, &cfg.grid, || {});
        for _ in 0..12 {
            print_frame(&grid);
            thread::sleep(Duration::from_millis(300));
        }
    }
    let mut rng = rand::thread_rng();
    loop {
        let sel = read_line("Click cell as `row col` (enter to leave): ")?;
        let mut parts = sel.split_whitespace().map(str::parse::<usize>);
        match (parts.next(), parts.next()) {
            (Some(Ok(line)), Some(Ok(col))) if line >= 1 && col >= 1 => {
                if !grid.click(line - 1, col - 1, &mut rng) {
                    println!("Out of range.");
                }
                print_frame(&grid);
            }
            (None, _) => break,
            _ => println!("Enter two numbers, e.g. `3 12`."),
        }
    }
    Ok(())
}

/// 스플래시 화면을 잠깐 보여준다.
pub fn handle_splash_preview(cfg: &Config) -> Result<(), AppError> {
    let splash = Splash::from_config(&cfg.splash);
    let start = Instant::now();
    let mut out = io::stdout();
    while start.elapsed() < splash.period() * 3 {
        let elapsed = start.elapsed();
        write!(out, "\r{}", splash.render(elapsed))?;
        out.flush()?;
        thread::sleep(splash.until_next_toggle(elapsed));
    }
    println!();
    Ok(())
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(cfg: &mut Config) -> Result<(), AppError> {
    println!("\n-- Settings --");
    println!("Data directory: {}", cfg.resolve_data_dir().display());
    let current = cfg
        .default_unit
        .map(VolumeUnit::label)
        .unwrap_or("follow substance unit");
    println!("Default result unit: {current}");
    println!("1) Milliliters  2) Liters  3) Follow substance unit");
    let sel = read_line("Change to (enter to cancel): ")?;
    if sel.trim().is_empty() {
        return Ok(());
    }
    cfg.default_unit = match sel.trim() {
        "1" => Some(VolumeUnit::Milliliter),
        "2" => Some(VolumeUnit::Liter),
        "3" => None,
        _ => {
            println!("Invalid input, leaving it unchanged.");
            cfg.default_unit
        }
    };
    Ok(())
}

/// 레코드 한 건을 목록용 여러 줄 문자열로 만든다.
pub fn format_record(number: usize, rec: &SavedRecord) -> String {
    format!(
        "[{number}] {}  {}\n    Standard rate: {}\n    Target: {}\n    id: {}",
        rec.result_summary(),
        rec.label(),
        rec.standard_rate_summary(),
        rec.target_summary(),
        rec.id
    )
}

fn print_result<S>(session: &RatioSession<S>) {
    let calc = &session.calculator;
    println!(
        "Required substance: {} {}",
        calc.display_value(),
        calc.display_unit()
    );
}

fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("{notice}");
    } else {
        println!("{notice}");
    }
}

fn print_frame(grid: &Grid) {
    let frame = grid.snapshot();
    // 화면 지우고 커서를 맨 위로
    print!("\x1b[2J\x1b[H");
    for line in frame.render_lines(SITE_TITLE) {
        println!("{line}");
    }
    println!("\n{}", frame.footer());
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

fn read_text_into(prompt: &str, value: &mut String) -> Result<(), AppError> {
    let s = read_line(&format!("{prompt} [{value}]: "))?;
    let s = s.trim();
    if !s.is_empty() {
        *value = s.to_string();
    }
    Ok(())
}

fn read_unit(prompt: &str, current: Option<VolumeUnit>) -> Result<Option<VolumeUnit>, AppError> {
    let shown = current.map(VolumeUnit::code).unwrap_or("-");
    loop {
        let sel = read_line(&format!("{prompt} 1=ml 2=l [{shown}]: "))?;
        match sel.trim() {
            "" => return Ok(current),
            "1" => return Ok(Some(VolumeUnit::Milliliter)),
            "2" => return Ok(Some(VolumeUnit::Liter)),
            other => match crate::conversion::parse_volume_unit(other) {
                Ok(unit) => return Ok(Some(unit)),
                Err(e) => println!("{e}"),
            },
        }
    }
}

fn read_index(len: usize) -> Result<Option<usize>, AppError> {
    let s = read_line("Record number: ")?;
    Ok(s.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    #[test]
    fn record_listing_shows_summaries() {
        let rec = SavedRecord {
            id: RecordId::generate(),
            standard_substance_volume: Some("2".into()),
            standard_substance_unit: Some(VolumeUnit::Milliliter),
            standard_medium_volume: Some("1".into()),
            standard_medium_unit: Some(VolumeUnit::Liter),
            target_volume: Some("10".into()),
            target_unit: Some(VolumeUnit::Liter),
            required_substance_unit: Some(VolumeUnit::Milliliter),
            required_substance: Some(20.0),
            record_label: Some("feed".into()),
        };
        let text = format_record(1, &rec);
        assert!(text.starts_with("[1] 20 ml  feed"));
        assert!(text.contains("Standard rate: 2ml / 1l"));
        assert!(text.contains("Target: 10l"));
        assert!(text.contains(&rec.id.to_string()));
    }
}
