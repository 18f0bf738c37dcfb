#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{env, fs};
use tristo_toolbox::{
    config,
    display::{self, grid, CellClass, Grid, RowTickers, Splash, SITE_TITLE},
    logging,
    notify::{Notice, Toasts},
    session::{notice_from, RatioSession},
    store::FileRecordStore,
    units::VolumeUnit,
};

const GREEN: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);
const RED: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const MUTED: egui::Color32 = egui::Color32::from_rgb(82, 82, 82);

fn main() -> Result<(), eframe::Error> {
    logging::init("info");

    // --config <path> 또는 --config=<path>
    let mut config_path = PathBuf::from(config::DEFAULT_CONFIG_PATH);
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--config=") {
            config_path = PathBuf::from(val);
        } else if a == "--config" && i + 1 < args.len() {
            config_path = PathBuf::from(&args[i + 1]);
            i += 1;
        }
        i += 1;
    }

    let app_cfg = match config::load_or_default_at(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "using default config");
            config::Config::default()
        }
    };
    let store = open_store(&app_cfg);

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(960.0, 720.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        SITE_TITLE,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(GuiApp::new(
                app_cfg,
                config_path,
                store,
                Some(cc.egui_ctx.clone()),
            ))
        }),
    )
}

/// 설정의 데이터 디렉터리를 열고, 실패하면 임시 디렉터리로 물러난다.
fn open_store(cfg: &config::Config) -> FileRecordStore {
    let dir = cfg.resolve_data_dir();
    match FileRecordStore::open_dir(&dir) {
        Ok(store) => store,
        Err(e) => {
            let fallback = env::temp_dir().join("tristo_toolbox");
            tracing::error!(error = %e, fallback = %fallback.display(), "data dir unavailable");
            match FileRecordStore::open_dir(&fallback) {
                Ok(store) => store,
                Err(e) => {
                    eprintln!("Storage error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn heading_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.heading(text).on_hover_text(tip)
}

fn mono(text: impl Into<String>, color: egui::Color32) -> egui::RichText {
    egui::RichText::new(text).monospace().size(18.0).color(color)
}

/// 단위 콤보박스. 새로 고른 단위가 있으면 돌려준다.
fn unit_combo(ui: &mut egui::Ui, id: &str, current: Option<VolumeUnit>) -> Option<VolumeUnit> {
    let mut picked = None;
    egui::ComboBox::from_id_source(id)
        .selected_text(current.map(VolumeUnit::label).unwrap_or("Unit"))
        .show_ui(ui, |ui| {
            for unit in VolumeUnit::ALL {
                if ui
                    .selectable_label(current == Some(unit), unit.label())
                    .clicked()
                {
                    picked = Some(unit);
                }
            }
        });
    picked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Landing,
    Splash,
    Ratio,
}

/// 레코드 패널에서 고른 동작. 목록을 빌린 채로 세션을 바꿀 수 없어 모아 두었다가 처리한다.
enum RecordAction {
    Load(tristo_toolbox::record::RecordId),
    Delete(tristo_toolbox::record::RecordId),
}

struct GuiApp {
    config: config::Config,
    config_path: PathBuf,
    tab: Tab,
    window_alpha: f32,
    show_settings_modal: bool,
    settings_status: Option<String>,
    // 비율 계산기
    session: RatioSession<FileRecordStore>,
    toasts: Toasts,
    // 랜딩 그리드
    grid: Grid,
    tickers: Option<RowTickers>,
    repaint: Option<egui::Context>,
    // 스플래시
    splash: Splash,
    splash_started: Instant,
}

impl GuiApp {
    fn new(
        config: config::Config,
        config_path: PathBuf,
        store: FileRecordStore,
        repaint: Option<egui::Context>,
    ) -> Self {
        let session = RatioSession::new(store, config.default_unit);
        let mut app = Self {
            grid: Grid::from_config(&config.grid),
            splash: Splash::from_config(&config.splash),
            window_alpha: config.window_alpha,
            config,
            config_path,
            tab: Tab::Landing,
            show_settings_modal: false,
            settings_status: None,
            session,
            toasts: Toasts::default(),
            tickers: None,
            repaint,
            splash_started: Instant::now(),
        };
        app.start_tickers();
        app
    }

    /// 화면을 바꾼다. 랜딩을 떠나면 행 타이머를 멈추고 돌아오면 다시 띄운다.
    fn set_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        if self.tab == Tab::Landing {
            self.tickers = None;
        }
        self.tab = tab;
        match tab {
            Tab::Landing => self.start_tickers(),
            Tab::Splash => self.splash_started = Instant::now(),
            Tab::Ratio => {}
        }
    }

    fn start_tickers(&mut self) {
        if self.tickers.is_some() {
            return;
        }
        let ctx = self.repaint.clone();
        self.tickers = Some(RowTickers::spawn(&self.grid, &self.config.grid, move || {
            if let Some(ctx) = &ctx {
                ctx.request_repaint();
            }
        }));
    }

    fn notify(&mut self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            self.toasts.push(notice, Instant::now());
        }
    }

    /// 사이드 메뉴를 제공한다.
    fn ui_nav(&mut self, ui: &mut egui::Ui) {
        ui.style_mut().wrap = Some(false);
        ui.vertical_centered(|ui| {
            ui.heading("Menu");
            ui.add_space(8.0);
        });
        for (tab, label) in [
            (Tab::Landing, "Landing"),
            (Tab::Splash, "Splash"),
            (Tab::Ratio, "Ratio calculator"),
        ] {
            let selected = self.tab == tab;
            let button = egui::Button::new(label)
                .fill(if selected {
                    ui.visuals().selection.bg_fill
                } else {
                    ui.visuals().extreme_bg_color
                })
                .min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).on_hover_text("Switch page").clicked() {
                self.set_tab(tab);
            }
            ui.add_space(4.0);
        }
    }

    fn ui_landing(&mut self, ui: &mut egui::Ui) {
        let frame = self.grid.snapshot();
        let theme = if frame.target_hit() { RED } else { GREEN };
        let mut clicks = Vec::new();
        ui.vertical_centered(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(0.0, 0.0);
            ui.add_space(24.0);
            ui.label(mono(grid::render_bar(SITE_TITLE, frame.cols), theme));
            for (line, row) in frame.rows.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(mono("+ ", theme));
                    for (index, c) in row.cells().iter().enumerate() {
                        let color = match display::classify(*c) {
                            CellClass::Target => RED,
                            _ => GREEN,
                        };
                        let cell = egui::Label::new(mono(c.to_string(), color))
                            .sense(egui::Sense::click());
                        if ui.add(cell).clicked() {
                            clicks.push((line, index));
                        }
                    }
                    ui.label(mono(" +", theme));
                });
            }
            ui.label(mono(grid::render_bar(&frame.status_title(), frame.cols), theme));
            ui.add_space(24.0);
            ui.label(mono(frame.footer(), theme));
        });
        if !clicks.is_empty() {
            let mut rng = rand_rng();
            for (line, index) in clicks {
                self.grid.click(line, index, &mut rng);
            }
        }
    }

    fn ui_splash(&mut self, ui: &mut egui::Ui) {
        let elapsed = self.splash_started.elapsed();
        ui.centered_and_justified(|ui| {
            ui.label(mono(self.splash.render(elapsed), GREEN).size(32.0));
        });
        ui.ctx()
            .request_repaint_after(self.splash.until_next_toggle(elapsed));
    }

    fn ui_ratio(&mut self, ui: &mut egui::Ui) {
        let mut notices = Vec::new();
        ui.vertical_centered(|ui| {
            ui.set_max_width(380.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                heading_with_tip(ui, "Standard rate", "Known substance : medium ratio");
                let calc = &mut self.session.calculator;
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut calc.standard_substance_volume)
                            .hint_text("Substance"),
                    );
                    if let Some(unit) =
                        unit_combo(ui, "substance_unit", calc.standard_substance_unit)
                    {
                        calc.select_substance_unit(unit);
                    }
                });
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut calc.standard_medium_volume)
                            .hint_text("Medium"),
                    );
                    if let Some(unit) = unit_combo(ui, "medium_unit", calc.standard_medium_unit) {
                        calc.standard_medium_unit = Some(unit);
                    }
                });
            });
            ui.add_space(12.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                heading_with_tip(ui, "Target", "Medium volume to scale the ratio to");
                let calc = &mut self.session.calculator;
                ui.horizontal(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut calc.target_volume).hint_text("Medium"));
                    if let Some(unit) = unit_combo(ui, "target_unit", calc.target_unit) {
                        calc.target_unit = Some(unit);
                    }
                });
            });
            ui.add_space(12.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                heading_with_tip(ui, "Required substance", "Substance needed at the target scale");
                let calc = &mut self.session.calculator;
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(calc.display_value()).size(48.0).strong());
                    ui.label(egui::RichText::new(calc.display_unit()).size(48.0).color(MUTED));
                });
                ui.horizontal(|ui| {
                    let current = self.session.calculator.required_substance_unit;
                    if let Some(unit) = unit_combo(ui, "result_unit", current) {
                        self.session.calculator.required_substance_unit = Some(unit);
                    }
                    if ui.button("Optimise").clicked() {
                        notices.push(self.session.optimise());
                    }
                });
            });
            ui.add_space(12.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.heading("Actions");
                ui.add(
                    egui::TextEdit::singleline(&mut self.session.calculator.record_label)
                        .hint_text("Record label"),
                );
                ui.horizontal(|ui| {
                    let can_save = self.session.calculator.can_save();
                    if ui
                        .add_enabled(can_save, egui::Button::new("Save record"))
                        .clicked()
                    {
                        notices.push(notice_from(self.session.save()));
                    }
                    if ui.button("View records").clicked() {
                        self.session.records_open = !self.session.records_open;
                    }
                });
            });
        });
        for notice in notices {
            self.notify(notice);
        }
    }

    fn ui_records_panel(&mut self, ctx: &egui::Context) {
        let mut action = None;
        let mut open = self.session.records_open;
        egui::SidePanel::right("records_panel")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Records");
                    if ui.button("Close").clicked() {
                        open = false;
                    }
                });
                ui.label("View a list of all local saved records");
                ui.separator();
                if self.session.records().is_empty() {
                    ui.vertical_centered(|ui| ui.label("No records saved"));
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for rec in self.session.records() {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(egui::RichText::new(rec.result_summary()).size(28.0).strong());
                            ui.label(egui::RichText::new(rec.label()).strong());
                            ui.label(format!("Standard rate: {}", rec.standard_rate_summary()));
                            ui.label(format!("Target: {}", rec.target_summary()));
                            ui.horizontal(|ui| {
                                if ui.button("Load").clicked() {
                                    action = Some(RecordAction::Load(rec.id));
                                }
                                if ui.button("Delete").clicked() {
                                    action = Some(RecordAction::Delete(rec.id));
                                }
                            });
                        });
                        ui.add_space(6.0);
                    }
                });
            });
        self.session.records_open = open;
        match action {
            Some(RecordAction::Load(id)) => {
                self.session.load(id);
            }
            Some(RecordAction::Delete(id)) => {
                let notice = notice_from(self.session.delete(id));
                self.notify(notice);
            }
            None => {}
        }
    }

    fn ui_toasts(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let notices: Vec<Notice> = self.toasts.active(now).cloned().collect();
        if notices.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                for notice in &notices {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        let text = egui::RichText::new(notice.message());
                        ui.label(if notice.is_error() { text.color(RED) } else { text });
                    });
                }
            });
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings_modal;
        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Records directory: {}",
                    self.config.resolve_data_dir().display()
                ));
                ui.separator();
                ui.label("Default result unit");
                let default_unit = &mut self.config.default_unit;
                ui.horizontal(|ui| {
                    ui.selectable_value(default_unit, None, "Follow substance");
                    for unit in VolumeUnit::ALL {
                        ui.selectable_value(default_unit, Some(unit), unit.label());
                    }
                });
                ui.separator();
                ui.label("Window transparency");
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                ui.separator();
                if ui.button("Save settings").clicked() {
                    self.config.window_alpha = self.window_alpha;
                    self.settings_status = Some(match self.config.save(&self.config_path) {
                        Ok(()) => format!("Saved to {}", self.config_path.display()),
                        Err(e) => {
                            tracing::error!(error = %e, "could not save settings");
                            format!("Save failed: {e}")
                        }
                    });
                }
                if let Some(status) = &self.settings_status {
                    ui.label(status);
                }
            });
        self.show_settings_modal = open;
    }
}

fn rand_rng() -> rand::rngs::ThreadRng {
    rand::thread_rng()
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut style = (*ctx.style()).clone();
        style.interaction.selectable_labels = false;
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(SITE_TITLE);
                ui.separator();
                if ui.button("Settings").clicked() {
                    self.show_settings_modal = true;
                }
            });
        });

        egui::SidePanel::left("nav")
            .resizable(false)
            .default_width(160.0)
            .show(ctx, |ui| self.ui_nav(ui));

        if self.tab == Tab::Ratio && self.session.records_open {
            self.ui_records_panel(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Landing => self.ui_landing(ui),
            Tab::Splash => self.ui_splash(ui),
            Tab::Ratio => {
                egui::ScrollArea::vertical().show(ui, |ui| self.ui_ratio(ui));
            }
        });

        if self.show_settings_modal {
            self.ui_settings(ctx);
        }
        self.ui_toasts(ctx);
    }
}
