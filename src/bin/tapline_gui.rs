use std::collections::VecDeque;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use tapline::config::{DemoConfig, EngFloat};
use tapline::processing::FilterSummary;
use tapline::run_comparison;
use tapline::signal_processing::DesignMethod;

const MAX_LOG_LINES: usize = 200;
const TIME_PLOT_SAMPLES: usize = 400;
const RESPONSE_POINTS: usize = 512;

#[derive(Parser, Debug)]
#[command(name = "tapline_gui")]
#[command(about = "Low-pass FIR filter demo - GUI", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'N', long)]
    nsamples: Option<usize>,

    #[arg(short = 's', long)]
    samplerate: Option<EngFloat>,

    #[arg(short = 'm', long, value_enum)]
    method: Option<DesignMethod>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Plot-ready data from one run
struct RunPlots {
    summary: FilterSummary,
    source_psd: Vec<[f64; 2]>,
    filtered_psd: Vec<[f64; 2]>,
    response: Vec<[f64; 2]>,
    taps: Vec<[f64; 2]>,
    source_time: Vec<[f64; 2]>,
    filtered_time: Vec<[f64; 2]>,
}

enum GuiUpdate {
    Finished(Box<RunPlots>),
    Failed(String),
    Log(String),
}

struct GuiLogger {
    tx: Sender<GuiUpdate>,
    max_level: log::LevelFilter,
}

impl log::Log for GuiLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let msg = format!("[{}] {}", record.level(), record.args());
            let _ = self.tx.send(GuiUpdate::Log(msg));
        }
    }

    fn flush(&self) {}
}

fn psd_points(frequencies: &[f64], db: &[f64]) -> Vec<[f64; 2]> {
    frequencies
        .iter()
        .zip(db)
        .map(|(&f, &p)| [f, p])
        .collect()
}

fn build_plots(config: &DemoConfig) -> anyhow::Result<RunPlots> {
    let result = run_comparison(config)?;
    let (source_psd, filtered_psd) = result.psd_pair(&config.spectrum)?;
    let summary = result.summary(&filtered_psd);

    let fs = result.sample_rate();
    let response = (0..RESPONSE_POINTS)
        .map(|k| {
            let f = fs / 2.0 * k as f64 / (RESPONSE_POINTS - 1) as f64;
            [f, result.taps.magnitude_db(f, fs).max(-150.0)]
        })
        .collect();
    let taps = result
        .taps
        .taps()
        .iter()
        .enumerate()
        .map(|(i, &t)| [i as f64, t])
        .collect();

    // Time axis in seconds so both rates line up
    let output_fs = result.output_sample_rate();
    let source_time = result
        .source
        .iter()
        .take(TIME_PLOT_SAMPLES)
        .enumerate()
        .map(|(i, s)| [i as f64 / fs, s.re as f64])
        .collect();
    let filtered_time = result
        .filtered
        .iter()
        .take(TIME_PLOT_SAMPLES / result.decimation.max(1))
        .enumerate()
        .map(|(i, s)| [(i + 1) as f64 / output_fs - 1.0 / fs, s.re as f64])
        .collect();

    Ok(RunPlots {
        summary,
        source_psd: psd_points(&source_psd.frequencies, &source_psd.to_db()),
        filtered_psd: psd_points(&filtered_psd.frequencies, &filtered_psd.to_db()),
        response,
        taps,
        source_time,
        filtered_time,
    })
}

fn spawn_run(config: DemoConfig, tx: Sender<GuiUpdate>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let update = match build_plots(&config) {
            Ok(plots) => GuiUpdate::Finished(Box::new(plots)),
            Err(e) => GuiUpdate::Failed(format!("{:#}", e)),
        };
        let _ = tx.send(update);
    })
}

struct TaplineApp {
    rx: Receiver<GuiUpdate>,
    tx: Sender<GuiUpdate>,
    config: DemoConfig,
    plots: Option<RunPlots>,
    error: Option<String>,
    log_lines: VecDeque<String>,
    running: bool,
    worker: Option<thread::JoinHandle<()>>,
}

impl TaplineApp {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        rx: Receiver<GuiUpdate>,
        tx: Sender<GuiUpdate>,
        config: DemoConfig,
    ) -> Self {
        let mut app = Self {
            rx,
            tx,
            config,
            plots: None,
            error: None,
            log_lines: VecDeque::new(),
            running: false,
            worker: None,
        };
        app.start_run();
        app
    }

    fn start_run(&mut self) {
        if self.running {
            return;
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        if let Err(e) = self.config.validate() {
            self.error = Some(e.to_string());
            return;
        }
        self.error = None;
        self.running = true;
        self.worker = Some(spawn_run(self.config.clone(), self.tx.clone()));
    }

    fn drain_updates(&mut self) {
        while let Ok(update) = self.rx.try_recv() {
            match update {
                GuiUpdate::Finished(plots) => {
                    self.plots = Some(*plots);
                    self.running = false;
                }
                GuiUpdate::Failed(msg) => {
                    log::warn!("Run failed: {}", msg);
                    self.error = Some(msg);
                    self.running = false;
                }
                GuiUpdate::Log(msg) => {
                    self.log_lines.push_back(msg);
                    while self.log_lines.len() > MAX_LOG_LINES {
                        self.log_lines.pop_front();
                    }
                }
            }
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        let nyquist = self.config.sample_rate / 2.0;

        ui.label(
            egui::RichText::new("Filter")
                .color(egui::Color32::WHITE)
                .strong(),
        );
        ui.add(
            egui::Slider::new(&mut self.config.bandwidth, 1.0..=nyquist)
                .text("Bandwidth")
                .suffix(" Hz")
                .logarithmic(true),
        );
        ui.add(
            egui::Slider::new(&mut self.config.transition_width, 1.0..=nyquist)
                .text("Transition")
                .suffix(" Hz")
                .logarithmic(true),
        );
        ui.add(
            egui::Slider::new(&mut self.config.attenuation_db, 10.0..=120.0)
                .text("Attenuation")
                .suffix(" dB"),
        );
        ui.add(egui::Slider::new(&mut self.config.decimation, 1..=16).text("Decimation"));
        ui.horizontal(|ui| {
            ui.radio_value(&mut self.config.method, DesignMethod::Kaiser, "Kaiser");
            ui.radio_value(&mut self.config.method, DesignMethod::Equiripple, "Equiripple");
        });

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new("Source")
                .color(egui::Color32::WHITE)
                .strong(),
        );
        ui.add(
            egui::Slider::new(&mut self.config.num_samples, 1_000..=200_000)
                .text("Samples")
                .logarithmic(true),
        );
        ui.add(egui::Slider::new(&mut self.config.noise.amplitude, 0.0..=4.0).text("Amplitude"));

        ui.add_space(8.0);
        let label = if self.running { "Running..." } else { "Run" };
        if ui
            .add_enabled(!self.running, egui::Button::new(label))
            .clicked()
        {
            self.start_run();
        }

        if let Some(err) = &self.error {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(err).color(egui::Color32::from_rgb(255, 100, 100)));
        }
    }

    fn draw_plots(&self, ui: &mut egui::Ui) {
        let Some(plots) = &self.plots else {
            ui.label("No results yet");
            return;
        };
        let plot_height = 180.0;

        ui.label(
            egui::RichText::new("Power spectral density")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        Plot::new("psd_plot")
            .height(plot_height)
            .x_axis_label("Hz")
            .y_axis_label("dB")
            .y_axis_min_width(60.0)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Source", PlotPoints::from(plots.source_psd.clone()))
                        .color(egui::Color32::from_rgb(255, 200, 50)),
                );
                plot_ui.line(
                    Line::new("Filtered", PlotPoints::from(plots.filtered_psd.clone()))
                        .color(egui::Color32::from_rgb(100, 200, 255)),
                );
            });

        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Magnitude response")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        Plot::new("response_plot")
            .height(plot_height)
            .x_axis_label("Hz")
            .y_axis_label("dB")
            .y_axis_min_width(60.0)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Response", PlotPoints::from(plots.response.clone()))
                        .color(egui::Color32::from_rgb(100, 255, 100)),
                );
            });

        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Taps")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        Plot::new("taps_plot")
            .height(plot_height)
            .y_axis_min_width(60.0)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Taps", PlotPoints::from(plots.taps.clone()))
                        .color(egui::Color32::from_rgb(255, 100, 255)),
                );
            });

        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Time domain (I)")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        Plot::new("time_plot")
            .height(plot_height)
            .x_axis_label("s")
            .y_axis_min_width(60.0)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Source", PlotPoints::from(plots.source_time.clone()))
                        .color(egui::Color32::from_rgb(255, 200, 50).gamma_multiply(0.5)),
                );
                plot_ui.line(
                    Line::new("Filtered", PlotPoints::from(plots.filtered_time.clone()))
                        .color(egui::Color32::from_rgb(100, 200, 255)),
                );
            });
    }
}

fn fmt_db(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{:.1} dB", v))
}

impl eframe::App for TaplineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_updates();
        if self.running {
            ctx.request_repaint();
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.start_run();
        }

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.plots {
                Some(plots) => {
                    let s = &plots.summary;
                    ui.label(format!("Num. Taps: {} ({})", s.num_taps, s.method));
                    ui.separator();
                    ui.label(format!("Delay: {} samples", s.group_delay_samples));
                    ui.separator();
                    ui.label(format!("Out: {} of {}", s.output_len, s.input_len));
                    ui.separator();
                    ui.label(format!("Passband: {:.1} dB", s.passband_psd_db));
                    ui.separator();
                    ui.label(format!("Stopband: {}", fmt_db(s.stopband_psd_db)));
                    ui.separator();
                    ui.label(format!("Rejection: {}", fmt_db(s.measured_attenuation_db)));
                }
                None => {
                    ui.label("Waiting for first run");
                }
            });
        });

        egui::TopBottomPanel::bottom("debug_log")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Debug Log")
                            .color(egui::Color32::LIGHT_GRAY)
                            .strong(),
                    );
                    if ui.small_button("Clear").clicked() {
                        self.log_lines.clear();
                    }
                });
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            ui.label(
                                egui::RichText::new(line)
                                    .font(egui::FontId::monospace(11.0))
                                    .color(egui::Color32::from_rgb(180, 180, 180)),
                            );
                        }
                    });
            });

        egui::SidePanel::left("controls_panel")
            .default_width(300.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.draw_controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.draw_plots(ui);
            });
        });
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let (tx, rx) = crossbeam_channel::unbounded::<GuiUpdate>();

    let logger = GuiLogger {
        tx: tx.clone(),
        max_level: log_level,
    };
    log::set_boxed_logger(Box::new(logger)).ok();
    log::set_max_level(log_level);

    let mut config = match &args.config {
        Some(path) => DemoConfig::from_file(path)?,
        None => DemoConfig::default(),
    };
    if let Some(n) = args.nsamples {
        config.num_samples = n;
    }
    if let Some(fs) = args.samplerate {
        config.sample_rate = fs.value();
    }
    if let Some(m) = args.method {
        config.method = m;
    }
    if args.seed.is_some() {
        config.noise.seed = args.seed;
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Tapline - Low-pass FIR demo"),
        ..Default::default()
    };

    eframe::run_native(
        "Tapline",
        native_options,
        Box::new(move |cc| Ok(Box::new(TaplineApp::new(cc, rx, tx, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
