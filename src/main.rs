use clap::Parser;
use eframe::egui;
use point_clicker::{
    app::ClickerApp,
    config::{Args, ClickSettings},
    headless,
};

fn main() -> eframe::Result<()> {
    setup_tracing();
    let args = Args::parse();
    let settings = ClickSettings::from(&args);

    if args.headless {
        headless::run(settings);
        return Ok(());
    }

    let mut opts = eframe::NativeOptions::default();
    opts.viewport.inner_size = Some(egui::vec2(340.0, 170.0));
    opts.viewport.resizable = Some(false);
    opts.viewport.window_level = Some(egui::WindowLevel::AlwaysOnTop);

    eframe::run_native(
        "Clicker",
        opts,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(ClickerApp::new(settings))
        }),
    )
}

fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
