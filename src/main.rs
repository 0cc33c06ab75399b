use filescape::data::store::EntityStore;
use filescape::gui::frontend::CanvasApp;
use filescape::persistence::persist;

use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let loaded_state = persist::load_active().ok().flatten();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 710.0])
            // Provide sensible bounds so the UI stays usable on small screens
            .with_min_inner_size([700.0, 420.0])
            .with_resizable(true),
        ..Default::default()
    };
    eframe::run_native(
        "Filescape",
        options,
        Box::new(move |_cc| {
            if let Some(state) = loaded_state {
                Ok(Box::new(CanvasApp::from_state(state)) as Box<dyn eframe::App>)
            } else {
                // No prior state: start with an empty canvas
                Ok(Box::new(CanvasApp::new(EntityStore::new())) as Box<dyn eframe::App>)
            }
        }),
    )
}
