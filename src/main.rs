mod app;
mod assets;
mod bubble;
mod canvas;
mod config;
mod duck;
mod phrases;
mod render;
mod scene;

fn main() {
    env_logger::init();
    log::info!("duckwalk starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
