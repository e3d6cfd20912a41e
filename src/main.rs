fn main() {
    env_logger::init();
    log::info!("mischief starting up");

    if let Err(e) = mischief::app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
