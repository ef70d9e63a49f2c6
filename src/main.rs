use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = drive_mover::cli::parse();
    app::run(args)
}
