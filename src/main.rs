/*
 * Hoverfield
 *
 * A grid of semi-transparent objects floats in front of the camera. Each one
 * bobs around its home position, sags under gravity, is pushed aside by the
 * pointer (the mouse, or a fingertip streamed by an external tracker), keeps
 * clear of its neighbours and springs back home.
 */

use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use hoverfield::app;
use hoverfield::cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Hoverfield v{}", env!("CARGO_PKG_VERSION"));

    nannou::app(app::model).update(app::update).run();

    Ok(())
}
