use anyhow::Result;

use crate::app::App;
use crate::args::Args;

mod app;
pub mod args;
pub mod dds;
pub mod error;
pub mod render;
pub mod resource;

pub fn run(args: Args) -> Result<()> {
    env_logger::init();

    App::new(args).run()
}
