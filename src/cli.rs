use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Loads DXT-compressed DDS textures, natively or through CPU decompression
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Print the header and mip chain layout of a .dds file
    Inspect {
        /// Path to the .dds file
        path: PathBuf,
    },

    /// Upload a .dds file into a headless GPU device
    Upload {
        /// Path to the .dds file
        path: PathBuf,

        /// Decode on the CPU even when the device supports BC textures
        #[arg(short = 'S', long)]
        force_software: bool,
    },

    /// Decode one mip level on the CPU and write it as a PNG image
    Decode {
        /// Path to the .dds file
        path: PathBuf,

        /// Path of the .png file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Index of the mip level to decode
        #[arg(short, long, default_value_t = 0)]
        level: u32,
    },
}

impl From<CliCommand> for dds_loader::args::Command {
    fn from(value: CliCommand) -> Self {
        match value {
            CliCommand::Inspect { path } => dds_loader::args::Command::Inspect { path },
            CliCommand::Upload {
                path,
                force_software,
            } => dds_loader::args::Command::Upload {
                path,
                force_software,
            },
            CliCommand::Decode {
                path,
                output,
                level,
            } => dds_loader::args::Command::Decode {
                path,
                output,
                level,
            },
        }
    }
}
