//! CLI entry point for scanlogin.

pub mod login;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// QR-code login client
#[derive(Parser, Debug)]
#[command(name = "scanlogin", version, about = "QR-code login client")]
pub struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in by scanning a QR code on a paired device
    Login(LoginArgs),
    /// List the target device identities credentials can be bound to
    Apps,
}

/// Arguments for `scanlogin login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Target device identity (see `scanlogin apps`)
    #[arg(short, long)]
    pub app: Option<String>,

    /// Where to write the QR code image
    #[arg(long, default_value = "qrcode.png")]
    pub qr_out: PathBuf,
}
