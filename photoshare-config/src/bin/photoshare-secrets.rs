use std::{ffi::OsString, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use photoshare_config::{
    PasswordCrypto,
    secrets::{OutputStyle, SecretBundle},
};
use zeroize::Zeroizing;

const USAGE: &str = "Usage: photoshare-secrets <admin_password>";

#[derive(Parser)]
#[command(
    name = "photoshare-secrets",
    about = "Generate session/CSRF signing keys and the admin password hash",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Plaintext admin password to hash
    #[arg(allow_hyphen_values = true)]
    admin_password: String,
    /// Double every `$` in the hash for docker-compose files
    #[arg(long)]
    compose: bool,
}

impl Cli {
    /// A lone argument is always the password, even when it looks like a
    /// flag (`-hunter2`, `--compose`).
    fn from_args(args: Vec<OsString>) -> Option<Self> {
        match args.as_slice() {
            [_, password] => Some(Self {
                admin_password: password.clone().into_string().ok()?,
                compose: false,
            }),
            _ => Cli::try_parse_from(args).ok(),
        }
    }
}

fn main() -> ExitCode {
    let Some(cli) = Cli::from_args(std::env::args_os().collect()) else {
        eprintln!("{USAGE}");
        return ExitCode::from(1);
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("photoshare-secrets: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let password = Zeroizing::new(cli.admin_password);
    let style = if cli.compose {
        OutputStyle::Compose
    } else {
        OutputStyle::Env
    };

    if password.is_empty() {
        eprintln!("photoshare-secrets: warning: the admin password is empty");
    }

    let crypto =
        PasswordCrypto::new().context("failed to initialise Argon2")?;
    let bundle = SecretBundle::generate(&crypto, &password)
        .context("failed to generate secrets")?;

    for line in bundle.lines(style) {
        println!("{line}");
    }
    Ok(())
}
