//! Shell completion scripts for `reflex`.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;

/// Arguments for the completions command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex completions bash > ~/.local/share/bash-completion/completions/reflex\n    \
    reflex completions zsh > ~/.zfunc/_reflex\n    \
    reflex completions fish > ~/.config/fish/completions/reflex.fish\n\n\
    Restart the shell (or source the file) to pick up new commands.")]
pub struct Args {
    /// Target shell
    #[arg(value_name = "SHELL", value_enum)]
    pub shell: Shell,
}

/// Writes the completion script for `shell` to stdout.
///
/// `cmd` is the top-level command built by main.rs.
pub fn run(args: Args, cmd: &mut Command) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_completions(cmd, args.shell, &mut out)?;
    out.flush().context("Failed to write completion script")?;
    Ok(())
}

/// Renders the completion script into `out`, always for the `reflex` binary
/// name regardless of how the executable was invoked.
pub fn write_completions<W: Write>(cmd: &mut Command, shell: Shell, out: &mut W) -> Result<()> {
    let mut script = Vec::new();
    clap_complete::generate(shell, cmd, "reflex", &mut script);
    out.write_all(&script)
        .with_context(|| format!("Failed to write {shell} completions"))?;
    Ok(())
}
