//! Completions command - print a shell completion script

use crate::cli::args::Cli;
use crate::error::{HvError, HvResult};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

pub async fn execute(shell: Shell) -> HvResult<()> {
    let mut stdout = std::io::stdout();
    write_completions(shell, &mut stdout);
    stdout
        .flush()
        .map_err(|e| HvError::io("writing completions", e))
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_completions_name_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("hvctl"));
        assert!(script.contains("snaps"));
    }
}
