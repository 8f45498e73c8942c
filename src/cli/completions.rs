//! Completions command implementation

use crate::cli::{Cli, CompletionsArgs};
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

/// Handle `fleetwatch completions` command
pub fn handle_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    fn render(shell: Shell) -> String {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        generate(shell, &mut cmd, "fleetwatch", &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_bash_lists_subcommands() {
        let script = render(Shell::Bash);
        assert!(script.contains("fleetwatch"));
        assert!(script.contains("check"));
        assert!(script.contains("run"));
    }

    #[test]
    fn test_completions_zsh() {
        assert!(render(Shell::Zsh).contains("#compdef fleetwatch"));
    }
}
