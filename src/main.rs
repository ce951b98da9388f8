pub mod classify;
pub mod cli;
pub mod config;
pub mod emit;
pub mod field;
pub mod naming;
pub mod path_de;
pub mod pipeline;
pub mod resolve;

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
