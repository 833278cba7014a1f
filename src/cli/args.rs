use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct PendulumRendererArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Simulate both initial conditions and write a PNG frame sequence.
    Render(ParameterFilePath),
    /// Simulate both initial conditions and write the Cartesian data as JSON.
    Export(ParameterFilePath),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    /// Place output in a date-time-stamped subdirectory.
    #[clap(long, short)]
    pub date_time_out: bool,
}
