use clap::Parser;
use pendulum_renderer::cli::args::{CommandsEnum, ParameterFilePath, PendulumRendererArgs};
use pendulum_renderer::core::file_io::{
    build_output_path_with_date_time, extract_base_name, maybe_date_time_string, FilePrefix,
};
use pendulum_renderer::pendulum::export::export_cartesian_data;
use pendulum_renderer::pendulum::render::{render_double_pendulum, DoublePendulumParams};

fn main() {
    let args: PendulumRendererArgs = PendulumRendererArgs::parse();

    let pendulum_params = |path: &str| -> DoublePendulumParams {
        serde_json::from_str(&std::fs::read_to_string(path).expect("Unable to read param file"))
            .expect("Unable to parse param file")
    };

    let build_file_prefix = |command: &ParameterFilePath| -> FilePrefix {
        FilePrefix {
            directory_path: build_output_path_with_date_time(
                &command.params_path,
                "double_pendulum",
                &maybe_date_time_string(command.date_time_out),
            ),
            file_base: extract_base_name(&command.params_path).to_owned(),
        }
    };

    match &args.command {
        Some(CommandsEnum::Render(command)) => {
            render_double_pendulum(
                &pendulum_params(&command.params_path),
                build_file_prefix(command),
            )
            .unwrap();
        }

        Some(CommandsEnum::Export(command)) => {
            export_cartesian_data(
                &pendulum_params(&command.params_path),
                build_file_prefix(command),
            )
            .unwrap();
        }

        None => {
            println!("Default command (nothing specified!)");
        }
    }
}
