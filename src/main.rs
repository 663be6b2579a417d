use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

// Import from your library
use bandslicer::config::SlicerConfig;
use bandslicer::utils::logger::Logger;
use bandslicer::commands::{CommandFactory, SlicerCommandFactory};

fn coords_arg() -> Arg {
    Arg::new("coords")
        .long("coords")
        .help("Band coordinates as JSON ({\"yRois\":[[y0,y1],...],\"xRoi\":[x0,x1]|null}) or @FILE")
        .value_name("JSON|@FILE")
        .required(true)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input image file")
        .required(true)
        .index(1)
}

fn main() {
    let matches = ClapCommand::new("bandslicer")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("Slice images into horizontal bands and package them as a zip archive")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration file layered over the built-in defaults")
                .value_name("FILE")
                .global(true)
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            ClapCommand::new("serve")
                .about("Serve the editor assets and the slice endpoint")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Address to bind")
                        .value_name("HOST")
                        .required(false),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to listen on")
                        .value_name("PORT")
                        .required(false),
                )
                .arg(
                    Arg::new("static-dir")
                        .long("static-dir")
                        .help("Directory holding the compiled editor")
                        .value_name("DIR")
                        .required(false),
                ),
        )
        .subcommand(
            ClapCommand::new("slice")
                .about("Slice a local image into a zip archive")
                .arg(input_arg())
                .arg(coords_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output zip file")
                        .value_name("ZIP")
                        .required(true),
                ),
        )
        .subcommand(
            ClapCommand::new("plan")
                .about("Show the slices a coordinate document would produce")
                .arg(input_arg())
                .arg(coords_arg()),
        )
        .get_matches();

    let config_path = matches.subcommand()
        .and_then(|(_, sub)| sub.get_one::<String>("config"))
        .or_else(|| matches.get_one::<String>("config"));

    let config = match SlicerConfig::load(config_path.map(String::as_str)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let verbose = matches.get_flag("verbose")
        || matches.subcommand().map_or(false, |(_, sub)| sub.get_flag("verbose"));
    let level = if verbose { LevelFilter::Debug } else { config.logging.level_filter() };

    if let Err(e) = Logger::init_global_logger(config.logging.file.as_deref(), level) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = SlicerCommandFactory::new();

    let command_result = factory.create_command(&matches, &config);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
