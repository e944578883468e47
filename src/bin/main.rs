//! zroomutil CLI
//!
//! Applies room operations in the order they appear on the command line.

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use env_logger::Env;
use std::path::PathBuf;
use std::process::ExitCode;
use zroomutil::{
    load_room_with_config, save_wavefront, save_zroom, DecoderConfig, EncoderConfig,
    MaterialPolicy, Room,
};

#[derive(Parser)]
#[command(name = "zroomutil")]
#[command(author, version, about = "Merge, flatten, divide and convert zroom geometry", long_about = None)]
struct Cli {
    /// Room file to load; later imports are merged into the first
    #[arg(long, value_name = "FILE")]
    import: Vec<PathBuf>,

    /// Collapse every group into one
    #[arg(long, action = clap::ArgAction::Count)]
    flatten: u8,

    /// Divide the flattened room into cells, one count per level (e.g. "2" or "2,2")
    #[arg(long, value_name = "N[,N...]", value_parser = parse_divisions)]
    divide: Vec<Divisions>,

    /// Write the room as Wavefront OBJ
    #[arg(long, value_name = "OUT")]
    wavefront: Vec<PathBuf>,

    /// Write the room as a zroom file
    #[arg(long, value_name = "OUT")]
    zroom: Vec<PathBuf>,

    /// Print a JSON summary of the room to stdout
    #[arg(long, action = clap::ArgAction::Count)]
    summary: u8,

    /// Leave the material section out of written zroom files
    #[arg(long, global = true)]
    no_materials: bool,

    /// Keep decoded material bytes instead of the placeholder material
    #[arg(long, global = true)]
    verbatim_materials: bool,
}

#[derive(Debug, Clone)]
struct Divisions(Vec<u32>);

fn parse_divisions(s: &str) -> Result<Divisions, String> {
    let divisions = s
        .split(',')
        .map(|part| {
            let n: u32 = part
                .trim()
                .parse()
                .map_err(|_| format!("Invalid division '{}' in '{}'", part, s))?;
            if n == 0 {
                return Err(format!("Division count must be at least 1: '{}'", s));
            }
            Ok(n)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Divisions(divisions))
}

#[derive(Debug)]
enum Operation {
    Import(PathBuf),
    Flatten,
    Divide(Vec<u32>),
    Wavefront(PathBuf),
    Zroom(PathBuf),
    Summary,
}

impl Operation {
    fn flag(&self) -> &'static str {
        match self {
            Operation::Import(_) => "--import",
            Operation::Flatten => "--flatten",
            Operation::Divide(_) => "--divide",
            Operation::Wavefront(_) => "--wavefront",
            Operation::Zroom(_) => "--zroom",
            Operation::Summary => "--summary",
        }
    }
}

/// Recover command line order from clap's argument indices.
fn ordered_operations(cli: Cli, matches: &ArgMatches) -> Vec<Operation> {
    fn indices(matches: &ArgMatches, id: &str) -> Vec<usize> {
        matches
            .indices_of(id)
            .map(|i| i.collect())
            .unwrap_or_default()
    }

    let mut ops: Vec<(usize, Operation)> = Vec::new();
    ops.extend(
        indices(matches, "import")
            .into_iter()
            .zip(cli.import.into_iter().map(Operation::Import)),
    );
    ops.extend(indices(matches, "flatten").into_iter().map(|i| (i, Operation::Flatten)));
    ops.extend(
        indices(matches, "divide")
            .into_iter()
            .zip(cli.divide.into_iter().map(|d| Operation::Divide(d.0))),
    );
    ops.extend(
        indices(matches, "wavefront")
            .into_iter()
            .zip(cli.wavefront.into_iter().map(Operation::Wavefront)),
    );
    ops.extend(
        indices(matches, "zroom")
            .into_iter()
            .zip(cli.zroom.into_iter().map(Operation::Zroom)),
    );
    ops.extend(indices(matches, "summary").into_iter().map(|i| (i, Operation::Summary)));

    ops.sort_by_key(|(i, _)| *i);
    ops.into_iter().map(|(_, op)| op).collect()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let decoder_config = DecoderConfig::default().with_material_policy(if cli.verbatim_materials {
        MaterialPolicy::Verbatim
    } else {
        MaterialPolicy::Placeholder
    });
    let encoder_config = EncoderConfig::default().with_materials(!cli.no_materials);

    let operations = ordered_operations(cli, &matches);
    if operations.is_empty() {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    }

    match run(operations, &decoder_config, &encoder_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    operations: Vec<Operation>,
    decoder_config: &DecoderConfig,
    encoder_config: &EncoderConfig,
) -> zroomutil::Result<()> {
    let mut room: Option<Room> = None;

    for op in operations {
        if let Operation::Import(path) = &op {
            let imported = load_room_with_config(path, decoder_config)?;
            if let Some(room) = room.as_mut() {
                room.merge(imported);
            } else {
                room = Some(imported);
            }
            continue;
        }

        let Some(room) = room.as_mut() else {
            log::warn!("{} before any --import, skipping", op.flag());
            continue;
        };

        match op {
            Operation::Import(_) => {}
            Operation::Flatten => {
                room.flatten();
                log::info!("flattened to {} triangles", room.total_triangles());
            }
            Operation::Divide(divisions) => {
                room.divide(&divisions)?;
                log::info!("divided by {:?}", divisions);
            }
            Operation::Wavefront(path) => save_wavefront(room, &path)?,
            Operation::Zroom(path) => save_zroom(room, &path, encoder_config)?,
            Operation::Summary => println!("{}", serde_json::to_string_pretty(&room.summary())?),
        }
    }

    Ok(())
}
