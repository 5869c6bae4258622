use std::{env, fs, process::ExitCode};

use checkitem::{CheckItem, Config, Inventory, LoadError, MapPlaceholders, PlayerInventory};

const USAGE: &str = "usage: checkitem <inventory.json> <args> \
    [--config <file>] [--set <token>=<value>]... [--save]";

struct Options {
    inventory: String,
    args: String,
    config: Option<String>,
    placeholders: MapPlaceholders,
    save: bool,
}

fn parse_options(mut argv: impl Iterator<Item = String>) -> Option<Options> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut placeholders = MapPlaceholders::new();
    let mut save = false;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => config = Some(argv.next()?),
            "--set" => {
                let pair = argv.next()?;
                let (token, value) = pair.split_once('=')?;
                placeholders.set(token, value);
            }
            "--save" => save = true,
            _ => positional.push(arg),
        }
    }

    let [inventory, args]: [String; 2] = positional.try_into().ok()?;
    Some(Options {
        inventory,
        args,
        config,
        placeholders,
        save,
    })
}

fn run(options: Options) -> Result<String, LoadError> {
    let config = match &options.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    let mut inventory = PlayerInventory::from_path(&options.inventory)?;

    let checkitem = CheckItem::new(config);
    let output = checkitem.on_request(
        &options.placeholders,
        Some(&mut inventory as &mut dyn Inventory),
        &options.args,
    );

    if options.save {
        let json = inventory.to_json()?;
        fs::write(&options.inventory, json).map_err(|source| LoadError::Io {
            path: options.inventory.clone().into(),
            source,
        })?;
        log::info!("saved {}", options.inventory);
    }
    Ok(output)
}

fn main() -> ExitCode {
    let _ = env_logger::try_init();

    let Some(options) = parse_options(env::args().skip(1)) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(options) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("checkitem: {e}");
            ExitCode::FAILURE
        }
    }
}
