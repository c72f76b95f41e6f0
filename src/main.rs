use std::path::Path;

use playfield_editor::{load_config, run_level_editor};

fn main() -> anyhow::Result<()> {
    let command = clap::Command::new("playfield-editor")
        .about("3D level editor for platformer levels")
        .arg(
            clap::Arg::new("config")
                .long("config")
                .help("Path to config file")
                .takes_value(true)
                .default_value("config.toml"),
        )
        .arg(
            clap::Arg::new("level")
                .long("level")
                .help("Id of the level to open, created when it does not exist yet")
                .takes_value(true)
                .default_value("untitled"),
        );
    let matches = command.get_matches();

    let config_path = matches
        .value_of("config")
        .ok_or_else(|| anyhow::anyhow!("missing --config value"))?;
    let level_id = matches
        .value_of("level")
        .ok_or_else(|| anyhow::anyhow!("missing --level value"))?;
    if level_id.is_empty()
        || !level_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        anyhow::bail!(
            "Invalid level id '{}': use letters, digits, '_' or '-'",
            level_id
        );
    }

    let config = load_config(Path::new(config_path));
    run_level_editor(&config, level_id);
    Ok(())
}
