use eyre::Result;

use crate::constants::{GREEN_ANSI_COLOR, RED_ANSI_COLOR, RESET_ANSI_COLOR};
use crate::{ConfigAction, ConfigArgs, Configuration};

/// Entry point of `pinnacle config`.
///
/// Output goes straight to stdout rather than through tracing, since it is meant to be read or
/// piped by the user.
pub fn config(args: ConfigArgs) -> Result<()> {
    match args.action()? {
        ConfigAction::Interactive => {
            Configuration::from_interactive()?;
        }
        ConfigAction::Path => println!("{}", Configuration::path()?.display()),
        ConfigAction::Set { key, value } => {
            let mut config = Configuration::load()?;
            if let Err(e) = config.set(&key, &value) {
                println!("{RED_ANSI_COLOR}Error: {RESET_ANSI_COLOR}{}", e);
                return Ok(());
            }
            println!("{GREEN_ANSI_COLOR}Success: {RESET_ANSI_COLOR}'{}' set to '{}'.", key, value);
            print_config(&config)?;
        }
        ConfigAction::Show => {
            print_config(&Configuration::load()?)?;
            println!("{GREEN_ANSI_COLOR}Hint: {RESET_ANSI_COLOR}{}", ConfigArgs::usage_hint());
        }
    }

    Ok(())
}

fn print_config(config: &Configuration) -> Result<()> {
    println!("Configuration ({}): {}\n", Configuration::path()?.display(), serde_json::to_string_pretty(config)?);
    Ok(())
}
