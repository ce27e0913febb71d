use tripdesk_common::{Result, TripdeskError};
use tripdesk_config::toml_loader::default_config_path;
use tripdesk_config::{config_to_json, save_config_to_path, TripdeskConfig};

use crate::cli::ConfigCommand;
use crate::context::AppContext;

pub fn run(ctx: &AppContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", config_to_json(&ctx.config));
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = match &ctx.config_path {
                Some(path) => path.clone(),
                None => default_config_path()?,
            };
            if path.exists() && !force {
                return Err(TripdeskError::Other(format!(
                    "{} already exists; pass --force to overwrite it",
                    path.display()
                )));
            }
            save_config_to_path(&TripdeskConfig::default(), &path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}
