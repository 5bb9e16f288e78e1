use super::commands::{ConfigAction, OutputFormat};
use super::utils::{emit, print_json, FAIL, OK};
use docverify::config::ClientConfig;
use docverify::{DocverifyError, DocverifyResult};
use std::path::Path;

pub fn handle_config(
    config_path: &Path,
    config: &ClientConfig,
    action: Option<ConfigAction>,
    format: &OutputFormat,
) -> DocverifyResult<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            emit(format, config, |c| {
                print!("{}", c);
                if !config_path.exists() {
                    println!("\x1b[38;5;245mNo configuration file at {:?}; showing defaults\x1b[0m", config_path);
                    println!("Run '\x1b[38;5;51mdocverify config init\x1b[0m' to create one");
                }
            })?;
        }
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !force {
                println!("{} Configuration already exists at {:?} (use --force to overwrite)", FAIL, config_path);
                return Err(DocverifyError::Config("configuration already exists".into()));
            }
            config.save(config_path)?;
            println!("{} Configuration written to {:?}", OK, config_path);
        }
        Some(ConfigAction::Path) => match format {
            OutputFormat::Json => print_json(&serde_json::json!({ "path": config_path }))?,
            OutputFormat::Text => println!("{}", config_path.display()),
        },
        Some(ConfigAction::Validate) => match ClientConfig::load(config_path) {
            Ok(_) => println!("{} Configuration is valid", OK),
            Err(e) => {
                println!("{} Configuration error: {}", FAIL, e);
                return Err(e);
            }
        },
    }
    Ok(())
}
