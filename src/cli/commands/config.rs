use crate::cli::parser::{Cli, Commands, Switch};
use crate::config::{CheckSettings, Config, clamp_interval};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        interval,
        sound,
        loop_sound,
    } = &cli.command
    {
        let changing = interval.is_some() || sound.is_some() || loop_sound.is_some();
        let mut effective = cfg.clone();

        if changing {
            let current = cfg.check_settings();

            let seconds = match interval {
                Some(requested) => {
                    let clamped = clamp_interval(*requested);
                    if i64::from(clamped) != *requested {
                        warning(format!(
                            "Interval {requested}s is outside 60-7200, using {clamped}s."
                        ));
                    }
                    clamped
                }
                None => current.check_interval_seconds(),
            };

            let settings = CheckSettings::new(
                seconds,
                sound.map_or(current.sound_enabled(), Switch::is_on),
                loop_sound.map_or(current.loop_sound(), Switch::is_on),
            );
            effective = cfg.with_check_settings(settings);

            if cli.test {
                info("Test mode: configuration not saved.");
            } else {
                // the file keeps its own database path even under --db
                Config::load(false).with_check_settings(settings).save()?;
                success("Configuration saved.");
            }
        }

        if *print_config || !changing {
            let yaml =
                serde_yaml::to_string(&effective).map_err(|e| AppError::Config(e.to_string()))?;
            println!("📄 Current configuration:\n");
            println!("{yaml}");
        }
    }

    Ok(())
}
