//! Configuration loading for the `schedule` binary.

use std::path::Path;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use schedule_engine::SchedulerConfig;

/// Prefix for environment overrides, e.g. `SCHEDULE_BUFFER_MINUTES=10`.
pub const ENV_PREFIX: &str = "SCHEDULE_";

/// Load the scheduler configuration.
///
/// Sources, later ones winning: built-in defaults, the optional TOML file,
/// then `SCHEDULE_*` environment variables. A `working_hours` table in the
/// file replaces the default week as a whole rather than merging day by day.
#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large but only returned at startup"
)]
pub fn load(config_path: Option<&Path>) -> Result<SchedulerConfig, figment::Error> {
    let mut figment = Figment::new();

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX));

    figment.extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn no_sources_gives_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = load(None)?;
            assert_eq!(config, SchedulerConfig::default());
            Ok(())
        });
    }

    #[test]
    fn toml_file_and_env_are_layered() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "schedule.toml",
                r#"
                buffer_minutes = 5
                timezone = "Europe/Berlin"

                [working_hours.saturday]
                start = "10:00"
                end = "13:00"
                "#,
            )?;
            jail.set_env("SCHEDULE_BUFFER_MINUTES", "20");

            let config = load(Some(Path::new("schedule.toml")))?;

            assert_eq!(config.buffer_minutes, 20);
            assert_eq!(config.timezone, "Europe/Berlin");
            let days: Vec<Weekday> = config.working_hours.days().map(|(d, _)| d).collect();
            assert_eq!(days, vec![Weekday::Sat]);
            Ok(())
        });
    }
}
