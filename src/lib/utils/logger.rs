use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use env_logger::{Builder, Target};
use log::LevelFilter;

/// [`config_logger`] The configuration for `env_logger`.
///
/// `-v` enables the debug messages, `-vv` traces every spawned command line
pub fn config_logger(verbose_level: u8, target: Target) -> Result<()> {
    let mut builder = Builder::from_default_env();

    builder
        .target(target)
        .format_indent(Some(4))
        .format_module_path(false)
        .format_timestamp_millis();

    let level = match verbose_level {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        2 => LevelFilter::Trace,
        _ => return Err(eyre!("nativext maximum allowed verbosity level is: '-vv'")),
    };
    builder.filter(None, level);

    builder
        .try_init()
        .with_context(|| "nativext wasn't able to set up the logger")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_above_the_maximum_is_rejected() {
        assert!(config_logger(3, Target::Stderr).is_err());
    }
}
