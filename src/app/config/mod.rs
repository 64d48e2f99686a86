mod load_config;

pub use load_config::{CONFIG_FILE_NAME, load_config, load_config_from};
