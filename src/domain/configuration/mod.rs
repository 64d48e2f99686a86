pub mod app_config;
pub mod parse;

pub use app_config::{API_BASE_ENV, AppConfig, AssemblyConfig, GatewayConfig, ImageConfig};
pub use parse::{parse_config_content, render_config};
