pub const EXTENSION_SOURCE: &str = include_str!("example.cpp");
pub const CONFIG_FILE: &str = include_str!("nativext.toml");
