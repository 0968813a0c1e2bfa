//! Reported server version: `APP_VERSION` from the build environment when
//! set (release images stamp it there), the cargo package version otherwise.

pub const VERSION: &str = match option_env!("APP_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
