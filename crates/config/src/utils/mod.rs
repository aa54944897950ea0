/// Terminal colors and configuration defaults
pub(crate) mod constants;
