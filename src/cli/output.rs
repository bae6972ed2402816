#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

/// Resolve the effective color choice. The `--no-color` flag beats
/// everything; config mode "always"/"never" beats auto-detection; "auto"
/// honors NO_COLOR and requires stdout to be a tty.
pub fn resolve_color(mode: &str, no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    match mode {
        "always" => true,
        "never" => false,
        _ => detect_color(),
    }
}

fn detect_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty_stdout()
}

fn atty_stdout() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
