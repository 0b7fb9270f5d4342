use lml_kernel::{LmlConfig, LmlError};
use serde::Serialize;
use std::fs;
use std::io::Read;

pub fn load_config_or_exit(path: Option<&str>) -> LmlConfig {
    let Some(path) = path else {
        return LmlConfig::default();
    };
    tracing::debug!(path, "loading configuration");
    let text = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("error: failed to read config at {path}: {err}");
        std::process::exit(1);
    });
    LmlConfig::from_toml_str(&text).unwrap_or_else(|err| {
        eprintln!("error: failed to load config at {path}: {err}");
        std::process::exit(1);
    })
}

/// Text from the positional argument, then `--file`, then stdin.
pub fn read_text_or_exit(text: Option<String>, file: Option<&str>) -> String {
    if let Some(text) = text {
        return text;
    }
    if let Some(path) = file {
        return fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("error: failed to read text at {path}: {err}");
            std::process::exit(1);
        });
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .unwrap_or_else(|err| {
            eprintln!("error: failed to read stdin: {err}");
            std::process::exit(1);
        });
    buf
}

/// Invalid input is a hard failure: report it and exit non-zero.
pub fn exit_on_error(err: LmlError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

pub fn print_json_or_exit<T: Serialize>(value: &T, label: &str) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        eprintln!("error: failed to render {label} payload: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

/// Insert `,` every three digits of a decimal string.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn group_thousands(value: &impl std::fmt::Display) -> String {
    group_digits(&value.to_string())
}
