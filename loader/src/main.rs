use std::path::Path;
use std::process::ExitCode;

use loader::{load_class_from_file, LoaderKind, MethodArea, VerifyPolicy};

const ENV_LOG_LEVEL: &str = "CLASSLOADER_LOG";
const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::WARN;

fn log_level() -> tracing::Level {
    match std::env::var(ENV_LOG_LEVEL) {
        Ok(level) => {
            if level.eq_ignore_ascii_case("trace") {
                tracing::Level::TRACE
            } else if level.eq_ignore_ascii_case("debug") {
                tracing::Level::DEBUG
            } else if level.eq_ignore_ascii_case("info") {
                tracing::Level::INFO
            } else if level.eq_ignore_ascii_case("warn") {
                tracing::Level::WARN
            } else if level.eq_ignore_ascii_case("error") {
                tracing::Level::ERROR
            } else {
                DEFAULT_LOG_LEVEL
            }
        }
        Err(_) => DEFAULT_LOG_LEVEL,
    }
}

fn usage() {
    eprintln!("usage: loader [--verify=none|remote|all] <class-file>...");
}

fn main() -> ExitCode {
    // the subscriber writes synchronously, so diagnostics and the direct
    // output below cannot interleave out of order
    tracing_subscriber::fmt().with_max_level(log_level()).init();

    let mut policy = VerifyPolicy::default();
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg.starts_with("--verify=") {
            policy = match &arg["--verify=".len()..] {
                "none" => VerifyPolicy::None,
                "remote" => VerifyPolicy::Remote,
                "all" => VerifyPolicy::All,
                other => {
                    eprintln!("unknown verification policy: {}", other);
                    usage();
                    return ExitCode::from(2);
                }
            };
        } else {
            paths.push(arg);
        }
    }

    if paths.is_empty() {
        usage();
        return ExitCode::from(2);
    }

    let mut area = MethodArea::new();
    let mut failed = false;
    for path in &paths {
        match load_class_from_file(&mut area, LoaderKind::Application, policy, Path::new(path)) {
            Ok(name) => println!("loaded {} from {}", name, path),
            Err(err) => {
                eprintln!("{}: {}", path, err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
