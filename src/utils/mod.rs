pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "finance_core=info";

/// Installs the global fmt subscriber once.
///
/// `filter` (usually `Config::log_filter`) wins over `RUST_LOG`; the crate's
/// own `info` directive is always present.
pub fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let env_filter = build_filter(filter);
        // Another subscriber may already be installed by the embedding binary.
        let _ = fmt().with_env_filter(env_filter).try_init();
    });
}

fn build_filter(filter: Option<&str>) -> EnvFilter {
    let base = match filter {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
            eprintln!("ignoring invalid log filter `{directives}`: {err}");
            EnvFilter::from_default_env()
        }),
        None => EnvFilter::from_default_env(),
    };
    match DEFAULT_DIRECTIVE.parse::<Directive>() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_directive_is_always_added() {
        assert!(build_filter(None).to_string().contains("finance_core=info"));
        assert!(build_filter(Some("warn")).to_string().contains("warn"));
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing(Some("warn"));
        init_tracing(None);
    }
}
