use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Which entry point is logging; picks the default filter and output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Cli { verbose: bool },
    Lambda,
}

impl LogTarget {
    /// Used when `RUST_LOG` is unset. Binary crates log under their own name,
    /// so `toml_etl` and `lambda` need their own directive next to the library's.
    pub fn default_directives(self) -> &'static str {
        match self {
            // verbose 時其他 crate 也開到 info
            LogTarget::Cli { verbose: true } => "course_etl=debug,toml_etl=debug,info",
            LogTarget::Cli { verbose: false } => "course_etl=info,toml_etl=info",
            LogTarget::Lambda => "course_etl=info,lambda=info",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }
}

pub fn init_cli_logger(verbose: bool) {
    let target = LogTarget::Cli { verbose };

    tracing_subscriber::registry()
        .with(target.filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(LogTarget::Lambda.filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time() // CloudWatch 自己會加時間戳
                .json()
                .with_current_span(false),
        )
        .init();
}
