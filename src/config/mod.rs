pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "shipping-quote")]
#[command(about = "Quote shipping rates for a storefront cart")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "shipping-quote.toml")]
    pub config: String,

    /// Path to the JSON quote request, or "-" for stdin
    #[arg(short, long, default_value = "-")]
    pub request: String,

    #[arg(
        long,
        help = "Treat the request as a storefront module envelope ({params, application})"
    )]
    pub module: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
