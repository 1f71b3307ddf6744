use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "satloop-tui", version, about = "Satellite & radar loop viewer")]
pub struct CliArgs {
    /// Path to the viewer config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Preload once, print loop stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the imagery CDN base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the catalog refresh interval in seconds
    #[arg(long = "refresh-secs", value_name = "SECS")]
    pub refresh_secs: Option<u64>,

    /// Disable the small-screen resolution downgrade for every loop
    #[arg(long = "no-shrink")]
    pub no_shrink: bool,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(base) = &self.base_url {
            std::env::set_var("SATLOOP_BASE_URL", base);
        }
        if let Some(secs) = self.refresh_secs {
            std::env::set_var("SATLOOP_REFRESH_SECS", secs.to_string());
        }
        if self.no_shrink {
            std::env::set_var("SATLOOP_NO_SHRINK", "1");
        }
    }
}
