use clap::Parser;
use libretag::transport::{ClientConfig, TransportConfig};
use libretag::{Credentials, Registry};

mod args;
mod context;
mod format;

use args::RetagArgs;
use context::{AppContext, VerbosityLevel};

const DEFAULT_REGISTRY: &str = "https://index.docker.io/";

/// Retag - move or create a tag on a remote image
///
/// Copies a manifest from one reference to a new tag without pulling or
/// pushing any layers.
#[derive(Parser, Debug)]
#[command(name = "retag")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Image to retag: repo:tag, repo@sha256:digest, or a bare repo
    image: String,

    /// New tag, or the source tag when a third argument is given
    tag: String,

    /// New tag when IMAGE is a bare repository
    new_tag: Option<String>,

    /// Registry base URL
    #[arg(long, env = "DOCKER_REGISTRY", default_value = DEFAULT_REGISTRY)]
    registry: String,

    /// Registry username
    #[arg(long, env = "DOCKER_USER", default_value = "")]
    username: String,

    /// Registry password
    #[arg(long, env = "DOCKER_PASS", default_value = "", hide_env_values = true)]
    password: String,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, default_value = "auto")]
    color: String,
}

impl Cli {
    fn registry_url(&self) -> &str {
        if self.registry.trim().is_empty() {
            DEFAULT_REGISTRY
        } else {
            &self.registry
        }
    }

    fn client_config(&self) -> ClientConfig {
        match self.timeout {
            Some(seconds) => ClientConfig::new().with_timeout(seconds),
            None => ClientConfig::new(),
        }
    }
}

fn run(cli: &Cli) -> Result<RetagArgs, String> {
    let args = RetagArgs::parse(&cli.image, &cli.tag, cli.new_tag.as_deref())?;

    let credentials = Credentials::from_parts(&cli.username, &cli.password);
    let config =
        TransportConfig::new(cli.registry_url(), credentials).map_err(|e| e.to_string())?;
    let registry = Registry::with_config(config, &cli.client_config()).map_err(|e| e.to_string())?;

    tracing::info!(
        registry = registry.registry_url(),
        source = %args.source_display(),
        destination = %args.destination_display(),
        "Retagging image"
    );

    registry
        .retag(&args.repository, &args.source, &args.new_tag)
        .map_err(|e| e.to_string())?;

    Ok(args)
}

fn main() {
    let cli = Cli::parse();

    let ctx = AppContext::build(
        format::ColorChoice::from(cli.color.as_str()),
        VerbosityLevel::from_count(cli.verbose),
    );
    ctx.init_tracing();

    let formatter = format::create_formatter(ctx.color);
    match run(&cli) {
        Ok(args) => formatter.success(&format!(
            "Retagged {} as {}",
            args.source_display(),
            args.destination_display()
        )),
        Err(message) => {
            formatter.error(&message);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn cli(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_two_argument_form() {
        let cli = cli(&["retag", "--registry", "http://localhost:5000", "acme/widget:1.0.0", "1.0.1"]);
        assert_eq!(cli.image, "acme/widget:1.0.0");
        assert_eq!(cli.tag, "1.0.1");
        assert!(cli.new_tag.is_none());
        assert_eq!(cli.registry_url(), "http://localhost:5000");
    }

    #[test]
    fn test_cli_three_argument_form() {
        let cli = cli(&["retag", "--registry", "x", "acme/widget", "1.0.0", "1.0.1"]);
        assert_eq!(cli.new_tag.as_deref(), Some("1.0.1"));
    }

    #[test]
    fn test_cli_empty_registry_falls_back_to_default() {
        let cli = cli(&["retag", "--registry", "", "acme/widget:1.0.0", "1.0.1"]);
        assert_eq!(cli.registry_url(), DEFAULT_REGISTRY);
    }

    #[test]
    fn test_cli_counts_verbosity() {
        let cli = cli(&["retag", "--registry", "x", "-vv", "a:b", "c"]);
        assert_eq!(VerbosityLevel::from_count(cli.verbose), VerbosityLevel::VeryVerbose);
    }

    #[test]
    fn test_cli_requires_tag() {
        assert!(Cli::try_parse_from(["retag", "acme/widget:1.0.0"]).is_err());
    }

    #[test]
    fn test_run_retags_against_registry() {
        let mut server = Server::new();
        let get = server
            .mock("GET", "/v2/acme/widget/manifests/1.0.0")
            .with_status(200)
            .with_header("content-type", "application/vnd.oci.image.manifest.v1+json")
            .with_body("{}")
            .expect(1)
            .create();
        let put = server
            .mock("PUT", "/v2/acme/widget/manifests/1.0.1")
            .match_body("{}")
            .with_status(201)
            .expect(1)
            .create();

        let url = server.url();
        let cli = cli(&["retag", "--registry", url.as_str(), "--timeout", "5", "acme/widget:1.0.0", "1.0.1"]);
        let args = run(&cli).unwrap();

        assert_eq!(args.destination_display(), "acme/widget:1.0.1");
        get.assert();
        put.assert();
    }

    #[test]
    fn test_run_reports_http_failure() {
        let mut server = Server::new();
        let _get = server
            .mock("GET", "/v2/acme/widget/manifests/1.0.0")
            .with_status(404)
            .create();

        let url = server.url();
        let cli = cli(&["retag", "--registry", url.as_str(), "acme/widget:1.0.0", "1.0.1"]);
        let message = run(&cli).unwrap_err();

        assert_eq!(
            message,
            format!(
                "HTTP 404 Not Found when accessing \"{}/v2/acme/widget/manifests/1.0.0\"",
                url
            )
        );
    }

    #[test]
    fn test_run_rejects_bad_arguments_before_network() {
        let cli = cli(&["retag", "--registry", "http://127.0.0.1:1", "acme/widget", "1.0.1"]);
        let message = run(&cli).unwrap_err();
        assert!(message.contains("missing a source tag"));
    }
}
