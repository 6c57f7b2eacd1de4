use eos_connect::{
    AuthClient, AuthClientConfig, AuthError, AuthorizationResponse, ClientCredentials,
    DEFAULT_SCOPE,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "eos-connect",
    about = "Sign in with Epic Games and print EOS deployment tokens."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the Epic Games sign-in URL.
    AuthUrl {
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        redirect_uri: String,
        #[arg(long, default_value = "code")]
        response_type: String,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Open the URL in the default browser.
        #[arg(long)]
        open: bool,
    },
    /// Print the URL that shows a signed-in user's authorization code.
    RedirectUrl {
        #[arg(long)]
        client_id: String,
        #[arg(long, default_value = "code")]
        response_type: String,
        #[arg(long)]
        open: bool,
    },
    /// Redeem an authorization code issued to this client.
    Auth {
        /// Raw code, callback URL, or the redirect page JSON.
        #[arg(long)]
        code: String,
        #[arg(long)]
        client_id: String,
        #[arg(long, env = "EOS_CLIENT_SECRET", hide_env_values = true)]
        client_secret: String,
        #[arg(long)]
        deployment_id: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Redeem a code issued to another client through an exchange code.
    Exchange {
        /// Raw code, callback URL, or the redirect page JSON.
        #[arg(long)]
        code: String,
        #[arg(long)]
        issuing_client_id: String,
        #[arg(long, env = "EOS_ISSUING_CLIENT_SECRET", hide_env_values = true)]
        issuing_client_secret: String,
        #[arg(long)]
        client_id: String,
        #[arg(long, env = "EOS_CLIENT_SECRET", hide_env_values = true)]
        client_secret: String,
        #[arg(long)]
        deployment_id: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[derive(Debug, Args)]
struct ScopeArgs {
    /// Requested scope; repeat for several.
    #[arg(long = "scope")]
    scope: Vec<String>,
}

impl ScopeArgs {
    fn resolve(self) -> Vec<String> {
        if self.scope.is_empty() {
            DEFAULT_SCOPE.iter().map(|scope| scope.to_string()).collect()
        } else {
            self.scope
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AuthError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = AuthClient::new(AuthClientConfig::new())?;

    match cli.command {
        Command::AuthUrl {
            client_id,
            redirect_uri,
            response_type,
            scope,
            open,
        } => {
            let url =
                client.make_auth_url_with(&client_id, &redirect_uri, &response_type, &scope.resolve());
            print_url(&url, open);
        }
        Command::RedirectUrl {
            client_id,
            response_type,
            open,
        } => {
            let url = client.make_redirect_url_with(&client_id, &response_type);
            print_url(&url, open);
        }
        Command::Auth {
            code,
            client_id,
            client_secret,
            deployment_id,
            scope,
        } => {
            let code = AuthorizationResponse::parse(&code)?.code;
            let credentials = ClientCredentials::new(client_id, client_secret);
            let token = client
                .auth(&code, &credentials, &deployment_id, &scope.resolve())
                .await?;
            println!("{token}");
        }
        Command::Exchange {
            code,
            issuing_client_id,
            issuing_client_secret,
            client_id,
            client_secret,
            deployment_id,
            scope,
        } => {
            let code = AuthorizationResponse::parse(&code)?.code;
            let issuing = ClientCredentials::new(issuing_client_id, issuing_client_secret);
            let requesting = ClientCredentials::new(client_id, client_secret);
            let token = client
                .auth_with_exchange(&code, &issuing, &requesting, &deployment_id, &scope.resolve())
                .await?;
            println!("{token}");
        }
    }

    Ok(())
}

fn print_url(url: &str, open: bool) {
    println!("{url}");
    if open {
        if let Err(err) = webbrowser::open(url) {
            eprintln!("Failed to open browser automatically: {err}");
        }
    }
}
