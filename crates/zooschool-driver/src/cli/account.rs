/*
[INPUT]:  DriverConfig, account details and passwords entered at the prompt
[OUTPUT]: Persisted session file after signup/login, cleared on logout
[POS]:    CLI account commands
[UPDATE]: When auth flows or the session file format change
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Password, theme::ColorfulTheme};
use tracing::{info, warn};

use zooschool_adapter::auth::service::SESSION_KEY_NAME;
use zooschool_adapter::auth::{
    AuthService, DEFAULT_TOKEN_TTL_SECONDS, PersistentKeyManager, TokenIssuer,
};
use zooschool_adapter::{
    AuthSession, CarpoolClient, CarpoolError, ClientConfig, LoginRequest, SignupRequest,
};
use zooschool_driver::DriverConfig;
use zooschool_driver::state::storage::SessionFile;

pub struct SignupDetails {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub fn backend_client(config: &DriverConfig) -> Result<CarpoolClient> {
    let backend = config.backend()?;
    let client_config = ClientConfig {
        timeout: backend.timeout(),
        ..ClientConfig::default()
    };
    CarpoolClient::with_config(client_config, &backend.url, &backend.service_key)
        .context("create backend client")
}

fn auth_service(config: &DriverConfig) -> Result<AuthService<CarpoolClient>> {
    let client = backend_client(config)?;
    let key_dir = config.key_dir()?;
    let service = AuthService::with_key_dir(client, &key_dir)
        .with_context(|| format!("load signing key from {}", key_dir.display()))?
        .with_bcrypt_cost(config.auth.bcrypt_cost);
    Ok(service)
}

pub async fn run_signup(config: &DriverConfig, details: SignupDetails) -> Result<()> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let request = SignupRequest {
        email: details.email,
        password,
        first_name: details.first_name,
        last_name: details.last_name,
        phone: details.phone,
        address: details.address,
        emergency_contact_name: None,
        emergency_contact_phone: None,
    };

    let service = auth_service(config)?;
    let session = match service.signup(&request).await {
        Ok(session) => session,
        Err(CarpoolError::UserExists { .. }) => {
            println!(
                "{}",
                style("An account with this email already exists. Try `login`.").yellow()
            );
            return Ok(());
        }
        Err(err) => return Err(err).context("signup failed"),
    };

    save_session(config, &session).await?;
    println!(
        "{} {}",
        style("Welcome,").bold().green(),
        style(&session.user.name).bold()
    );
    Ok(())
}

pub async fn run_login(config: &DriverConfig, email: String) -> Result<()> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    let service = auth_service(config)?;
    let session = match service.login(&LoginRequest { email, password }).await {
        Ok(session) => session,
        Err(CarpoolError::InvalidCredentials) => {
            println!("{}", style("Invalid email or password.").red());
            return Ok(());
        }
        Err(err) => return Err(err).context("login failed"),
    };

    save_session(config, &session).await?;
    println!(
        "{} {}",
        style("Signed in as").green(),
        style(&session.user.email).bold()
    );
    Ok(())
}

pub async fn run_logout(config: &DriverConfig) -> Result<()> {
    let file = SessionFile::new(config.data_dir()?);
    if file.clear().await? {
        info!(path = %file.path().display(), "session cleared");
        println!("{}", style("Signed out.").green());
    } else {
        println!("{}", style("No active session.").dim());
    }
    Ok(())
}

/// Prints who is signed in, verifying the stored token against the local signing key
pub async fn print_session_status(config: &DriverConfig) -> Result<()> {
    let file = SessionFile::new(config.data_dir()?);
    let Some(session) = file.load().await? else {
        println!("  session: {}", style("signed out").dim());
        return Ok(());
    };

    let key_dir = config.key_dir()?;
    let signer = PersistentKeyManager::new(&key_dir)
        .get_or_create_signer(SESSION_KEY_NAME)
        .with_context(|| format!("load signing key from {}", key_dir.display()))?;
    let issuer = TokenIssuer::new(signer, DEFAULT_TOKEN_TTL_SECONDS);

    match issuer.verify(&session.token) {
        Ok(user) => println!(
            "  session: {} ({})",
            style(&user.name).green(),
            user.email
        ),
        Err(err) => {
            warn!(error = %err, "stored session is not valid");
            println!("  session: {} ({err})", style("invalid").yellow());
        }
    }
    Ok(())
}

async fn save_session(config: &DriverConfig, session: &AuthSession) -> Result<()> {
    let file = SessionFile::new(config.data_dir()?);
    file.save(session)
        .await
        .with_context(|| format!("save session to {}", file.path().display()))?;
    info!(
        user_id = %session.user.user_id,
        expires_at = %session.expires_at,
        "session saved"
    );
    Ok(())
}
