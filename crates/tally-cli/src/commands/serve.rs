//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::{open_db, resolve_owner};

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    dev_user: Option<&str>,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let db = open_db(db_path, no_encrypt)?;

    let dev_owner = match dev_user {
        Some(account) => Some(resolve_owner(&db, Some(account))?),
        None => None,
    };

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        match dev_user {
            Some(account) => println!("   👤 Requests without an API key run as '{}'", account),
            None => println!("   Set --dev-user to choose who unauthenticated requests run as"),
        }
    } else {
        println!("   🔑 Authentication: Bearer API keys ({} users)", db.list_users()?.len());
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = tally_server::ServerConfig {
        require_auth: !no_auth,
        dev_user: dev_owner,
        ..Default::default()
    }
    .with_origins_from_env();

    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            tally_server::ALLOWED_ORIGINS_ENV
        );
    }

    tally_server::serve_with_config(db, host, port, config).await?;

    Ok(())
}
