use std::io::{BufRead, Write};

use anyhow::{Result, anyhow};
use yomu_lib::models::{LoginInput, RegisterInput};

use crate::config::Config;

fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(anyhow!("password is required"));
    }
    Ok(password)
}

pub async fn login(config: &mut Config, username: String, password: Option<String>) -> Result<()> {
    let input = LoginInput {
        username,
        password: read_password(password)?,
    };

    let response = config.client().login(&input).await?;
    config.set_session(response.token, response.user.id);
    config.save()?;

    println!("Logged in as {} ({})", response.user.username, response.user.role);
    Ok(())
}

pub async fn register(
    config: &mut Config,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let input = RegisterInput {
        username,
        email,
        password: read_password(password)?,
    };

    let response = config.client().register(&input).await?;
    config.set_session(response.token, response.user.id);
    config.save()?;

    println!("Registered and logged in as {}", response.user.username);
    Ok(())
}

pub fn logout(config: &mut Config) -> Result<()> {
    config.clear_session();
    config.save()?;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    config.require_session()?;

    let user = config.client().me().await?;
    println!("{} <{}> ({})", user.username, user.email, user.role);
    Ok(())
}
