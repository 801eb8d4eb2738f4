// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use crate::store::SqliteStore;
use crate::utils::{pretty_table, set_setting};
use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, params};

pub const DEFAULT_USER_KEY: &str = "default_user";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let email = sub.get_one::<String>("email").map(|s| s.as_str());
            let user = add_user(conn, name, email)?;
            println!("Registered user '{}' (id {})", user.username, user.id);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT id, username, COALESCE(email,''), created_at FROM users ORDER BY username")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, name, email, created) = row?;
                data.push(vec![id.to_string(), name, email, created]);
            }
            println!("{}", pretty_table(&["ID", "User", "Email", "Created"], data));
        }
        Some(("use", sub)) => {
            let user = find_user(conn, sub.get_one::<String>("name").unwrap())?;
            set_setting(conn, DEFAULT_USER_KEY, &user.username)?;
            println!("Now acting as '{}'", user.username);
        }
        _ => {}
    }
    Ok(())
}

/// Registers `username`. The first user registered becomes the default one.
pub fn add_user(conn: &Connection, username: &str, email: Option<&str>) -> Result<User> {
    let username = username.trim();
    if username.is_empty() {
        bail!("Username must not be empty");
    }
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    if let Some(e) = email {
        if !e.contains('@') {
            bail!("Invalid email '{}'", e);
        }
    }
    conn.execute(
        "INSERT INTO users(username, email) VALUES (?1, ?2)",
        params![username, email],
    )
    .with_context(|| format!("Could not register user '{}'", username))?;
    let user = User {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        email: email.map(str::to_string),
    };
    if SqliteStore::new(conn).setting(DEFAULT_USER_KEY)?.is_none() {
        set_setting(conn, DEFAULT_USER_KEY, &user.username)?;
    }
    tracing::info!(user_id = user.id, "user registered");
    Ok(user)
}

pub fn find_user(conn: &Connection, username: &str) -> Result<User> {
    let username = username.trim();
    conn.query_row(
        "SELECT id, username, email FROM users WHERE username=?1",
        params![username],
        |r| {
            Ok(User {
                id: r.get(0)?,
                username: r.get(1)?,
                email: r.get(2)?,
            })
        },
    )
    .with_context(|| format!("User '{}' not found", username))
}

/// The user every command acts on: `--user` when given, else the stored
/// default.
pub fn resolve(conn: &Connection, requested: Option<&str>) -> Result<User> {
    if let Some(name) = requested {
        return find_user(conn, name);
    }
    let name = SqliteStore::new(conn)
        .setting(DEFAULT_USER_KEY)?
        .ok_or_else(|| {
            anyhow!("No user selected; pass --user or run `finclip user use --name <NAME>`")
        })?;
    find_user(conn, &name)
}
