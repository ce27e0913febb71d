use tripdesk_api::SessionUser;
use tripdesk_common::Result;

use crate::context::AppContext;
use crate::render;

pub async fn login(ctx: &AppContext, username: &str, password: &str) -> Result<()> {
    let response = ctx.api.login(username, password).await?;
    let user = SessionUser::from_login(&response)?;
    ctx.sessions.save(&user)?;
    println!("Logged in as {}", render::session(&user));
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.sessions.clear()?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.sessions.load() {
        Some(user) => println!("{}", render::session(&user)),
        None => println!("Not logged in."),
    }
    Ok(())
}
