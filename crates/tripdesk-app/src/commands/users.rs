use serde_json::json;
use tripdesk_api::UserMutationResponse;
use tripdesk_common::Result;
use tripdesk_realtime::envelope::USER_UPDATE;

use crate::cli::UsersCommand;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext, command: UsersCommand) -> Result<()> {
    ctx.require_admin()?;
    match command {
        UsersCommand::List => print_users(ctx).await,
        UsersCommand::Search { username } => {
            let users = ctx.api.search_users(&username).await?;
            println!("{}", render::users(&users));
            Ok(())
        }
        UsersCommand::Create {
            id,
            username,
            password,
        } => {
            let reply = ctx.api.create_user(id, &username, &password).await?;
            confirm(&reply, "User created successfully!");
            ctx.announce(USER_UPDATE, &json!({ "id": id, "username": username }))
                .await;
            print_users(ctx).await
        }
        UsersCommand::Update {
            id,
            username,
            password,
        } => {
            let reply = ctx.api.update_user(id, &username, &password).await?;
            confirm(&reply, "User updated successfully!");
            ctx.announce(USER_UPDATE, &json!({ "id": id, "username": username }))
                .await;
            print_users(ctx).await
        }
        UsersCommand::Delete { id } => {
            let reply = ctx.api.delete_user(id).await?;
            println!("{}", reply.message);
            ctx.announce(USER_UPDATE, &json!({ "id": id })).await;
            print_users(ctx).await
        }
    }
}

fn confirm(reply: &UserMutationResponse, fallback: &str) {
    if reply.message.is_empty() {
        println!("{fallback}");
    } else {
        println!("{}", reply.message);
    }
}

pub async fn print_users(ctx: &AppContext) -> Result<()> {
    let users = ctx.api.list_users().await?;
    println!("{}", render::users(&users));
    Ok(())
}
