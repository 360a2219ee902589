//! Subcommand handlers

use admin_client::router::menu;
use admin_client::service::Resource;
use admin_client::{AdminConsole, EntityStore};
use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::RuleFilter;

use crate::cli::{
    AccountCommand, Command, CrudCommand, ListArgs, PermissionCommand, RoleCommand, RuleCommand,
};

pub async fn run(console: &AdminConsole, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = console.auth().login(&username, &password).await?;
            println!("Signed in as {} ({})", console.auth().display_name(), user.email);
        }
        Command::Logout => {
            let result = console.auth().logout().await;
            println!("Signed out");
            result.context("backend logout failed; local session was cleared")?;
        }
        Command::Whoami => {
            let session = console.auth().state();
            if session.is_logged_in {
                print_json(&session.user_info())?;
            } else {
                println!("{}", session.display_name());
            }
        }
        Command::Routes => {
            for route in console.navigator().table().routes() {
                println!(
                    "{:<16} {:<14} auth={:<5} {}",
                    route.path,
                    route.name.as_deref().unwrap_or("-"),
                    route.meta.requires_auth,
                    route.meta.title,
                );
            }
        }
        Command::Navigate { path } => {
            let navigation = console.navigator().navigate(&path)?;
            match navigation.redirected_from {
                Some(from) => println!("{} -> {} (login required)", from, navigation.path),
                None => println!("{}", navigation.path),
            }
        }
        Command::Menu => {
            let items = menu::visible_for(&menu::default_menu(), &console.session().roles());
            print_menu(&items, 0);
        }
        Command::Accounts(command) => accounts(console, command).await?,
        Command::Roles(command) => roles(console, command).await?,
        Command::Permissions(command) => match command {
            PermissionCommand::List(args) => {
                list(console.permissions(), &args, Default::default()).await?
            }
            PermissionCommand::Crud(command) => crud(console.permissions(), command).await?,
        },
        Command::Rules(command) => match command {
            RuleCommand::List { list: args, role_id } => {
                list(console.rules(), &args, RuleFilter { role_id }).await?
            }
            RuleCommand::Crud(command) => crud(console.rules(), command).await?,
        },
    }
    Ok(())
}

async fn accounts(console: &AdminConsole, command: AccountCommand) -> anyhow::Result<()> {
    let store = console.accounts();
    match command {
        AccountCommand::List(args) => list(store.entities(), &args, Default::default()).await?,
        AccountCommand::AssignRoles { id, role_ids } => {
            store.assign_roles(&id, role_ids).await?;
            println!("Roles of {} replaced", id);
        }
        AccountCommand::UserRoles { id } => {
            print_json(&store.load_user_roles(&id).await?)?;
        }
        AccountCommand::Crud(command) => crud(store.entities(), command).await?,
    }
    Ok(())
}

async fn roles(console: &AdminConsole, command: RoleCommand) -> anyhow::Result<()> {
    let store = console.roles();
    match command {
        RoleCommand::List(args) => list(store, &args, Default::default()).await?,
        RoleCommand::All => print_json(&store.service().all().await?)?,
        RoleCommand::Permissions { id } => {
            print_json(&store.service().permissions(&id).await?)?
        }
        RoleCommand::AssignPermissions { id, permission_ids } => {
            store.service().assign_permissions(&id, permission_ids).await?;
            store.refresh().await?;
            println!("Permissions of {} replaced", id);
        }
        RoleCommand::Crud(command) => crud(store, command).await?,
    }
    Ok(())
}

async fn list<R>(store: &EntityStore<R>, args: &ListArgs, filter: R::Filter) -> anyhow::Result<()>
where
    R: Resource,
    R::Entity: Serialize,
{
    let mut query = store.query();
    if let Some(page) = args.page {
        query.page = page;
    }
    if let Some(page_size) = args.page_size {
        query.page_size = page_size;
    }
    if let Some(search) = &args.search {
        query.search = search.clone();
    }
    query.filter = filter;

    store.load(query).await?;
    let state = store.snapshot();
    print_json(&state.list)?;
    println!(
        "page {} of {} ({} total)",
        state.page,
        state.total.div_ceil(u64::from(state.page_size)).max(1),
        state.total
    );
    Ok(())
}

async fn crud<R>(store: &EntityStore<R>, command: CrudCommand) -> anyhow::Result<()>
where
    R: Resource,
    R::Entity: Serialize,
    R::Create: DeserializeOwned,
    R::Update: DeserializeOwned,
{
    match command {
        CrudCommand::Create { json } => {
            let payload: R::Create =
                serde_json::from_str(&json).context("invalid create payload")?;
            print_json(&store.add(&payload).await?)?;
        }
        CrudCommand::Update { json } => {
            let payload: R::Update =
                serde_json::from_str(&json).context("invalid update payload")?;
            print_json(&store.edit(&payload).await?)?;
        }
        CrudCommand::Delete { id } => {
            store.remove(&id).await?;
            println!("Deleted {} {}", R::NAME, id);
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_menu(items: &[menu::MenuItem], depth: usize) {
    for item in items {
        println!("{}{} ({})", "  ".repeat(depth), item.title, item.path);
        print_menu(&item.children, depth + 1);
    }
}

