//! Command handlers bridging CLI input to the store and identity service.

use anyhow::{Result, bail};
use tracing::debug;

use super::{
    AddArgs, Command, EditArgs, FilterArgs, ListArgs, SigninArgs, SignupArgs, SortArgs,
};
use crate::error::Error;
use crate::format;
use crate::identity::Identity;
use crate::store::TodoStore;
use crate::store::views::{SortSpec, ViewParams};
use crate::types::{ALL_STATUSES, TodoCreateInput, TodoUpdateInput};

/// Dispatch a parsed command.
pub async fn run(command: Command, store: &mut TodoStore, identity: &dyn Identity) -> Result<()> {
    match command {
        Command::Init => init(store),
        Command::Signup(args) => signup(args, store, identity).await,
        Command::Signin(args) => signin(args, identity).await,
        Command::Signout => signout(identity).await,
        Command::Whoami => whoami(identity).await,
        Command::Users => users(identity).await,
        Command::Add(args) => add(args, store, identity).await,
        Command::List(args) => list(args, store, identity).await,
        Command::Show { id } => show(&id, store),
        Command::Edit(args) => edit(args, store, identity).await,
        Command::Toggle { id } => toggle(&id, store),
        Command::Rm { id } => rm(&id, store),
        Command::ClearCompleted => clear_completed(store),
        Command::ToggleAll { undone } => toggle_all(!undone, store),
        Command::Sort(args) => sort(args, store),
        Command::Filter(args) => filter(args, store, identity).await,
        Command::Stats => stats(store),
    }
}

fn init(store: &mut TodoStore) -> Result<()> {
    if store.initialize()? {
        println!("todo collection initialized");
    } else {
        println!("todo collection already initialized");
    }
    Ok(())
}

async fn signup(args: SignupArgs, store: &mut TodoStore, identity: &dyn Identity) -> Result<()> {
    let user = identity
        .sign_up(args.name.trim(), args.email.trim(), &args.password)
        .await?;
    // First account bootstraps the workspace.
    if store.initialize()? {
        debug!("collection initialized on signup");
    }
    println!("signed up as {} <{}>", user.name, user.email);
    Ok(())
}

async fn signin(args: SigninArgs, identity: &dyn Identity) -> Result<()> {
    let user = identity.sign_in(args.email.trim(), &args.password).await?;
    println!("signed in as {} <{}>", user.name, user.email);
    Ok(())
}

async fn signout(identity: &dyn Identity) -> Result<()> {
    identity.sign_out().await?;
    println!("signed out");
    Ok(())
}

async fn whoami(identity: &dyn Identity) -> Result<()> {
    match identity.current_user().await {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.id),
        None => println!("not signed in"),
    }
    Ok(())
}

async fn users(identity: &dyn Identity) -> Result<()> {
    let users = identity.list_users().await;
    print!("{}", format::format_users(&users));
    Ok(())
}

/// Resolve an assignee given as either a user id or a display name.
async fn resolve_assignee(identity: &dyn Identity, value: &str) -> Result<String> {
    let users = identity.list_users().await;
    if let Some(user) = users.iter().find(|user| user.id == value) {
        return Ok(user.id.clone());
    }
    if let Some(user) = users.iter().find(|user| user.name == value) {
        return Ok(user.id.clone());
    }
    bail!(Error::invalid_value(
        "assignee",
        format!("unknown user '{value}'")
    ))
}

async fn add(args: AddArgs, store: &mut TodoStore, identity: &dyn Identity) -> Result<()> {
    let title = args.title.trim().to_string();
    if title.is_empty() {
        bail!(Error::MissingField { field: "title" });
    }

    let Some(user) = identity.current_user().await else {
        bail!(Error::NotSignedIn);
    };

    let assignee_id = match args.assignee {
        Some(ref value) => Some(resolve_assignee(identity, value).await?),
        None => None,
    };

    let input = TodoCreateInput {
        title,
        description: args.description.trim().to_string(),
        status: args.status.into(),
        done: false,
        user_id: user.id,
        name: user.name,
        assignee_id,
        priority: args.priority.map(Into::into),
        due_date: args.due,
    };

    match store.add(input)? {
        Some(todo) => println!("added {}", todo.id),
        None => println!("collection uninitialized; run `tododeck init` first"),
    }
    Ok(())
}

async fn list(args: ListArgs, store: &TodoStore, identity: &dyn Identity) -> Result<()> {
    if !store.is_initialized() {
        println!("collection uninitialized; run `tododeck init` first");
        return Ok(());
    }

    let prefs = store.prefs();
    let mut params = ViewParams {
        sort: prefs.sort,
        statuses: prefs.statuses.clone(),
        assignee_id: prefs.assignee_id.clone(),
        start_date: prefs.start_date,
        end_date: prefs.end_date,
        search: args.search,
    };

    if let Some(key) = args.sort {
        params.sort.key = Some(key.into());
    }
    if let Some(order) = args.order {
        params.sort.order = order.into();
    }
    if args.any_status {
        params.statuses = ALL_STATUSES.to_vec();
    } else if let Some(statuses) = args.status {
        params.statuses = statuses.into_iter().map(Into::into).collect();
    }
    if let Some(ref value) = args.assignee {
        params.assignee_id = resolve_assignee(identity, value).await?;
    }
    if args.from.is_some() {
        params.start_date = args.from;
    }
    if args.to.is_some() {
        params.end_date = args.to;
    }

    let visible = store.visible_with(&params);
    let output: format::OutputFormat = args.format.into();
    match output {
        format::OutputFormat::Table => print!("{}", format::format_todo_list(&visible)),
        format::OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&visible)?),
    }
    Ok(())
}

fn show(id: &str, store: &TodoStore) -> Result<()> {
    match store.get(id) {
        Some(todo) => print!("{}", format::format_todo(todo)),
        None => println!("no todo with id {id}"),
    }
    Ok(())
}

async fn edit(args: EditArgs, store: &mut TodoStore, identity: &dyn Identity) -> Result<()> {
    if let Some(ref title) = args.title
        && title.trim().is_empty()
    {
        bail!(Error::MissingField { field: "title" });
    }

    let assignee_id = if args.unassign {
        Some(None)
    } else {
        match args.assignee {
            Some(ref value) => Some(Some(resolve_assignee(identity, value).await?)),
            None => None,
        }
    };

    let input = TodoUpdateInput {
        title: args.title.map(|t| t.trim().to_string()),
        description: args.description,
        status: args.status.map(Into::into),
        done: if args.done {
            Some(true)
        } else if args.undone {
            Some(false)
        } else {
            None
        },
        assignee_id,
        priority: if args.clear_priority {
            Some(None)
        } else {
            args.priority.map(|p| Some(p.into()))
        },
        due_date: if args.clear_due {
            Some(None)
        } else {
            args.due.map(Some)
        },
    };

    report_mutation(store.update(&args.id, input)?, &args.id, store, "updated");
    Ok(())
}

fn toggle(id: &str, store: &mut TodoStore) -> Result<()> {
    report_mutation(store.toggle_done(id)?, id, store, "toggled");
    Ok(())
}

fn rm(id: &str, store: &mut TodoStore) -> Result<()> {
    report_mutation(store.remove(id)?, id, store, "removed");
    Ok(())
}

fn clear_completed(store: &mut TodoStore) -> Result<()> {
    let removed = store.clear_completed()?;
    println!("removed {removed} completed todo(s)");
    Ok(())
}

fn toggle_all(done: bool, store: &mut TodoStore) -> Result<()> {
    store.set_all_done(done)?;
    println!(
        "marked all todos {}",
        if done { "done" } else { "not done" }
    );
    Ok(())
}

fn sort(args: SortArgs, store: &mut TodoStore) -> Result<()> {
    if args.clear {
        store.set_sort(SortSpec::default())?;
    } else if args.key.is_some() || args.order.is_some() {
        let mut spec = store.prefs().sort;
        if let Some(key) = args.key {
            spec.key = Some(key.into());
        }
        if let Some(order) = args.order {
            spec.order = order.into();
        }
        store.set_sort(spec)?;
    }

    let spec = store.prefs().sort;
    match spec.key {
        Some(key) => println!("sort: {} {}", key.as_str(), spec.order.as_str()),
        None => println!("sort: none (insertion order)"),
    }
    Ok(())
}

async fn filter(args: FilterArgs, store: &mut TodoStore, identity: &dyn Identity) -> Result<()> {
    if args.clear {
        store.set_status_filter(Vec::new())?;
        store.set_assignee_filter(String::new())?;
        store.set_date_filter(None, None)?;
    } else {
        if let Some(statuses) = args.status {
            store.set_status_filter(statuses.into_iter().map(Into::into).collect())?;
        }
        if args.clear_assignee {
            store.set_assignee_filter(String::new())?;
        } else if let Some(ref value) = args.assignee {
            let id = resolve_assignee(identity, value).await?;
            store.set_assignee_filter(id)?;
        }
        if args.clear_dates {
            store.set_date_filter(None, None)?;
        } else if args.from.is_some() || args.to.is_some() {
            let start = args.from.or(store.prefs().start_date);
            let end = args.to.or(store.prefs().end_date);
            store.set_date_filter(start, end)?;
        }
    }

    let prefs = store.prefs();
    let statuses: Vec<&str> = prefs.statuses.iter().map(|s| s.as_str()).collect();
    println!(
        "statuses: [{}] (empty shows nothing)",
        statuses.join(", ")
    );
    println!(
        "assignee: {}",
        if prefs.assignee_id.is_empty() {
            "(any)"
        } else {
            &prefs.assignee_id
        }
    );
    println!(
        "due: {} .. {}",
        prefs
            .start_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        prefs
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
    );
    Ok(())
}

fn stats(store: &TodoStore) -> Result<()> {
    print!(
        "{}",
        format::format_stats(store.incomplete_count(), store.has_completed())
    );
    Ok(())
}

/// Shared reporting for single-record mutations: missing ids and an
/// uninitialized collection are not errors, just nothing to do.
fn report_mutation(matched: bool, id: &str, store: &TodoStore, verb: &str) {
    if matched {
        println!("{verb} {id}");
    } else if !store.is_initialized() {
        println!("collection uninitialized; run `tododeck init` first");
    } else {
        println!("no todo with id {id}");
    }
}
