//! Command parsing, dispatch and plain-text rendering.

use crate::config::HubConfig;
use crate::error::{HubError, HubResult};
use espora_checklist::{
    counts, local_today, parse_due_date, spawn_refresher, CategoryCounts, ChecklistSession,
    TaskBoard, UserDirectory,
};
use espora_core::{DueFilter, ItemId, KnownField, MutationOutcome, User, UserId};
use espora_storage::{JsonFileKvStore, LocalStore};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

pub const USAGE: &str = "espora-hub [--config <path>] <command>

commands:
  checklist                         show the checklist by section
  toggle <itemId>                   flip completion
  assign <itemId> <userId>          assign an item (empty userId clears)
  due <itemId> <YYYY-MM-DD>         set a due date (empty clears)
  field <itemId> <name> <value>     set a field value
  delete <itemId>                   delete an item and its data
  reconcile                         refresh copied assignment fields
  tasks [filter]                    list assignments (all, past, today,
                                    this-week, next-week, later, no-date)
  users                             list the user directory
  watch                             print task counts as they change";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Checklist,
    Toggle(ItemId),
    Assign(ItemId, UserId),
    Due(ItemId, String),
    Field(ItemId, String, String),
    Delete(ItemId),
    Reconcile,
    Tasks(DueFilter),
    Users,
    Watch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

/// Parse arguments (without the program name).
pub fn parse_args<I>(args: I) -> HubResult<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut config_path = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args
                .next()
                .ok_or_else(|| HubError::Usage("--config requires a path".to_string()))?;
            config_path = Some(PathBuf::from(path));
        } else {
            positional.push(arg);
        }
    }

    let words: Vec<&str> = positional.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        ["checklist"] => Command::Checklist,
        ["toggle", id] => Command::Toggle(ItemId::from(*id)),
        ["assign", id, user] => Command::Assign(ItemId::from(*id), UserId::from(*user)),
        ["due", id, date] => Command::Due(ItemId::from(*id), date.to_string()),
        ["field", id, name, value] => {
            Command::Field(ItemId::from(*id), name.to_string(), value.to_string())
        }
        ["delete", id] => Command::Delete(ItemId::from(*id)),
        ["reconcile"] => Command::Reconcile,
        ["tasks"] => Command::Tasks(DueFilter::All),
        ["tasks", filter] => Command::Tasks(
            filter
                .parse()
                .map_err(|e: espora_core::ParseEnumError| HubError::Usage(e.to_string()))?,
        ),
        ["users"] => Command::Users,
        ["watch"] => Command::Watch,
        _ => return Err(HubError::Usage(USAGE.to_string())),
    };
    Ok(Invocation {
        config_path,
        command,
    })
}

fn open_store(config: &HubConfig) -> LocalStore {
    LocalStore::new(Arc::new(JsonFileKvStore::open(&config.store_path)))
}

pub fn open_session(config: &HubConfig) -> ChecklistSession {
    ChecklistSession::open(open_store(config), Arc::new(config.authorizer()))
}

/// Run a synchronous command, writing its report to `out`.
pub fn execute(command: &Command, config: &HubConfig, out: &mut impl Write) -> HubResult<()> {
    let directory = config.directory();
    let mut session = open_session(config);

    match command {
        Command::Checklist => {
            write!(out, "{}", render_checklist(&session, &directory))?;
        }
        Command::Toggle(id) => {
            let outcome = session.toggle_completion(id);
            writeln!(out, "{}", render_outcome("toggle", id, outcome))?;
        }
        Command::Assign(id, user) => {
            check_user(&directory, user.as_str())?;
            let outcome = session.assign(id, user);
            writeln!(out, "{}", render_outcome("assign", id, outcome))?;
        }
        Command::Due(id, date) => {
            if !date.trim().is_empty() && parse_due_date(date).is_none() {
                return Err(HubError::Usage(format!("invalid date '{}'", date)));
            }
            let outcome = session.set_due_date(id, date);
            writeln!(out, "{}", render_outcome("due", id, outcome))?;
        }
        Command::Field(id, name, value) => {
            if name == KnownField::AssignedUser.name() {
                check_user(&directory, value)?;
            }
            let outcome = session.set_field(id, name, value);
            writeln!(out, "{}", render_outcome("field", id, outcome))?;
        }
        Command::Delete(id) => {
            let outcome = session.delete_item(id);
            writeln!(out, "{}", render_outcome("delete", id, outcome))?;
        }
        Command::Reconcile => match session.reconcile() {
            MutationOutcome::Denied => writeln!(out, "Access denied: reconcile")?,
            _ => writeln!(out, "reconcile: {} assignments", session.assignments().len())?,
        },
        Command::Tasks(filter) => {
            let board = session.board(local_today());
            write!(out, "{}", render_tasks(&board, *filter, &directory))?;
        }
        Command::Users => {
            write!(out, "{}", render_users(&directory.list_users()))?;
        }
        Command::Watch => {
            return Err(HubError::Usage(
                "watch runs inside the async runtime".to_string(),
            ));
        }
    }

    let stats = session.stats();
    if stats.write_failures > 0 {
        tracing::warn!(failures = stats.write_failures, "Some changes were not saved");
    }
    Ok(())
}

/// Reject a non-empty user id missing from the directory.
fn check_user(directory: &impl UserDirectory, user: &str) -> HubResult<()> {
    let user = user.trim();
    if !user.is_empty() && directory.find_user(&UserId::from(user)).is_none() {
        return Err(HubError::UnknownUser(user.to_string()));
    }
    Ok(())
}

/// Print category counts whenever the persisted assignment list changes,
/// until Ctrl-C or the refresher stops.
pub async fn watch(config: &HubConfig, out: &mut impl Write) -> HubResult<()> {
    let mut handle = spawn_refresher(open_store(config), config.refresh_interval());
    let initial = handle.latest();
    writeln!(out, "{}", render_counts(&counts(&initial.assignments, local_today())))?;
    out.flush()?;

    loop {
        tokio::select! {
            feed = handle.changed() => match feed {
                Some(feed) => {
                    writeln!(out, "{}", render_counts(&counts(&feed.assignments, local_today())))?;
                    out.flush()?;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }
    Ok(())
}

// === Rendering ===

fn user_name(directory: &impl UserDirectory, id: &UserId) -> String {
    directory
        .find_user(id)
        .map(|u| u.name)
        .unwrap_or_else(|| id.to_string())
}

pub fn render_checklist(session: &ChecklistSession, directory: &impl UserDirectory) -> String {
    let mut text = String::new();
    for group in session.grouped() {
        text.push_str(group.title);
        text.push('\n');
        for item in &group.items {
            let mark = if item.completed { 'x' } else { ' ' };
            text.push_str(&format!("  [{}] {}  {}", mark, item.id, item.concept));

            let assignee = session.field_value(&item.id, KnownField::AssignedUser.name());
            let due = session.due_date(&item.id);
            if !assignee.is_empty() || !due.is_empty() {
                let who = if assignee.is_empty() {
                    "unassigned".to_string()
                } else {
                    user_name(directory, &UserId::from(assignee))
                };
                let when = if due.is_empty() { "no date" } else { due };
                text.push_str(&format!("  ({}, {})", who, when));
            }
            text.push('\n');
        }
    }
    let progress = session.progress();
    text.push_str(&format!(
        "Progress: {}/{} ({:.0}%)\n",
        progress.completed,
        progress.total,
        progress.percentage()
    ));
    text
}

pub fn render_outcome(action: &str, id: &ItemId, outcome: MutationOutcome) -> String {
    match outcome {
        MutationOutcome::Applied => format!("{}: {} ok", action, id),
        MutationOutcome::Denied => format!("Access denied: {} on {}", action, id),
        MutationOutcome::NotFound => format!("Item not found: {}", id),
    }
}

pub fn render_counts(counts: &CategoryCounts) -> String {
    let mut parts = vec![format!("all {}", counts.total())];
    parts.extend(
        counts
            .iter()
            .map(|(category, count)| format!("{} {}", category, count)),
    );
    parts.join(" | ")
}

pub fn render_tasks(board: &TaskBoard<'_>, filter: DueFilter, directory: &impl UserDirectory) -> String {
    let mut text = render_counts(&board.counts());
    text.push('\n');
    for record in board.filter(filter) {
        let mark = if record.completed { 'x' } else { ' ' };
        let category = board
            .category_of(record)
            .map(|c| c.to_string())
            .unwrap_or_default();
        let due = if record.due_date.is_empty() {
            "-"
        } else {
            record.due_date.as_str()
        };
        text.push_str(&format!(
            "  [{}] {}  {}  {}  {}  {} ({})\n",
            mark,
            record.item_id,
            record.concept,
            record.section,
            user_name(directory, &record.user_id),
            due,
            category
        ));
    }
    text
}

pub fn render_users(users: &[User]) -> String {
    users
        .iter()
        .map(|u| format!("{}  {}  {}\n", u.id, u.name, u.role))
        .collect()
}
