//! nimbus - a demonstration cloud-drive shell.
//!
//! Usage:
//!   nimbus              Launch the interactive shell on the demo drive
//!   nimbus --empty      Start with an empty drive
//!   nimbus ls           One-shot root listing of the demo drive
//!   nimbus export       Dump the demo drive as JSON
//!   nimbus --help       Show help
//!
//! The shell is a thin presentation layer: every intent is routed
//! through `FileTreeStore`, and simulated uploads run through
//! `nimbus-transfer` before the finished entry is inserted.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use humansize::{BINARY, format_size};
use tracing_subscriber::EnvFilter;

use nimbus_core::{Entry, EntryId, EntryPatch, FileTreeStore, StoreError, ViewMode, seed};
use nimbus_transfer::{UploadEvent, UploadOptions, UploadRequest, start_upload};

#[derive(Parser)]
#[command(
    name = "nimbus",
    version,
    about = "A demonstration cloud-drive shell",
    long_about = "nimbus drives an in-memory cloud-drive file tree from the terminal.\n\n\
                  Run with no subcommand for the interactive shell; type `help` there \
                  for the command list."
)]
struct Cli {
    /// Start with an empty drive instead of the demo catalog
    #[arg(long)]
    empty: bool,

    /// Initial view mode (grid or list)
    #[arg(long, default_value = "grid")]
    view: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the root listing and exit
    Ls,

    /// Export the drive as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut store = if cli.empty {
        FileTreeStore::new()
    } else {
        seed::demo_drive()
    };
    let view = ViewMode::from_str(&cli.view).map_err(|_| eyre!("unknown view mode: {}", cli.view))?;
    store.set_view_mode(view);

    match cli.command {
        Some(Command::Ls) => {
            print_listing(&store);
            Ok(())
        }
        Some(Command::Export { output }) => export(&store, output),
        None => run_shell(&mut store).await,
    }
}

/// Read-eval-print loop over the store.
async fn run_shell(store: &mut FileTreeStore) -> Result<()> {
    println!("nimbus drive shell — type `help` for commands");
    let stdin = io::stdin();

    loop {
        print!("{}", prompt(store));
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            continue;
        };

        if matches!(verb, "quit" | "exit") {
            break;
        }
        if let Err(e) = dispatch(store, verb, args).await {
            eprintln!("error: {e}");
        }
    }
    Ok(())
}

/// Shell prompt showing the breadcrumb of the current folder.
fn prompt(store: &FileTreeStore) -> String {
    let path: String = store
        .breadcrumb()
        .iter()
        .map(|e| format!("/{}", e.name))
        .collect();
    if path.is_empty() {
        "nimbus:/> ".to_string()
    } else {
        format!("nimbus:{path}> ")
    }
}

async fn dispatch(store: &mut FileTreeStore, verb: &str, args: &[&str]) -> Result<()> {
    match verb {
        "help" => print_help(),
        "ls" => print_listing(store),
        "pwd" => println!("{}", prompt(store).trim_end_matches("> ")),
        "cd" => cd(store, args)?,
        "mkdir" => mkdir(store, args)?,
        "upload" => upload(store, args).await?,
        "rm" => rm(store, args)?,
        "rename" => rename(store, args)?,
        "mv" => mv(store, args)?,
        "select" => store.select(&arg_id(args)?)?,
        "deselect" => store.deselect(&arg_id(args)?),
        "selection" => print_selection(store),
        "clear" => store.clear_selection(),
        "search" => store.set_search_filter(args.join(" ")),
        "view" => view(store, args)?,
        "star" => star(store, args, true)?,
        "unstar" => star(store, args, false)?,
        "share" => share(store, args)?,
        "starred" => print_entries(&store.starred()),
        "shared" => print_entries(&store.shared()),
        "recent" => print_entries(&store.recent(10)),
        "quota" => print_quota(store),
        "export" => export(store, None)?,
        other => eprintln!("unknown command: {other} (try `help`)"),
    }
    Ok(())
}

fn print_help() {
    println!(
        "\
  ls                      list the current folder (respects search filter)
  cd <id> | cd .. | cd /  navigate into a folder, up, or to the root
  pwd                     show the current path
  mkdir <name>            create a folder here
  upload <name> <bytes> [media-type]
                          simulate an upload into this folder
  rm [-r] <id>            remove an entry (-r cascades into folders)
  rename <id> <name>      rename an entry
  mv <id> <folder|/>      move an entry
  select/deselect <id>    manage the selection set
  selection | clear       show or clear the selection
  search [text]           set the name filter (no text clears it)
  view [grid|list]        show or switch the view mode
  star/unstar <id>        toggle the starred flag
  share <id> <user>       share an entry with a collaborator
  starred|shared|recent   sidebar listings
  quota                   storage usage
  export                  dump the drive as JSON
  quit"
    );
}

fn arg_id(args: &[&str]) -> Result<EntryId> {
    args.first()
        .map(|s| EntryId::new(*s))
        .ok_or_else(|| eyre!("expected an entry id"))
}

fn cd(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    match args.first() {
        None | Some(&"/") => store.navigate_to(None)?,
        Some(&"..") => store.navigate_up(),
        Some(&id) => store.navigate_to(Some(EntryId::new(id)))?,
    }
    Ok(())
}

fn mkdir(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        return Err(eyre!("expected a folder name"));
    }
    let id = store.allocate_id();
    let parent = store.current_folder().cloned();
    let folder = Entry::new_folder(id.clone(), args.join(" "), parent);
    store.create(folder)?;
    println!("created folder {id}");
    Ok(())
}

async fn upload(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    let (&name, rest) = args
        .split_first()
        .ok_or_else(|| eyre!("usage: upload <name> <bytes> [media-type]"))?;
    let size: u64 = rest
        .first()
        .ok_or_else(|| eyre!("expected a size in bytes"))?
        .parse()?;

    let id = store.allocate_id();
    let mut request = UploadRequest::new(id, name, size).with_parent(store.current_folder().cloned());
    if let Some(&media_type) = rest.get(1) {
        request = request.with_media_type(media_type);
    }

    let mut rx = start_upload(request, UploadOptions::default());
    while let Some(event) = rx.recv().await {
        match event {
            UploadEvent::Progress(p) => {
                print!("\r  uploading {name}: {:>3.0}%", p.percentage());
                io::stdout().flush()?;
            }
            UploadEvent::Complete(entry) => {
                println!();
                let id = entry.id.clone();
                store.create(entry)?;
                println!("uploaded {name} as {id}");
            }
            UploadEvent::Failed(error) => {
                println!();
                return Err(error.into());
            }
        }
    }
    Ok(())
}

fn rm(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    match args {
        [id] => {
            let entry = store.remove(&EntryId::new(*id))?;
            println!("removed {}", entry.name);
        }
        ["-r", id] => {
            let removed = store.remove_recursive(&EntryId::new(*id))?;
            println!("removed {} entries", removed.len());
        }
        _ => return Err(eyre!("usage: rm [-r] <id>")),
    }
    Ok(())
}

fn rename(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    let (&id, name) = args
        .split_first()
        .ok_or_else(|| eyre!("usage: rename <id> <name>"))?;
    if name.is_empty() {
        return Err(eyre!("expected a new name"));
    }
    store.rename(&EntryId::new(id), &name.join(" "))?;
    Ok(())
}

fn mv(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    let [id, dest] = args else {
        return Err(eyre!("usage: mv <id> <folder|/>"));
    };
    let parent = if *dest == "/" {
        None
    } else {
        Some(EntryId::new(*dest))
    };
    store.update(&EntryId::new(*id), EntryPatch::new().move_to(parent))?;
    Ok(())
}

fn view(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    match args.first() {
        None => println!("{}", store.view_mode()),
        Some(&mode) => {
            let mode = ViewMode::from_str(mode).map_err(|_| eyre!("unknown view mode: {mode}"))?;
            store.set_view_mode(mode);
        }
    }
    Ok(())
}

fn star(store: &mut FileTreeStore, args: &[&str], starred: bool) -> Result<()> {
    store.update(&arg_id(args)?, EntryPatch::new().starred(starred))?;
    Ok(())
}

fn share(store: &mut FileTreeStore, args: &[&str]) -> Result<()> {
    let [id, user] = args else {
        return Err(eyre!("usage: share <id> <user>"));
    };
    let id = EntryId::new(*id);
    let entry = store
        .entry(&id)
        .ok_or(StoreError::NotFound { id: id.clone() })?;

    let mut shared_with = entry.shared_with.clone();
    shared_with.insert((*user).into());
    store.update(&id, EntryPatch::new().shared_with(shared_with))?;
    Ok(())
}

fn print_listing(store: &FileTreeStore) {
    let listed = store.list_current();
    if listed.is_empty() {
        if store.search_filter().trim().is_empty() {
            println!("  (empty folder)");
        } else {
            println!("  (nothing matches {:?})", store.search_filter());
        }
        return;
    }

    match store.view_mode() {
        ViewMode::Grid => {
            for row in listed.chunks(4) {
                let cells: Vec<String> = row.iter().map(|e| format!("{:<24}", tag(e))).collect();
                println!("  {}", cells.join(""));
            }
        }
        ViewMode::List => print_entries(&listed),
    }
    println!("  {} items", listed.len());
}

fn print_entries(entries: &[&Entry]) {
    for entry in entries {
        let size = entry
            .size()
            .map(|s| format_size(s, BINARY))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {:<4} {:>10}  {}  {}",
            if entry.is_folder() { 'd' } else { '-' },
            entry.id,
            size,
            entry.updated_at.format("%Y-%m-%d"),
            tag(entry),
        );
    }
}

/// Name plus presentation markers.
fn tag(entry: &Entry) -> String {
    let mut out = entry.name.to_string();
    if entry.is_folder() {
        out.push('/');
    }
    if entry.starred {
        out.push_str(" *");
    }
    if !entry.shared_with.is_empty() {
        out.push_str(&format!(" (shared:{})", entry.shared_with.len()));
    }
    out
}

fn print_selection(store: &FileTreeStore) {
    if store.selection().is_empty() {
        println!("  (nothing selected)");
        return;
    }
    let mut ids: Vec<_> = store.selection().iter().map(|id| id.to_string()).collect();
    ids.sort();
    println!("  selected: {}", ids.join(", "));
}

fn print_quota(store: &FileTreeStore) {
    let storage = store.storage();
    println!(
        "  {} of {} used ({:.1}%)",
        format_size(storage.used, BINARY),
        format_size(storage.limit, BINARY),
        storage.percentage(),
    );
}

fn export(store: &FileTreeStore, output: Option<PathBuf>) -> Result<()> {
    let entries: Vec<&Entry> = store.entries().collect();
    let json = serde_json::to_string_pretty(&entries)?;
    match output {
        Some(path) => std::fs::write(&path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
