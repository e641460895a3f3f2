use std::io::{self, Write};

use anyhow::{Context, Result};
use pagemark_cli::confirm::{Decision, settle_pending};
use pagemark_cli::render::{books_table, entries_table, format_percent};
use pagemark_cli::session::Session;
use pagemark_core::{BookId, EntryId};

use crate::cli::{AddBookArgs, Command, LogArgs};

pub fn run(command: Command, session: &mut Session, assume_yes: bool) -> Result<()> {
    match command {
        Command::Books { filter } => run_books(session, filter.as_deref()),
        Command::AddBook(args) => run_add_book(session, &args),
        Command::Rename { id, title } => {
            let id = BookId::from(id.as_str());
            session
                .library_mut()
                .rename_book(&id, &title)
                .context("rename book")?;
            println!("Renamed {id}");
            Ok(())
        }
        Command::Reprice { id, price } => {
            let id = BookId::from(id.as_str());
            session
                .library_mut()
                .reprice_book(&id, price)
                .context("reprice book")?;
            println!("Repriced {id}");
            Ok(())
        }
        Command::Resize { id, pages } => {
            let id = BookId::from(id.as_str());
            session.library_mut().resize_book(&id, pages)?;
            settle(session, assume_yes)
        }
        Command::RemoveBook { id } => {
            let id = BookId::from(id.as_str());
            session.library_mut().delete_book(&id)?;
            settle(session, assume_yes)
        }
        Command::Show { id } => run_show(session, &BookId::from(id.as_str())),
        Command::Log(args) => run_log(session, &args),
        Command::Toggle { id, entry } => {
            let id = BookId::from(id.as_str());
            let entry = EntryId::from(entry.as_str());
            let enabled = session
                .library_mut()
                .toggle_enabled(&id, &entry)
                .context("toggle progress")?;
            println!(
                "{entry} is now {}",
                if enabled { "enabled" } else { "disabled" }
            );
            print_metrics(session, &id)
        }
        Command::Unlog { id, entry } => {
            let id = BookId::from(id.as_str());
            let entry = EntryId::from(entry.as_str());
            session.library_mut().delete_entry(&id, &entry)?;
            settle(session, assume_yes)
        }
    }
}

fn run_books(session: &Session, filter: Option<&str>) -> Result<()> {
    let library = session.library();
    let books = library.list_books(filter);
    if books.is_empty() {
        println!("No books in {}.", session.data_dir().display());
        return Ok(());
    }
    let rows = books
        .into_iter()
        .map(|book| {
            let metrics = library.metrics(&book.id)?;
            Ok((book, metrics))
        })
        .collect::<Result<Vec<_>>>()?;
    println!("{}", books_table(&rows));
    Ok(())
}

fn run_add_book(session: &mut Session, args: &AddBookArgs) -> Result<()> {
    let book = session
        .library_mut()
        .create_book(&args.title, args.pages, args.price)
        .context("add book")?;
    println!("Added {} ({})", book.title, book.id);
    Ok(())
}

fn run_show(session: &Session, id: &BookId) -> Result<()> {
    let library = session.library();
    let book = library
        .book(id)
        .with_context(|| format!("no book with id {id}"))?;
    let metrics = library.metrics(id)?;
    println!("{}", books_table(&[(book.clone(), metrics)]));

    let entries = library.entries(id);
    if entries.is_empty() {
        println!("No progress logged.");
    } else {
        println!("{}", entries_table(entries));
    }
    println!("Next start page: {}", library.next_from_page(id));
    Ok(())
}

fn run_log(session: &mut Session, args: &LogArgs) -> Result<()> {
    let id = BookId::from(args.id.as_str());
    let from = args
        .from
        .unwrap_or_else(|| session.library().next_from_page(&id));
    let entry = session
        .library_mut()
        .add_entry(&id, from, args.to)
        .context("log progress")?;
    println!(
        "Logged pages {}-{} ({})",
        entry.from_page_number, entry.to_page_number, entry.id
    );
    print_metrics(session, &id)
}

fn settle(session: &mut Session, assume_yes: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompt_out = io::stderr();
    match settle_pending(session, assume_yes, &mut input, &mut prompt_out)? {
        Decision::Confirmed(prompt) => println!("Done: {}", prompt.title),
        Decision::Cancelled(_) => {
            writeln!(prompt_out, "Cancelled.")?;
        }
    }
    Ok(())
}

fn print_metrics(session: &Session, id: &BookId) -> Result<()> {
    let metrics = session.library().metrics(id)?;
    println!(
        "Progress: {} ({} pages, {} consumed)",
        format_percent(metrics.progress_percent),
        metrics.pages_read,
        metrics.price_consumed
    );
    Ok(())
}
