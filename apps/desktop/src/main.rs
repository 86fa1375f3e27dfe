use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{BookClient, CatalogApi};
use shared::{
    dates::format_date,
    domain::{Book, BookId, NewBook},
    protocol::DEFAULT_API_BASE_URL,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bookshelf-cli", about = "Headless access to the book catalog")]
struct Args {
    #[arg(long, env = "BOOKSHELF_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every book in backend order.
    List,
    Add(BookArgs),
    Update {
        id: String,
        #[command(flatten)]
        book: BookArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(ClapArgs, Debug)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long)]
    genre: String,
    /// Calendar date, YYYY-MM-DD.
    #[arg(long)]
    published: String,
}

impl From<BookArgs> for NewBook {
    fn from(args: BookArgs) -> Self {
        NewBook {
            title: args.title,
            author: args.author,
            genre: args.genre,
            published_date: args.published,
        }
    }
}

fn print_book(book: &Book) {
    let id = book.persisted_id().map(BookId::as_str).unwrap_or("-");
    println!(
        "{id}\t{}\tby {}\t[{}]\t{}",
        book.title,
        book.author,
        book.genre,
        format_date(&book.published_date)
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let client = BookClient::new(&args.api_url)?;
    tracing::debug!(api_base_url = %client.base_url(), command = ?args.command, "running");
    if let Err(err) = run(&client, args.command).await {
        if let Some(client_err) = err.downcast_ref::<client_core::ClientError>() {
            if client_err.is_transport() {
                eprintln!("is the catalog API running at {}?", client.base_url());
            }
        }
        return Err(err);
    }
    Ok(())
}

async fn run(client: &dyn CatalogApi, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let books = client.list_books().await?;
            if books.is_empty() {
                println!("No books found.");
            }
            for book in &books {
                print_book(book);
            }
        }
        Command::Add(args) => {
            let book = NewBook::from(args);
            Book::from(book.clone()).validate()?;
            let created = client.create_book(&book).await?;
            print_book(&created);
        }
        Command::Update { id, book } => {
            let id = BookId::new(id.trim());
            if id.as_str().is_empty() {
                bail!("book id must not be empty");
            }
            let mut book = Book::from(NewBook::from(book));
            book.id = Some(id.clone());
            book.validate()?;
            let updated = client
                .update_book(&id, &book)
                .await
                .with_context(|| format!("updating book {id}"))?;
            print_book(&updated);
        }
        Command::Delete { id } => {
            let id = BookId::new(id.trim());
            if id.as_str().is_empty() {
                bail!("book id must not be empty");
            }
            let ack = client
                .delete_book(&id)
                .await
                .with_context(|| format!("deleting book {id}"))?;
            println!("{}", ack.message.unwrap_or_else(|| format!("deleted {id}")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
