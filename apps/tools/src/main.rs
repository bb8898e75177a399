use anyhow::Result;
use clap::{Parser, Subcommand};
use server_api::{
    add_item, add_list, delete_item, delete_list, load_board, move_item, ApiContext,
};
use shared::{
    domain::{Condition, Direction, Item, ItemId, ListName},
    protocol::{AddItemForm, ListForm},
};
use storage::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/todo.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every list with its item count.
    Lists,
    Items {
        #[arg(long)]
        list: Option<String>,
    },
    AddList {
        name: String,
    },
    AddItem {
        list: String,
        text: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "to_do")]
        condition: String,
    },
    Move {
        item_id: i64,
        condition: String,
        way: String,
    },
    DeleteItem {
        item_id: i64,
    },
    DeleteList {
        name: String,
    },
}

fn print_item(item: &Item) {
    println!(
        "{:>5}  {:<6} {:<20} {}{}",
        item.id.0,
        item.condition.as_str(),
        item.list_name.display(),
        item.text,
        item.date
            .as_deref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let ctx = ApiContext::new(Storage::new(&cli.database_url).await?);

    match cli.command {
        Command::Lists => {
            let board = load_board(&ctx, None).await?;
            for list in &board.lists {
                let count = board
                    .items
                    .iter()
                    .filter(|item| &item.list_name == list)
                    .count();
                println!("{} ({count})", list.display());
            }
        }
        Command::Items { list } => {
            let board = load_board(&ctx, None).await?;
            let wanted = list.as_deref().map(ListName::from_input);
            for item in &board.items {
                if wanted
                    .as_ref()
                    .map_or(true, |wanted| wanted.display() == item.list_name.display())
                {
                    print_item(item);
                }
            }
        }
        Command::AddList { name } => {
            let item = add_list(&ctx, &ListForm { list_name: Some(name) }).await?;
            println!("created list '{}'", item.list_name.display());
        }
        Command::AddItem {
            list,
            text,
            date,
            condition,
        } => {
            let item = add_item(
                &ctx,
                &AddItemForm {
                    list_name: Some(list),
                    text: Some(text),
                    date,
                    condition: Some(condition),
                },
            )
            .await?;
            print_item(&item);
        }
        Command::Move {
            item_id,
            condition,
            way,
        } => {
            let submitted = condition.parse::<Condition>()?;
            let way = way.parse::<Direction>()?;
            let outcome = move_item(&ctx, ItemId(item_id), Some(submitted), Some(way)).await?;
            println!("{outcome:?}");
        }
        Command::DeleteItem { item_id } => {
            let outcome = delete_item(&ctx, ItemId(item_id)).await?;
            println!("{outcome:?}");
        }
        Command::DeleteList { name } => {
            let removed = delete_list(&ctx, &ListForm { list_name: Some(name) }).await?;
            println!("removed {removed} items");
        }
    }

    Ok(())
}
