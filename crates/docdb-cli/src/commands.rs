use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use docdb_store::{Driver, Fields, StoreConfig, TracingLogger};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: u32,
    pub contact: String,
    pub company: String,
    pub address: Address,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let db = open(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Write(args) => cmd_write(&db, args, format),
        Command::Read(args) => cmd_read(&db, args, format),
        Command::ReadAll(args) => cmd_read_all(&db, args, format),
        Command::Delete(args) => {
            db.delete(&args.collection, &args.id)?;
            println!("{} Deleted {}/{}", "✓".green(), args.collection.bold(), args.id.yellow());
            Ok(())
        }
        Command::DeleteAll(args) => {
            db.delete_all(&args.collection)?;
            println!("{} Deleted collection {}", "✓".green(), args.collection.bold());
            Ok(())
        }
        Command::Demo => cmd_demo(&db, format),
    }
}

fn open(cli: &Cli) -> anyhow::Result<Driver> {
    let config = StoreConfig::default().with_logger(Arc::new(TracingLogger));
    Driver::open(&cli.root, Some(config))
        .with_context(|| format!("failed to open store at {}", cli.root.display()))
}

fn cmd_write(db: &Driver, args: WriteArgs, format: OutputFormat) -> anyhow::Result<()> {
    let raw = if args.json == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.json
    };
    let value: Value = serde_json::from_str(&raw).context("input is not valid JSON")?;
    let id = db.write(&args.collection, &value)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "_id": id })),
        OutputFormat::Text => {
            println!("{} Wrote {}/{}", "✓".green().bold(), args.collection.bold(), id.to_string().yellow())
        }
    }
    Ok(())
}

fn cmd_read(db: &Driver, args: DocArgs, format: OutputFormat) -> anyhow::Result<()> {
    let doc = db.read(&args.collection, &args.id)?;
    print_documents(&[doc], format)
}

fn cmd_read_all(db: &Driver, args: CollectionArgs, format: OutputFormat) -> anyhow::Result<()> {
    let docs = db.read_all(&args.collection)?;
    if docs.is_empty() && format == OutputFormat::Text {
        println!("Collection {} is empty.", args.collection.bold());
        return Ok(());
    }
    print_documents(&docs, format)
}

fn print_documents(docs: &[Fields], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(docs)?),
        OutputFormat::Text => {
            for doc in docs {
                let id = doc.get(docdb_store::ID_FIELD).and_then(Value::as_str).unwrap_or("?");
                println!("{}", id.yellow().bold());
                for (key, value) in doc.iter().filter(|(k, _)| k.as_str() != docdb_store::ID_FIELD) {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
    }
    Ok(())
}

/// The three users written by `docdb demo`.
pub fn sample_users() -> Vec<User> {
    let address = Address {
        city: "Abuja".into(),
        state: "FCT".into(),
        country: "Nigeria".into(),
        pincode: "221".into(),
    };
    [("Kosi", 21), ("david", 22), ("simon", 23)]
        .into_iter()
        .map(|(name, age)| User {
            name: name.into(),
            age,
            contact: "kosi@gmail.com".into(),
            company: "inova".into(),
            address: address.clone(),
        })
        .collect()
}

fn cmd_demo(db: &Driver, format: OutputFormat) -> anyhow::Result<()> {
    for user in sample_users() {
        db.write("users", &user)?;
    }
    let users: Vec<User> = db.read_all_as("users")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&users)?),
        OutputFormat::Text => {
            for u in &users {
                println!(
                    "{} ({}) {} at {}, {}",
                    u.name.bold(),
                    u.age,
                    u.contact.blue(),
                    u.company,
                    u.address.city
                );
            }
            println!("{} {} users in {}", "✓".green().bold(), users.len(), db.root().display());
        }
    }
    Ok(())
}
