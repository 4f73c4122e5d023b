use std::sync::Arc;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use engine::{
    Category, CategoryTotal, Credentials, Engine, Expense, FileStore, Identity, PersistPolicy,
    Theme, format_amount, grand_total,
};

use crate::{config::AppConfig, error::Result, prompt};

#[derive(Parser, Debug)]
#[command(name = "smartspend", disable_version_flag = true)]
#[command(about = "Track expenses per category from the terminal")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the data file path.
    #[arg(long, global = true)]
    pub data_path: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in. Without an email, the remembered one is used.
    Login {
        email: Option<String>,
        /// Remember the email for the next sign-in.
        #[arg(long, conflicts_with = "forget")]
        remember: bool,
        /// Forget the remembered email.
        #[arg(long)]
        forget: bool,
        /// Read the password from stdin instead of prompting.
        #[arg(long)]
        password_stdin: bool,
    },
    /// Create an account and sign in.
    Signup {
        email: String,
        /// Read password and confirmation (two lines) from stdin.
        #[arg(long)]
        password_stdin: bool,
    },
    /// Sign out. Stored expenses stay on this device.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Record an expense.
    Add {
        amount: String,
        category: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete an expense by id.
    Delete { id: String },
    /// Show recent expenses, newest first.
    List {
        #[arg(long, conflicts_with = "all", value_parser = clap::value_parser!(u16).range(1..))]
        limit: Option<u16>,
        #[arg(long)]
        all: bool,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: Option<CategoryCommand>,
    },
    /// Spending by category.
    Stats,
    /// Show or change the theme preference.
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommand>,
    },
    /// Delete every stored expense and category of the signed-in user.
    Wipe {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = engine::categories::FALLBACK_ICON)]
        icon: String,
        #[arg(long, default_value = engine::categories::DEFAULT_COLOR)]
        color: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    Get,
    Set { name: String },
}

pub fn run(command: Command, config: &AppConfig) -> Result<()> {
    let store = FileStore::open(&config.data_path)?;
    let mut engine = Engine::builder()
        .store(Arc::new(store))
        .persist_policy(PersistPolicy::from_persist_empty(
            config.persist_empty_expenses,
        ))
        .build()?;

    match command {
        Command::Login {
            email,
            remember,
            forget,
            password_stdin,
        } => {
            let email = match email {
                Some(email) => email,
                None => engine
                    .sessions()
                    .remembered()?
                    .map(|identity| identity.to_string())
                    .unwrap_or_default(),
            };
            let password = if password_stdin {
                prompt::lines_from_stdin(1)?.remove(0)
            } else {
                prompt::password("Password: ")?
            };
            let identity = Credentials::sign_in(&email, &password)?;
            if remember {
                engine.sessions().remember(&identity)?;
            } else if forget {
                engine.sessions().forget_remembered()?;
            }
            engine.login(identity)?;
            println!("Welcome back! Signed in as {email}", email = email.trim());
        }
        Command::Signup {
            email,
            password_stdin,
        } => {
            let (password, confirm) = if password_stdin {
                let mut lines = prompt::lines_from_stdin(2)?;
                let confirm = lines.remove(1);
                (lines.remove(0), confirm)
            } else {
                prompt::password_twice()?
            };
            let identity = Credentials::sign_up(&email, &password, &confirm)?;
            let name = identity.to_string();
            engine.login(identity)?;
            println!("Account created! Signed in as {name}");
        }
        Command::Logout => {
            engine.logout()?;
            println!("Signed out. Your data stays on this device.");
        }
        Command::Whoami => match engine.identity() {
            Some(identity) => println!("{identity}"),
            None => println!("Not signed in"),
        },
        Command::Add {
            amount,
            category,
            note,
        } => {
            let amount = engine::parse_amount(&amount)?;
            let expense = engine.add_expense_with_note(amount, &category, note.as_deref())?;
            println!(
                "{} added to {} ({})",
                format_amount(expense.amount),
                expense.category,
                expense.id
            );
        }
        Command::Delete { id } => match engine.delete_expense(&id)? {
            Some(expense) => println!("Deleted {expense}"),
            None => println!("No expense with id {id}"),
        },
        Command::List { limit, all } => {
            let ledger = engine.ledger()?;
            let shown = if all {
                ledger.expenses()
            } else {
                ledger.recent(limit.map_or(config.recent_limit, usize::from))
            };
            print!("{}", render_expenses(shown, ledger.categories()));
        }
        Command::Categories { command } => match command.unwrap_or(CategoryCommand::List) {
            CategoryCommand::List => {
                print!("{}", render_categories(engine.ledger()?.categories()));
            }
            CategoryCommand::Add { name, icon, color } => {
                let category = engine.add_category(&name, &icon, &color)?;
                println!("\"{}\" has been added ({})", category.name, category.id);
            }
            CategoryCommand::Delete { id } => match engine.delete_category(&id)? {
                Some(category) => println!("\"{}\" has been removed", category.name),
                None => println!("No category with id {id}"),
            },
        },
        Command::Stats => {
            let ledger = engine.ledger()?;
            let total = grand_total(ledger.expenses());
            print!("{}", render_totals(&engine.category_totals()?, total));
        }
        Command::Theme { command } => match command.unwrap_or(ThemeCommand::Get) {
            ThemeCommand::Get => println!("{}", engine.theme()?),
            ThemeCommand::Set { name } => {
                let theme: Theme = name.parse()?;
                engine.set_theme(theme)?;
                println!("Switched to {theme} theme.");
            }
        },
        Command::Wipe { yes } => {
            let identity: Identity = engine.ledger()?.identity().clone();
            if !yes {
                println!("This deletes all data of {identity}. Re-run with --yes to confirm.");
                return Ok(());
            }
            engine.wipe()?;
            println!("All data of {identity} has been cleared from this device.");
        }
    }

    Ok(())
}

fn render_expenses(expenses: &[Expense], categories: &[Category]) -> String {
    if expenses.is_empty() {
        return "No expenses yet\n".to_string();
    }
    let mut out = String::new();
    for expense in expenses {
        let icon = categories
            .iter()
            .find(|c| c.name == expense.category)
            .map_or(engine::categories::FALLBACK_ICON, |c| c.icon.as_str());
        let date = expense.date.with_timezone(&Local).format("%b %-d, %Y • %-I:%M %p");
        out.push_str(&format!(
            "{}  {date}  {icon} {}  {}",
            expense.id,
            expense.category,
            format_amount(expense.amount)
        ));
        if let Some(note) = &expense.note {
            out.push_str(&format!("  {note}"));
        }
        out.push('\n');
    }
    out
}

fn render_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| format!("{}  {} {}  {}\n", c.id, c.icon, c.name, c.color))
        .collect()
}

fn render_totals(totals: &[CategoryTotal], grand_total: f64) -> String {
    if totals.is_empty() {
        return "No data yet\n".to_string();
    }
    let mut out = String::new();
    for slice in totals {
        out.push_str(&format!(
            "{} {}  {}  {:.1}%\n",
            slice.icon,
            slice.name,
            format_amount(slice.total),
            slice.share(grand_total)
        ));
    }
    out.push_str(&format!("Total  {}\n", format_amount(grand_total)));
    out
}
