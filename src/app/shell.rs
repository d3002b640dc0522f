//! Line-oriented storefront shell
//!
//! Stands in for the web UI: one command per line, analyses run as spawned
//! tasks and report back over a channel, so a new mood can be submitted while
//! an older one is still in flight.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::state::{AnalysisCompletion, AppState, Tab};
use crate::error::{AppError, AppResult};

const HELP: &str = "\
Commands:
  tab <home|concerts|ootd|cravings|travel>  switch tab
  mood <text>                              get recommendations for the current tab
  list                                     show current recommendations
  add <n>                                  add recommendation n to the cart
  remove <id>                              remove a cart item (id or id prefix)
  cart                                     show the cart and total
  checkout                                 place the order
  address <text>                           set the delivery address
  key <api key>                            save your API key
  share                                    show share text for this tab
  status                                   show points and streak
  quit                                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Tab(Tab),
    Mood(String),
    List,
    Add(usize),
    Remove(String),
    Cart,
    Checkout,
    Address(String),
    Key(String),
    Share,
    Status,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> AppResult<Command> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "tab" => Tab::from_id(rest)
                .map(Command::Tab)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown tab: {}", rest)))?,
            "mood" => Command::Mood(rest.to_string()),
            "list" => Command::List,
            "add" => {
                let n: usize = rest
                    .parse()
                    .map_err(|_| AppError::InvalidInput("Usage: add <n>".to_string()))?;
                if n == 0 {
                    return Err(AppError::InvalidInput("Items are numbered from 1".to_string()));
                }
                Command::Add(n - 1)
            }
            "remove" if !rest.is_empty() => Command::Remove(rest.to_string()),
            "remove" => return Err(AppError::InvalidInput("Usage: remove <id>".to_string())),
            "cart" => Command::Cart,
            "checkout" => Command::Checkout,
            "address" => Command::Address(rest.to_string()),
            "key" => Command::Key(rest.to_string()),
            "share" => Command::Share,
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Unknown command: {} (try 'help')",
                    other
                )))
            }
        };

        Ok(command)
    }
}

/// Runs until `quit` or end of input.
///
/// At end of input, analyses still in flight are awaited so piped scripts
/// see their results.
pub async fn run<R, W>(state: &mut AppState, input: R, output: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<AnalysisCompletion>();
    let mut lines = input.lines();

    say(output, &format!("MoodBuy ({}). Type 'help' for commands.", state.tab())).await?;
    if !state.has_credential() {
        say(output, "No API key yet. Use 'key <api key>' first.").await?;
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(command) => handle(state, command, &tx, output).await?,
                    Err(e) => say(output, &e.user_message()).await?,
                }
            }
            Some(completion) = rx.recv() => {
                report(state, completion, output).await?;
            }
        }
    }

    drop(tx);
    while let Some(completion) = rx.recv().await {
        report(state, completion, output).await?;
    }

    Ok(())
}

async fn handle<W>(
    state: &mut AppState,
    command: Command,
    tx: &mpsc::UnboundedSender<AnalysisCompletion>,
    output: &mut W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match command {
        Command::Help => say(output, HELP).await,
        Command::Tab(tab) => {
            state.select_tab(tab);
            say(output, &format!("Switched to {}", tab)).await
        }
        Command::Mood(mood) => match state.begin_analysis(&mood) {
            Ok(request) => {
                let seq = request.seq;
                let client = state.client();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let completion = request.run(client.as_ref()).await;
                    // receiver only goes away on quit
                    let _ = tx.send(completion);
                });
                say(output, &format!("Analyzing your mood... {}", seq)).await
            }
            Err(e) => say(output, &e.user_message()).await,
        },
        Command::List => match state.recommendations() {
            Some(set) => say(output, &render_set(set)).await,
            None => say(output, "No recommendations yet.").await,
        },
        Command::Add(index) => match state.add_to_cart(index) {
            Ok(item) => {
                let line = format!("Added {} ({})", item.item.headline(), short_id(item.id));
                say(output, &line).await
            }
            Err(e) => say(output, &e.user_message()).await,
        },
        Command::Remove(prefix) => {
            let matches: Vec<Uuid> = state
                .cart()
                .items()
                .iter()
                .filter(|item| item.id.to_string().starts_with(&prefix))
                .map(|item| item.id)
                .collect();
            match matches.as_slice() {
                [id] => match state.remove_from_cart(*id) {
                    Some(item) => say(output, &format!("Removed {}", item.item.headline())).await,
                    None => say(output, "No such cart item.").await,
                },
                [] => say(output, "No such cart item.").await,
                _ => {
                    let line = format!(
                        "'{}' matches {} items, use a longer id.",
                        prefix,
                        matches.len()
                    );
                    say(output, &line).await
                }
            }
        }
        Command::Cart => say(output, &render_cart(state)).await,
        Command::Checkout => match state.checkout() {
            Ok(confirmation) => say(output, &confirmation.message()).await,
            Err(e) => say(output, &e.user_message()).await,
        },
        Command::Address(address) => {
            let session = state.set_address(&address);
            say(output, &format!("Delivering to: {}", session.address)).await
        }
        Command::Key(key) => match state.set_credential(&key) {
            Ok(()) => say(output, "API key saved.").await,
            Err(e) => say(output, &e.user_message()).await,
        },
        Command::Share => say(output, state.share_text()).await,
        Command::Status => {
            let session = state.session();
            let line = format!(
                "{} points, {} araw streak, delivering to {}",
                session.score, session.streak, session.address
            );
            say(output, &line).await
        }
        Command::Quit => Ok(()),
    }
}

async fn report<W>(
    state: &mut AppState,
    completion: AnalysisCompletion,
    output: &mut W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let outcome = state
        .complete_analysis(completion)
        .map(|applied| applied.map(render_set));

    match outcome {
        Ok(Some(rendered)) => {
            say(output, &rendered).await?;
            let score = state.session().score;
            say(output, &format!("+10 points! You now have {}.", score)).await
        }
        Ok(None) => Ok(()),
        Err(e) => {
            say(output, &e.user_message()).await?;
            if !state.has_credential() {
                say(output, "No API key yet. Use 'key <api key>' first.").await?;
            }
            Ok(())
        }
    }
}

fn render_set(set: &crate::models::RecommendationSet) -> String {
    let mut out = String::new();
    if let Some(analysis) = &set.mood_analysis {
        out.push_str(&format!("Mood: {}\n", analysis));
    }
    if set.is_empty() {
        out.push_str("No recommendations this time.");
        return out;
    }
    for (i, rec) in set.recommendations.iter().enumerate() {
        let common = rec.common();
        out.push_str(&format!(
            "{}. {} | {} | {} | ★ {}",
            i + 1,
            rec.headline(),
            common.price.as_deref().unwrap_or("-"),
            common.delivery.as_deref().unwrap_or("-"),
            common.rating.as_deref().unwrap_or("-"),
        ));
        if let Some(reason) = &common.reason {
            out.push_str(&format!("\n   {}", reason));
        }
        if i + 1 < set.len() {
            out.push('\n');
        }
    }
    out
}

fn render_cart(state: &AppState) -> String {
    let cart = state.cart();
    if cart.is_empty() {
        return "Your cart is empty!".to_string();
    }
    let mut out = String::new();
    for item in cart.items() {
        out.push_str(&format!(
            "{} [{}] {} {}\n",
            short_id(item.id),
            item.category,
            item.item.headline(),
            item.amount()
        ));
    }
    out.push_str(&format!(
        "Total: {} | Delivering to: {}",
        cart.total(),
        state.session().address
    ));
    out
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

async fn say<W>(output: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
