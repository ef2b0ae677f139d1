/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level handlers:

- `run_chat`  - Interactive chat session (rustyline loop with slash commands)
- `run_image` - One-shot image generation, saved to disk
- `run_edit`  - One-shot image edit, saved to disk

The handlers are intentionally small and use the library components:
the gateway, the conversation store, and the media codec.
*/

use crate::chat::{ChatStore, TerminalNotifier};
use crate::codec;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{Gateway, GeminiGateway};
use crate::message::Message;
use crate::persona::Sender;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Slash commands recognized inside the interactive loop
///
/// Anything that does not start with `/` is a regular chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// `/image <prompt>` - generate an image in the conversation
    Image { prompt: String },
    /// `/edit <path> <prompt>` - edit a local image in the conversation
    Edit { path: PathBuf, prompt: String },
    /// `/attach <path> <prompt>` - send a message with an attached image
    Attach { path: PathBuf, prompt: String },
    /// `/persona <name>` - switch the assistant persona
    Persona(String),
    /// `/clear` - start a fresh conversation
    Clear,
    /// `/status` - show session state
    Status,
    /// `/help` - list commands
    Help,
    /// `/quit` or `/exit` - leave the session
    Exit,
    /// Unrecognized slash command
    Unknown(String),
    /// Regular chat input
    None,
}

/// Parse one line of interactive input
pub fn parse_slash_command(input: &str) -> SlashCommand {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return SlashCommand::None;
    }

    let mut words = trimmed.splitn(2, char::is_whitespace);
    let command = words.next().unwrap_or_default();
    let rest = words.next().unwrap_or("").trim();

    match command {
        "/image" => SlashCommand::Image {
            prompt: rest.to_string(),
        },
        "/edit" => match split_path_and_prompt(rest) {
            Some((path, prompt)) => SlashCommand::Edit { path, prompt },
            None => SlashCommand::Unknown(trimmed.to_string()),
        },
        "/attach" => match split_path_and_prompt(rest) {
            Some((path, prompt)) => SlashCommand::Attach { path, prompt },
            None => SlashCommand::Unknown(trimmed.to_string()),
        },
        "/persona" => SlashCommand::Persona(rest.to_string()),
        "/clear" => SlashCommand::Clear,
        "/status" => SlashCommand::Status,
        "/help" => SlashCommand::Help,
        "/quit" | "/exit" => SlashCommand::Exit,
        _ => SlashCommand::Unknown(trimmed.to_string()),
    }
}

/// Split `<path> <prompt...>` into its two pieces
fn split_path_and_prompt(rest: &str) -> Option<(PathBuf, String)> {
    let mut words = rest.splitn(2, char::is_whitespace);
    let path = words.next().filter(|p| !p.is_empty())?;
    let prompt = words.next().unwrap_or("").trim();
    if prompt.is_empty() {
        return None;
    }
    Some((PathBuf::from(path), prompt.to_string()))
}

/// Start an interactive chat session
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `persona` - Optional override for the configured persona
pub async fn run_chat(config: Config, persona: Option<String>) -> Result<()> {
    let mut chat_config = config.chat.clone();
    if let Some(name) = persona {
        // Fail fast on a bad CLI value instead of at store construction
        Sender::parse_persona(&name).map_err(crate::error::MdchatError::Config)?;
        chat_config.default_persona = name;
    }

    let gateway = GeminiGateway::new(config.gateway)?;
    let mut store = ChatStore::new(
        Box::new(gateway),
        Box::new(TerminalNotifier),
        &chat_config,
    )?;

    let mut rl = DefaultEditor::new()?;
    print_welcome_banner(store.persona());

    loop {
        let prompt = format!("{} >> ", store.persona().colored_tag());
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match parse_slash_command(trimmed) {
                    SlashCommand::Image { prompt } => {
                        let before = store.messages().len();
                        println!("{}", "Generating image...".dimmed());
                        store.generate_image(&prompt).await;
                        render_new_messages(&store, before);
                    }
                    SlashCommand::Edit { path, prompt } => {
                        let before = store.messages().len();
                        println!("{}", "Editing image...".dimmed());
                        store.edit_image(&prompt, path).await;
                        render_new_messages(&store, before);
                    }
                    SlashCommand::Attach { path, prompt } => {
                        let before = store.messages().len();
                        store.send_message(&prompt, vec![path]).await;
                        render_new_messages(&store, before);
                    }
                    SlashCommand::Persona(name) => match Sender::parse_persona(&name) {
                        Ok(persona) => {
                            let old = store.set_persona(persona);
                            println!(
                                "Switched from {} to {}\n",
                                old.display_name(),
                                persona.display_name()
                            );
                        }
                        Err(e) => println!("{}", e.yellow()),
                    },
                    SlashCommand::Clear => {
                        store.clear();
                        println!("Conversation cleared\n");
                    }
                    SlashCommand::Status => print_status(&store),
                    SlashCommand::Help => print_help(),
                    SlashCommand::Exit => break,
                    SlashCommand::Unknown(cmd) => {
                        println!("{}", format!("Unknown command: {}", cmd).yellow());
                        print_help();
                    }
                    SlashCommand::None => {
                        let before = store.messages().len();
                        store.send_message(trimmed, Vec::new()).await;
                        render_new_messages(&store, before);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Generate an image from a prompt and save it to disk
pub async fn run_image(config: Config, prompt: String, output: Option<PathBuf>) -> Result<()> {
    let gateway = GeminiGateway::new(config.gateway)?;
    let reply = gateway.generate_image(&prompt).await?;
    let path = save_image(&reply.image_url, output)?;
    println!("{}", format!("Saved image to {}", path.display()).green());
    Ok(())
}

/// Edit a local image according to a prompt and save the result
pub async fn run_edit(
    config: Config,
    image: PathBuf,
    prompt: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let gateway = GeminiGateway::new(config.gateway)?;
    let reply = gateway.edit_image(&prompt, &image).await?;
    let path = save_image(&reply.image_url, output)?;
    println!("{}", format!("Saved edited image to {}", path.display()).green());
    Ok(())
}

/// Decode a gateway data URI and write the image bytes to disk
///
/// When no output path is given, the extension is sniffed from the bytes
/// (falling back to the declared MIME type) and a timestamped name is used.
fn save_image(data_uri: &str, output: Option<PathBuf>) -> Result<PathBuf> {
    let (mime, bytes) = codec::decode_data_uri(data_uri)?;

    let path = match output {
        Some(path) => path,
        None => {
            let ext = image::guess_format(&bytes)
                .ok()
                .and_then(|format| format.extensions_str().first().copied())
                .unwrap_or(match mime.as_str() {
                    "image/png" => "png",
                    "image/jpeg" => "jpg",
                    "image/webp" => "webp",
                    _ => "bin",
                });
            PathBuf::from(format!(
                "mdchat-{}.{}",
                chrono::Utc::now().format("%Y%m%d-%H%M%S"),
                ext
            ))
        }
    };

    std::fs::write(&path, &bytes)?;
    Ok(path)
}

fn render_new_messages(store: &ChatStore, from: usize) {
    for message in &store.messages()[from..] {
        render_message(message);
    }
}

fn render_message(message: &Message) {
    println!(
        "{} {}",
        message.sender.colored_tag(),
        message.formatted_time().dimmed()
    );
    for image in &message.images {
        println!("  {}", image.display_label().cyan());
    }
    if !message.content.is_empty() {
        println!("{}", message.content);
    }
    println!();
}

fn print_welcome_banner(persona: Sender) {
    println!("{}", "Welcome to Mdchat".bold());
    println!(
        "Chatting with {} {}. Markdown is welcome in your messages.",
        persona.avatar(),
        persona.display_name()
    );
    println!("Type {} for commands, {} to leave.\n", "/help".cyan(), "/quit".cyan());
}

fn print_status(store: &ChatStore) {
    println!(
        "Persona: {}\nMessages: {}\nLoading: {}\n",
        store.persona().display_name(),
        store.messages().len(),
        store.is_loading()
    );
}

fn print_help() {
    println!("Available commands:");
    println!("  /image <prompt>          Generate an image");
    println!("  /edit <path> <prompt>    Edit a local image");
    println!("  /attach <path> <prompt>  Send a message with an attached image");
    println!("  /persona <name>          Switch persona (blue, red, green, purple)");
    println!("  /clear                   Start a fresh conversation");
    println!("  /status                  Show session state");
    println!("  /help                    Show this help");
    println!("  /quit                    Leave the session\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regular_input_is_none() {
        assert_eq!(parse_slash_command("hello there"), SlashCommand::None);
    }

    #[test]
    fn test_parse_image_command() {
        assert_eq!(
            parse_slash_command("/image a red fox"),
            SlashCommand::Image {
                prompt: "a red fox".to_string()
            }
        );
    }

    #[test]
    fn test_parse_edit_command() {
        assert_eq!(
            parse_slash_command("/edit photo.png make it blue"),
            SlashCommand::Edit {
                path: PathBuf::from("photo.png"),
                prompt: "make it blue".to_string()
            }
        );
    }

    #[test]
    fn test_parse_edit_without_prompt_is_unknown() {
        assert!(matches!(
            parse_slash_command("/edit photo.png"),
            SlashCommand::Unknown(_)
        ));
    }

    #[test]
    fn test_parse_attach_command() {
        assert_eq!(
            parse_slash_command("/attach cat.jpg what breed is this"),
            SlashCommand::Attach {
                path: PathBuf::from("cat.jpg"),
                prompt: "what breed is this".to_string()
            }
        );
    }

    #[test]
    fn test_parse_persona_command() {
        assert_eq!(
            parse_slash_command("/persona red"),
            SlashCommand::Persona("red".to_string())
        );
    }

    #[test]
    fn test_parse_exit_variants() {
        assert_eq!(parse_slash_command("/quit"), SlashCommand::Exit);
        assert_eq!(parse_slash_command("/exit"), SlashCommand::Exit);
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_slash_command("/clear"), SlashCommand::Clear);
        assert_eq!(parse_slash_command("/status"), SlashCommand::Status);
        assert_eq!(parse_slash_command("/help"), SlashCommand::Help);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(
            parse_slash_command("/frobnicate"),
            SlashCommand::Unknown(_)
        ));
    }

    #[test]
    fn test_save_image_writes_bytes_to_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");

        let saved = save_image("data:image/png;base64,aGVsbG8=", Some(out.clone())).unwrap();

        assert_eq!(saved, out);
        assert_eq!(std::fs::read(&out).unwrap(), b"hello");
    }

    #[test]
    fn test_save_image_rejects_malformed_uri() {
        assert!(save_image("not-a-data-uri", Some(PathBuf::from("x.png"))).is_err());
    }
}
