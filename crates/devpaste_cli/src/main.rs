//! Command-line client for the DevPaste API.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use devpaste_core::config::resolve_home_dir;
use devpaste_core::models::paste::Language;
use devpaste_core::DEFAULT_CLI_SERVER_URL;
use serde_json::{json, Map, Value};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};


const EXPIRY_LABELS: [&str; 4] = ["1hour", "1day", "1week", "never"];
const CONFIG_KEYS: [&str; 1] = ["server"];
const CONFIG_DIR_NAME: &str = ".devpaste";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Parser)]
#[command(name = "devpaste", about = "DevPaste CLI", version)]
struct Cli {
    /// Server URL (can also be set via DEVPASTE_API_URL env var)
    #[arg(short, long, env = "DEVPASTE_API_URL")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Create a paste from a file or stdin
    New {
        /// Read content from this file instead of stdin
        #[arg(short, long)]
        file: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Language label; defaults to one derived from the file extension
        #[arg(short, long)]
        language: Option<String>,
        #[arg(short, long, default_value = "1day", value_parser = EXPIRY_LABELS)]
        expire: String,
        /// Keep the paste out of the public listing
        #[arg(long)]
        private: bool,
        #[arg(short, long)]
        password: Option<String>,
        /// Delete the paste after its first successful read
        #[arg(long)]
        burn: bool,
    },
    /// Fetch a paste
    Get {
        id: String,
        #[arg(short, long)]
        password: Option<String>,
        /// Print only the content
        #[arg(long)]
        raw: bool,
        /// Write the content to this file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List recent public pastes
    List {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Delete a paste
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show or change saved CLI settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved settings
    Get,
    /// Save a setting
    Set {
        #[arg(value_parser = CONFIG_KEYS)]
        key: String,
        value: String,
    },
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

fn hint_for_status(status: reqwest::StatusCode) -> Option<&'static str> {
    (status == reqwest::StatusCode::UNAUTHORIZED)
        .then_some("this paste is password protected; pass --password <PASSWORD>")
}

async fn ensure_success_or_exit(res: reqwest::Response, action: &str) -> reqwest::Response {
    let status = res.status();
    if status.is_success() {
        return res;
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_response(status, &body);
    eprintln!("{} failed ({}): {}", action, status, message);
    if let Some(hint) = hint_for_status(status) {
        eprintln!("hint: {}", hint);
    }
    std::process::exit(1);
}

fn exit_on_format_error(action: &str, output: Result<String, String>) -> String {
    match output {
        Ok(output) => output,
        Err(message) => {
            eprintln!("{} failed: {}", action, message);
            std::process::exit(1);
        }
    }
}

fn language_for_new_paste(explicit: Option<String>, file: Option<&str>) -> Option<String> {
    if let Some(language) = explicit {
        let trimmed = language.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    let extension = Path::new(file?).extension()?.to_str()?;
    Some(Language::from_extension(extension).as_str().to_string())
}

struct NewPasteArgs {
    content: String,
    title: Option<String>,
    language: Option<String>,
    expire: String,
    private: bool,
    password: Option<String>,
    burn: bool,
}

fn create_body(args: NewPasteArgs) -> Value {
    let mut body = json!({
        "content": args.content,
        "expiresIn": args.expire,
        "isPrivate": args.private,
        "burnAfterRead": args.burn,
    });
    if let Some(title) = args.title {
        body["title"] = title.into();
    }
    if let Some(language) = args.language {
        body["language"] = language.into();
    }
    if let Some(password) = args.password.filter(|password| !password.is_empty()) {
        body["password"] = password.into();
    }
    body
}

fn encode_json(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn str_field<'a>(paste: &'a Value, field: &str) -> Option<&'a str> {
    paste.get(field).and_then(Value::as_str)
}

fn format_created_output(paste: &Value, server: &str, json: bool) -> Result<String, String> {
    if json {
        return encode_json(paste);
    }

    let id = str_field(paste, "id").ok_or_else(|| "response missing 'id' field".to_string())?;
    let mut lines = vec![format!("Created: {}", id)];
    if let Ok(url) = api_url(server, &["api", "pastes", id]) {
        lines.push(format!("URL:     {}", url));
    }
    match str_field(paste, "expiresAt") {
        Some(expires_at) => lines.push(format!("Expires: {}", expires_at)),
        None => lines.push("Expires: never".to_string()),
    }
    if paste.get("hasPassword").and_then(Value::as_bool) == Some(true) {
        lines.push("Password protected".to_string());
    }
    if paste.get("burnAfterRead").and_then(Value::as_bool) == Some(true) {
        lines.push("Burns after the first read".to_string());
    }
    Ok(lines.join("\n"))
}

fn format_get_output(paste: &Value, json: bool, raw: bool) -> Result<String, String> {
    if json {
        return encode_json(paste);
    }

    let content = paste.get("content").and_then(Value::as_str);
    if raw {
        return disclosed_content(paste).map(str::to_string);
    }

    let id = str_field(paste, "id").ok_or_else(|| "response missing 'id' field".to_string())?;
    let mut lines = vec![format!("ID:       {}", id)];
    if let Some(title) = str_field(paste, "title") {
        lines.push(format!("Title:    {}", title));
    }
    if let Some(language) = str_field(paste, "language") {
        lines.push(format!("Language: {}", language));
    }
    if let Some(views) = paste.get("views").and_then(Value::as_u64) {
        lines.push(format!("Views:    {}", views));
    }
    if let Some(expires_at) = str_field(paste, "expiresAt") {
        lines.push(format!("Expires:  {}", expires_at));
    }
    lines.push(String::new());
    match content {
        Some(content) => lines.push(content.to_string()),
        None => lines.push("(password required; pass --password to unlock)".to_string()),
    }
    Ok(lines.join("\n"))
}

fn disclosed_content(paste: &Value) -> Result<&str, String> {
    str_field(paste, "content").ok_or_else(|| {
        "content withheld; this paste is password protected (pass --password)".to_string()
    })
}

fn save_content(paste: &Value, path: &Path) -> Result<String, String> {
    let content = disclosed_content(paste)?;
    std::fs::write(path, content)
        .map_err(|err| format!("cannot write {}: {}", path.display(), err))?;
    Ok(format!("Saved to {}", path.display()))
}

fn format_summary_output(pastes: &[Value], json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(pastes)
            .map_err(|err| format!("response encoding error: {}", err));
    }

    let mut rows = Vec::with_capacity(pastes.len());
    for (index, p) in pastes.iter().enumerate() {
        let Some(id) = str_field(p, "id") else {
            return Err(format!("response item {} missing 'id' field", index));
        };
        let title = str_field(p, "title").unwrap_or("(untitled)");
        let language = str_field(p, "language").unwrap_or("plaintext");
        let views = p.get("views").and_then(Value::as_u64).unwrap_or(0);
        rows.push(format!("{:<10} {:<30} {:<12} {}", id, title, language, views));
    }

    Ok(rows.join("\n"))
}

fn format_delete_output(id: &str, response: &Value, json: bool) -> Result<String, String> {
    if json {
        return encode_json(response);
    }

    Ok(format!("Deleted paste: {}", id))
}

fn confirmation_accepted(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn confirm_delete(id: &str) -> io::Result<bool> {
    print!("Delete paste {}? [y/N] ", id);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(confirmation_accepted(&answer))
}

fn api_url(server: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(server)
        .map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn api_url_or_exit(server: &str, action: &str, segments: &[&str]) -> reqwest::Url {
    match api_url(server, segments) {
        Ok(url) => url,
        Err(message) => {
            eprintln!("{} failed: {}", action, message);
            std::process::exit(1);
        }
    }
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Pick the server URL: flag or env first, then the saved setting, then the default.
fn resolve_server(server: Option<String>, saved: &Map<String, Value>) -> String {
    server
        .as_deref()
        .and_then(non_blank)
        .or_else(|| saved.get("server").and_then(Value::as_str).and_then(non_blank))
        .unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn cli_config_path() -> Option<PathBuf> {
    resolve_home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read saved settings. A missing or unreadable file yields no settings.
fn load_cli_config(path: &Path) -> Map<String, Value> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<Map<String, Value>>(&raw).ok())
        .unwrap_or_default()
}

fn save_cli_config(path: &Path, key: &str, value: &str) -> Result<(), String> {
    if key == "server" {
        reqwest::Url::parse(value)
            .map_err(|err| format!("Invalid server URL '{}': {}", value, err))?;
    }
    let mut config = load_cli_config(path);
    config.insert(key.to_string(), Value::String(value.to_string()));
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|err| format!("cannot create {}: {}", dir.display(), err))?;
    }
    let encoded = serde_json::to_string_pretty(&config)
        .map_err(|err| format!("config encoding error: {}", err))?;
    std::fs::write(path, encoded).map_err(|err| format!("cannot write {}: {}", path.display(), err))
}

fn format_config_output(config: &Map<String, Value>, json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(config)
            .map_err(|err| format!("config encoding error: {}", err));
    }
    Ok(CONFIG_KEYS
        .iter()
        .map(|key| {
            let value = config.get(*key).and_then(Value::as_str).unwrap_or("(unset)");
            format!("{}: {}", key, value)
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn run_config(action: ConfigAction, json: bool) {
    let Some(path) = cli_config_path() else {
        eprintln!("Config failed: cannot locate a home directory");
        std::process::exit(1);
    };
    match action {
        ConfigAction::Get => {
            let config = load_cli_config(&path);
            println!(
                "{}",
                exit_on_format_error("Config", format_config_output(&config, json))
            );
        }
        ConfigAction::Set { key, value } => {
            if let Err(message) = save_cli_config(&path, &key, value.trim()) {
                eprintln!("Config failed: {}", message);
                std::process::exit(1);
            }
            println!("Updated {} to {}", key, value.trim());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }
    let command = match command {
        Commands::Config { action } => {
            run_config(action, json);
            return Ok(());
        }
        other => other,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout))
        .build()?;
    let saved = cli_config_path()
        .map(|path| load_cli_config(&path))
        .unwrap_or_default();
    let server = normalize_server(resolve_server(server, &saved));

    match command {
        Commands::Completions { .. } | Commands::Config { .. } => {}
        Commands::New {
            file,
            title,
            language,
            expire,
            private,
            password,
            burn,
        } => {
            let endpoint = api_url_or_exit(&server, "New", &["api", "pastes"]);
            let content = if let Some(path) = file.as_deref() {
                std::fs::read_to_string(path)?
            } else {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            };
            if content.trim().is_empty() {
                eprintln!("New failed: content is empty");
                std::process::exit(1);
            }

            let body = create_body(NewPasteArgs {
                content,
                title,
                language: language_for_new_paste(language, file.as_deref()),
                expire,
                private,
                password,
                burn,
            });
            let res = client.post(endpoint).json(&body).send().await?;
            let res = ensure_success_or_exit(res, "New").await;
            let paste: Value = res.json().await?;
            println!(
                "{}",
                exit_on_format_error("New", format_created_output(&paste, &server, json))
            );
        }
        Commands::Get {
            id,
            password,
            raw,
            output,
        } => {
            let endpoint = api_url_or_exit(&server, "Get", &["api", "pastes", id.as_str()]);
            // Passwords travel in the body so they stay out of URLs and header logs.
            let request = match password {
                Some(password) => client
                    .post(endpoint)
                    .json(&json!({ "password": password })),
                None => client.get(endpoint),
            };
            let res = ensure_success_or_exit(request.send().await?, "Get").await;
            let paste: Value = res.json().await?;
            if let Some(output) = output {
                println!(
                    "{}",
                    exit_on_format_error("Get", save_content(&paste, Path::new(&output)))
                );
            } else {
                println!(
                    "{}",
                    exit_on_format_error("Get", format_get_output(&paste, json, raw))
                );
            }
        }
        Commands::List { limit } => {
            let endpoint = api_url_or_exit(&server, "List", &["api", "pastes"]);
            let res = client
                .get(endpoint)
                .query(&[("limit", limit)])
                .send()
                .await?;
            let res = ensure_success_or_exit(res, "List").await;
            let pastes: Vec<Value> = res.json().await?;
            let output = exit_on_format_error("List", format_summary_output(&pastes, json));
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Commands::Delete { id, force } => {
            if !force && !confirm_delete(&id)? {
                println!("Aborted");
                return Ok(());
            }
            let endpoint = api_url_or_exit(&server, "Delete", &["api", "pastes", id.as_str()]);
            let res = client.delete(endpoint).send().await?;
            let res = ensure_success_or_exit(res, "Delete").await;
            let response: Value = res.json().await?;
            println!(
                "{}",
                exit_on_format_error("Delete", format_delete_output(&id, &response, json))
            );
        }
    }

    Ok(())
}
