mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{now_iso8601, LogLevel, LogRecord};
use domain::ChatCommand;
use ports::inbound::UseCaseRunner;
use std::process;
use wiring::{wire, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config);
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command started".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                Some(m)
            },
        });

        let result = match cmd {
            ChatCommand::Help => {
                print_help();
                Ok(0)
            }
            ChatCommand::ListProfiles => {
                let (names, default) = self.app.chat_use_case.list_profiles()?;
                for name in &names {
                    if default.as_deref() == Some(name.as_str()) {
                        println!("{} (default)", name);
                    } else {
                        println!("{}", name);
                    }
                }
                Ok(0)
            }
            ChatCommand::Ask {
                profile,
                model,
                system,
                file,
                env_file,
                question,
            } => self
                .app
                .chat_use_case
                .ask(profile, model, system, &file, &env_file, &question),
            ChatCommand::Chat {
                profile,
                model,
                system,
                file,
                env_file,
            } => self
                .app
                .chat_use_case
                .chat(profile, model, system, &file, &env_file),
        };
        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command finished".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                m.insert("exit_code".to_string(), serde_json::json!(code));
                Some(m)
            },
        });
        if let Err(ref e) = result {
            let _ = self.app.logger.log(&LogRecord {
                ts: now_iso8601(),
                level: LogLevel::Error,
                message: e.to_string(),
                layer: Some("cli".to_string()),
                kind: Some("error".to_string()),
                fields: None,
            });
        }
        result
    }
}

fn cmd_name_for_log(cmd: &ChatCommand) -> &'static str {
    match cmd {
        ChatCommand::Help => "help",
        ChatCommand::ListProfiles => "list-profiles",
        ChatCommand::Ask { .. } => "ask",
        ChatCommand::Chat { .. } => "chat",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("dagchat: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let outcome = parse_args()?;
    let config = match &outcome {
        ParseOutcome::Config(c) => c.clone(),
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(*shell);
            return Ok(0);
        }
    };
    let app = wire(config.non_interactive, config.verbose);
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: dagchat [options] [question...]");
}

fn print_help() {
    println!("Usage: dagchat [options] [question...]");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -L, --list-profiles           List currently available provider profiles (from profiles.json + built-ins)");
    println!("  -p, --profile <profile>       Specify LLM profile (gemini, gpt, echo, etc.). Default: profiles.json default, or gemini if not set.");
    println!("  -m, --model <model>           Specify model name (e.g. gemini-2.0, gpt-4). Default: profile default from profiles.json");
    println!("  -S, --system <instruction>    Use this system instruction instead of the one built from the DAG file");
    println!("  -f, --file <path>             Path to the SQL-DAG definition file. Default: SQL_query.txt");
    println!("  --env-file <path>             Path to the credentials env file, loaded only if present. Default: credentials.env");
    println!("  --no-interactive              Do not prompt for input (CI-friendly: the chat loop exits immediately)");
    println!("  -v, --verbose                 Emit verbose debug logs to stderr (for troubleshooting)");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish). Source the output to enable tab completion.");
    println!();
    println!("Environment:");
    println!("  DAGCHAT_HOME    Home directory. Profiles: $DAGCHAT_HOME/profiles.json; logs: $DAGCHAT_HOME/logs/dagchat.log");
    println!("                  If unset, $XDG_CONFIG_HOME/dagchat (e.g. ~/.config/dagchat) is used.");
    println!("  GEMINI_API_KEY  API key for the gemini profile. OpenAI-compatible profiles read the variable named by api_key_env.");
    println!();
    println!("Description:");
    println!("  Ask natural-language questions about a SQL-DAG definition file.");
    println!("  With question words, sends a single question and prints the streamed reply.");
    println!("  Without arguments, starts an interactive chat. The conversation is kept in");
    println!("  memory for the session only; /history shows it, /quit or /exit ends it.");
    println!();
    println!("Examples:");
    println!("  dagchat What does TASK 0 of STAGE 1 write?");
    println!("  dagchat -p gpt -f pipeline.txt Which tables does the final stage read?");
    println!("  dagchat -p echo");
}
