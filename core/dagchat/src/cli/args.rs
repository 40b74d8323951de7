use crate::domain::{ChatCommand, Question};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ModelName, ProviderName};
use common::error::Error;
use std::path::PathBuf;

/// DAG 定義ファイルのデフォルトパス
pub const DEFAULT_DAG_FILE: &str = "SQL_query.txt";
/// 認証情報ファイルのデフォルトパス
pub const DEFAULT_ENV_FILE: &str = "credentials.env";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -L / --list-profiles: 現在有効なプロファイル一覧を表示
    pub list_profiles: bool,
    /// --no-interactive: 対話プロンプトを出さない（CI 等。REPL は即 EOF 扱い）
    pub non_interactive: bool,
    /// -v / --verbose: 不具合調査用の冗長ログを stderr に出力する
    pub verbose: bool,
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    /// -S / --system: 組み立てたプロンプトの代わりに使うシステム指示
    pub system: Option<String>,
    /// -f / --file: DAG 定義ファイルのパス
    pub file: PathBuf,
    /// --env-file: 認証情報ファイルのパス（存在する場合のみ読み込む）
    pub env_file: PathBuf,
    pub message_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help: false,
            list_profiles: false,
            non_interactive: false,
            verbose: false,
            profile: None,
            model: None,
            system: None,
            file: PathBuf::from(DEFAULT_DAG_FILE),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            message_args: Vec::new(),
        }
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("dagchat")
        .about("Chat about a SQL-DAG definition file with an LLM")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-profiles")
                .short('L')
                .long("list-profiles")
                .help("List currently available provider profiles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("no-interactive")
                .long("no-interactive")
                .help("Do not prompt for input (CI-friendly: the chat loop exits immediately)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit verbose debug logs to stderr (for troubleshooting)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("profile")
                .help("Specify LLM profile (gemini, gpt, echo, etc.)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Specify model name (e.g. gemini-2.0, gpt-4)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("system")
                .short('S')
                .long("system")
                .value_name("instruction")
                .help("Use this system instruction instead of the one built from the DAG file")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("file")
                .short('f')
                .long("file")
                .value_name("path")
                .help("Path to the SQL-DAG definition file")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("env-file")
                .long("env-file")
                .value_name("path")
                .help("Path to the credentials env file (loaded only if present)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("positional")
                .index(1)
                .help("Question words (one-shot). With no words, an interactive chat starts")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let help = matches.get_flag("help");
    let list_profiles = matches.get_flag("list-profiles");
    let non_interactive = matches.get_flag("no-interactive");
    let verbose = matches.get_flag("verbose");
    let profile = matches
        .get_one::<String>("profile")
        .map(|s| ProviderName::new(s.clone()));
    let model = matches
        .get_one::<String>("model")
        .map(|s| ModelName::new(s.clone()));
    let system = matches.get_one::<String>("system").cloned();
    let file = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DAG_FILE));
    let env_file = matches
        .get_one::<String>("env-file")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    let message_args: Vec<String> = matches
        .get_many::<String>("positional")
        .map(|i| i.cloned().collect())
        .unwrap_or_default();

    Config {
        help,
        list_profiles,
        non_interactive,
        verbose,
        profile,
        model,
        system,
        file,
        env_file,
        message_args,
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    emit_fallback_completion(shell);
}

fn emit_fallback_completion(shell: Shell) {
    let opts = "-h --help -L --list-profiles --no-interactive -v --verbose -p --profile -m --model -S --system -f --file --env-file --generate";
    match shell {
        Shell::Bash => {
            println!(
                r#"# Fallback completion for dagchat
_dagchat() {{
  local cur="${{COMP_WORDS[COMP_CWORD]}}"
  COMPREPLY=($(compgen -W "{opts}" -- "$cur"))
}}
complete -F _dagchat dagchat
"#,
                opts = opts
            );
        }
        Shell::Zsh => {
            println!(
                r#"# Fallback completion for dagchat
#compdef dagchat
local -a reply
reply=({opts})
_describe 'dagchat' reply
"#,
                opts = opts
            );
        }
        Shell::Fish => {
            println!(
                r#"# Fallback completion for dagchat
complete -c dagchat -l help -s h -d "Show help"
complete -c dagchat -l list-profiles -s L -d "List profiles"
complete -c dagchat -l no-interactive -d "Do not prompt (CI-friendly)"
complete -c dagchat -l verbose -s v -d "Verbose logs"
complete -c dagchat -l profile -s p -d "LLM profile" -r
complete -c dagchat -l model -s m -d "Model name" -r
complete -c dagchat -l system -s S -d "System instruction" -r
complete -c dagchat -l file -s f -d "SQL-DAG definition file" -r
complete -c dagchat -l env-file -d "Credentials env file" -r
complete -c dagchat -l generate -d "Generate completion script" -r -a "bash zsh fish"
"#
            );
        }
        _ => {}
    }
}

/// Config を ChatCommand に変換する
pub fn config_to_command(config: Config) -> ChatCommand {
    if config.help {
        return ChatCommand::Help;
    }

    if config.list_profiles {
        return ChatCommand::ListProfiles;
    }

    if config.message_args.is_empty() {
        return ChatCommand::Chat {
            profile: config.profile,
            model: config.model,
            system: config.system,
            file: config.file,
            env_file: config.env_file,
        };
    }

    let question = Question::new(config.message_args.join(" "));
    ChatCommand::Ask {
        profile: config.profile,
        model: config.model,
        system: config.system,
        file: config.file,
        env_file: config.env_file,
        question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.help);
        assert!(!config.list_profiles);
        assert!(!config.non_interactive);
        assert!(!config.verbose);
        assert!(config.profile.is_none());
        assert!(config.model.is_none());
        assert!(config.system.is_none());
        assert_eq!(config.file, PathBuf::from("SQL_query.txt"));
        assert_eq!(config.env_file, PathBuf::from("credentials.env"));
        assert_eq!(config.message_args.len(), 0);
    }

    #[test]
    fn test_parse_args_no_args() {
        let args = vec!["dagchat".to_string()];
        let config = parse_args_from(&args).unwrap();
        assert!(!config.help);
        assert_eq!(config.message_args.len(), 0);
        assert_eq!(config.file, PathBuf::from("SQL_query.txt"));
    }

    #[test]
    fn test_parse_args_help_short() {
        let args = vec!["dagchat".to_string(), "-h".to_string()];
        let config = parse_args_from(&args).unwrap();
        assert!(config.help);
    }

    #[test]
    fn test_parse_args_help_long() {
        let args = vec!["dagchat".to_string(), "--help".to_string()];
        let config = parse_args_from(&args).unwrap();
        assert!(config.help);
    }

    #[test]
    fn test_parse_args_unknown_option() {
        let args = vec!["dagchat".to_string(), "--unknown".to_string()];
        let result = parse_args_from(&args);
        assert!(result.is_err(), "unknown long option must be rejected");
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 64);
    }

    #[test]
    fn test_parse_args_unknown_option_short() {
        let args = vec!["dagchat".to_string(), "-x".to_string()];
        let result = parse_args_from(&args);
        assert!(result.is_err(), "unknown short option -x must be rejected");
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 64);
    }

    #[test]
    fn test_parse_args_message_words() {
        let args = vec![
            "dagchat".to_string(),
            "What".to_string(),
            "does".to_string(),
            "TASK 0 do?".to_string(),
        ];
        let config = parse_args_from(&args).unwrap();
        assert_eq!(config.message_args.len(), 3);
        assert_eq!(config.message_args[0], "What");
        assert_eq!(config.message_args[2], "TASK 0 do?");
    }

    #[test]
    fn test_parse_args_profile() {
        let args = vec!["dagchat".to_string(), "-p".to_string(), "gemini".to_string()];
        let config = parse_args_from(&args).unwrap();
        assert_eq!(config.profile.as_ref().map(|p| p.as_ref()), Some("gemini"));
    }

    #[test]
    fn test_parse_args_profile_long() {
        let args = vec![
            "dagchat".to_string(),
            "--profile".to_string(),
            "gpt".to_string(),
        ];
        let config = parse_args_from(&args).unwrap();
        assert_eq!(config.profile.as_ref().map(|p| p.as_ref()), Some("gpt"));
    }

    #[test]
    fn test_parse_args_profile_requires_arg() {
        let args = vec!["dagchat".to_string(), "-p".to_string()];
        let result = parse_args_from(&args);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("argument") || err.to_string().contains("required"));
        assert_eq!(err.exit_code(), 64);
    }

    #[test]
    fn test_parse_args_model_short() {
        let args = vec![
            "dagchat".to_string(),
            "-m".to_string(),
            "gemini-2.0".to_string(),
        ];
        let config = parse_args_from(&args).unwrap();
        assert_eq!(config.model.as_ref().map(|m| m.as_ref()), Some("gemini-2.0"));
    }

    #[test]
    fn test_parse_args_system() {
        let args = vec![
            "dagchat".to_string(),
            "-S".to_string(),
            "You are terse.".to_string(),
            "Hello".to_string(),
        ];
        let config = parse_args_from(&args).unwrap();
        assert_eq!(config.system.as_deref(), Some("You are terse."));
        assert_eq!(config.message_args, vec!["Hello".to_string()]);
    }

    #[test]
    fn test_parse_args_file_short() {
        let args = vec![
            "dagchat".to_string(),
            "-f".to_string(),
            "dag/pipeline.txt".to_string(),
        ];
        let config = parse_args_from(&args).unwrap();
        assert_eq!(config.file, PathBuf::from("dag/pipeline.txt"));
    }

    #[test]
    fn test_parse_args_env_file() {
        let args = vec![
            "dagchat".to_string(),
            "--env-file".to_string(),
            "secrets/prod.env".to_string(),
        ];
        let config = parse_args_from(&args).unwrap();
        assert_eq!(config.env_file, PathBuf::from("secrets/prod.env"));
    }

    #[test]
    fn test_parse_args_list_profiles_short() {
        let args = vec!["dagchat".to_string(), "-L".to_string()];
        let config = parse_args_from(&args).unwrap();
        assert!(config.list_profiles);
    }

    #[test]
    fn test_parse_args_no_interactive() {
        let args = vec!["dagchat".to_string(), "--no-interactive".to_string()];
        let config = parse_args_from(&args).unwrap();
        assert!(config.non_interactive);
    }

    #[test]
    fn test_parse_args_verbose_short() {
        let args = vec!["dagchat".to_string(), "-v".to_string()];
        let config = parse_args_from(&args).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_config_to_command_help_takes_precedence() {
        let config = Config {
            help: true,
            list_profiles: true,
            message_args: vec!["hello".to_string()],
            ..Default::default()
        };
        let cmd = config_to_command(config);
        assert!(matches!(cmd, ChatCommand::Help));
    }

    #[test]
    fn test_config_to_command_list_profiles() {
        let config = Config {
            list_profiles: true,
            ..Default::default()
        };
        let cmd = config_to_command(config);
        assert!(matches!(cmd, ChatCommand::ListProfiles));
    }

    #[test]
    fn test_config_to_command_no_words_is_chat() {
        let config = Config::default();
        let cmd = config_to_command(config);
        assert!(matches!(cmd, ChatCommand::Chat { .. }));
    }

    #[test]
    fn test_config_to_command_words_join_into_question() {
        let config = Config {
            message_args: vec!["What".to_string(), "is".to_string(), "TASK 1?".to_string()],
            ..Default::default()
        };
        let cmd = config_to_command(config);
        match cmd {
            ChatCommand::Ask { question, .. } => {
                assert_eq!(question.as_ref(), "What is TASK 1?");
            }
            other => panic!("expected Ask, got {:?}", other),
        }
    }

    #[test]
    fn test_config_to_command_carries_file_and_env_file() {
        let config = Config {
            file: PathBuf::from("dag/pipeline.txt"),
            env_file: PathBuf::from("secrets/prod.env"),
            ..Default::default()
        };
        let cmd = config_to_command(config);
        match cmd {
            ChatCommand::Chat { file, env_file, .. } => {
                assert_eq!(file, PathBuf::from("dag/pipeline.txt"));
                assert_eq!(env_file, PathBuf::from("secrets/prod.env"));
            }
            other => panic!("expected Chat, got {:?}", other),
        }
    }
}
