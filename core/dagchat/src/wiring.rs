//! 配線: 標準アダプタで ChatUseCase を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdEnvResolver, StdFileSystem};
use common::ports::outbound::{EnvResolver, FileSystem, Log};

use crate::adapter::{
    ConsoleTranscript, DotenvLoader, FilePromptLoader, NonInteractivePromptInput,
    NoopInterruptChecker, SigintChecker, StdProfileLister, StdinPromptInput, VerboseLog,
};
use crate::ports::outbound::{InterruptChecker, PromptInput};
use crate::usecase::{ChatDeps, ChatUseCase, IoDeps, ModelDeps, ObsDeps, SourceDeps};

/// 組み立て済みアプリケーション（main から使う部品一式）
pub struct App {
    pub logger: Arc<dyn Log>,
    pub chat_use_case: ChatUseCase,
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire(non_interactive: bool, verbose: bool) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);

    // ホームが解決できない環境ではログを諦めてコマンド自体は動かす
    let logger: Arc<dyn Log> = match env_resolver.resolve_home_dir() {
        Ok(home) => Arc::new(FileJsonLog::new(
            Arc::clone(&fs),
            home.join("logs").join("dagchat.log"),
        )),
        Err(_) => Arc::new(NoopLog),
    };
    let logger: Arc<dyn Log> = if verbose {
        Arc::new(VerboseLog::new(Arc::clone(&logger)))
    } else {
        logger
    };

    let prompt_input: Arc<dyn PromptInput> = if non_interactive {
        Arc::new(NonInteractivePromptInput::new())
    } else {
        Arc::new(StdinPromptInput::new())
    };
    let interrupt_checker: Arc<dyn InterruptChecker> = match SigintChecker::new() {
        Ok(checker) => Arc::new(checker),
        Err(_) => Arc::new(NoopInterruptChecker::new()),
    };

    let chat_use_case = ChatUseCase::new(ChatDeps {
        io: IoDeps {
            prompt_input,
            transcript: Arc::new(ConsoleTranscript::new()),
            interrupt_checker,
        },
        model: ModelDeps {
            fs: Arc::clone(&fs),
            env_resolver: Arc::clone(&env_resolver),
            profile_lister: Arc::new(StdProfileLister::new(
                Arc::clone(&fs),
                Arc::clone(&env_resolver),
            )),
        },
        source: SourceDeps {
            system_prompt_loader: Arc::new(FilePromptLoader::new(Arc::clone(&fs))),
            env_file_loader: Arc::new(DotenvLoader::new(Arc::clone(&fs))),
        },
        obs: ObsDeps {
            log: Arc::clone(&logger),
        },
    });

    App {
        logger,
        chat_use_case,
    }
}
