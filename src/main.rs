use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, shells};
use firmroast::commands::VERSION;
use firmroast::commands::analyze::{self, AnalyzeArgs};
use firmroast::commands::config::{self, ConfigArgs};
use firmroast::commands::consult::{self, ConsultArgs};
use firmroast::commands::credential::{self, CredentialArgs};
use firmroast::commands::questions;

const ROOT_HELP_EXAMPLES: &str = "Examples:\n  firmroast analyze \"Kofola\" --save roast.txt\n  firmroast consult --company \"Kofola\" --role manager --interactive --analysis roast.txt\n  echo \"$OPENAI_API_KEY\" | firmroast credential set\n  firmroast completion bash > ~/.local/share/bash-completion/completions/firmroast";

const ANALYZE_HELP_EXAMPLES: &str = "Examples:\n  firmroast analyze \"Kofola\"\n  firmroast analyze \"Kofola\" --json --save roast.json\n  firmroast analyze \"Kofola\" --dry-run --no-web-search";

const CONSULT_HELP_EXAMPLES: &str = "Examples:\n  firmroast consult --company \"Kofola\" --role employee --answers answers.json --analysis roast.txt\n  firmroast consult --company \"Kofola\" --role manager --interactive --allow-partial\n\nAnswers file: {\"1\": \"Souhlasím\", \"2\": 3, ...} (run `firmroast questions` for the list)";

#[derive(Debug, Parser)]
#[command(
    name = "firmroast",
    about = "Satirical company roasts and personal consultations from the OpenAI API",
    version = VERSION,
    propagate_version = true,
    after_help = ROOT_HELP_EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Roast a company", after_help = ANALYZE_HELP_EXAMPLES)]
    Analyze(AnalyzeArgs),
    #[command(about = "Write a consultation letter from questionnaire answers", after_help = CONSULT_HELP_EXAMPLES)]
    Consult(ConsultArgs),
    #[command(about = "List the questionnaire")]
    Questions,
    #[command(about = "Manage the stored OpenAI credential")]
    Credential(CredentialArgs),
    #[command(about = "Manage local config")]
    Config(ConfigArgs),
    #[command(about = "Generate shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

fn print_completion(shell: CompletionShell) {
    let mut cmd = Cli::command();
    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, "firmroast", &mut io::stdout()),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, "firmroast", &mut io::stdout()),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, "firmroast", &mut io::stdout()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze(args) => analyze::run(args).await,
        Commands::Consult(args) => consult::run(args).await,
        Commands::Questions => questions::run(),
        Commands::Credential(args) => credential::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
