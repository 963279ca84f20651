use askllm_core::Provider;
use clap::Parser;
use std::path::PathBuf;

/// Ask a hosted language model from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The question to send
    #[arg(index = 1)] // Positional argument
    pub prompt: Option<String>,

    /// Enter interactive chat mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API key for the upstream service
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Upstream schema: completions, chat or gemini
    #[arg(short, long)]
    pub provider: Option<Provider>,

    /// Model to use
    #[arg(short = 'o', long)]
    pub model: Option<String>,

    /// Upstream endpoint URL
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_prompt() {
        let args = Args::parse_from(["askllm", "What is Rust?", "-p", "gemini"]);
        assert_eq!(args.prompt.as_deref(), Some("What is Rust?"));
        assert_eq!(args.provider, Some(Provider::Gemini));
        assert!(!args.interactive);
    }

    #[test]
    fn test_reject_unknown_provider() {
        assert!(Args::try_parse_from(["askllm", "-p", "bard", "hi"]).is_err());
    }
}
