use colored::*;
use std::io::{self, Write};

/// Write an answer with a colored prefix
pub fn write_answer<W: Write>(out: &mut W, answer: &str) -> io::Result<()> {
    writeln!(out, "{}: {}", "Assistant".blue().bold(), answer)
}

/// Write a user-safe failure message
pub fn write_failure<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "Error:".red().bold(), message)
}

/// Show usage instructions when no prompt or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "askllm \"your question\"".green().bold());
    println!("    Send a single question to the model");
    println!();
    println!("  {}", "askllm -i".green().bold());
    println!("    Start an interactive session");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --config <PATH>      Read settings from a TOML file");
    println!("  --provider <NAME>    completions, chat or gemini");
    println!("  --help               Show this help message");
    println!();
}
