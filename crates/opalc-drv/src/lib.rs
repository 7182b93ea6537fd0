//! opalc-drv - Compiler driver.
//!
//! The driver is the entry point and orchestrator for the pipeline:
//!
//! ```text
//! Source file (.opal)
//!        |
//!   [Lexer]  -> token stream (dumped to stdout)
//!        |
//!   [Parser] -> AST (dumped to stdout)
//!        |
//!   [CodeGen] -> LLVM module
//!        |
//!   ../ir_output.ll
//! ```
//!
//! Informational progress goes to standard output, diagnostics to standard
//! error. Exit codes: 0 on success, -1 when the entry file argument is
//! missing, non-zero on any unrecoverable parse or codegen error.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context as _;
use inkwell::context::Context;
use opalc_gen::CodeGen;
use opalc_par::Parser;
use opalc_util::Handler;

/// Compiler configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entry source file.
    pub input: PathBuf,

    /// Where the textual IR is written. Fixed relative path, overwritten
    /// on each run.
    pub output: PathBuf,
}

impl Config {
    /// Builds the configuration from raw process arguments.
    ///
    /// Usage is `opalc <entry-file>`: exactly one positional argument.
    /// Returns `None` when the argument is missing.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Option<Config> {
        let _program = args.next();
        let input = args.next()?;
        Some(Config {
            input: PathBuf::from(input),
            output: PathBuf::from("../ir_output.ll"),
        })
    }
}

/// Runs the compiler with arguments from the environment.
///
/// Returns the process exit code; hard failures surface as errors.
pub fn run() -> anyhow::Result<i32> {
    let Some(config) = Config::from_args(std::env::args()) else {
        eprintln!("you have to pass in an entry point for compilation");
        return Ok(-1);
    };
    compile(&config)?;
    Ok(0)
}

/// Runs the full pipeline for one configuration.
pub fn compile(config: &Config) -> anyhow::Result<()> {
    let start = Instant::now();

    println!("Starting compilation of {}", config.input.display());

    let source = std::fs::read_to_string(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;

    let handler = Handler::new();

    let tokens = opalc_lex::tokenize(&source, &handler);
    for token in &tokens {
        println!(
            "\"{}\":{} {}:{}",
            token.lexeme,
            token.kind.name(),
            token.span.start,
            token.span.end
        );
    }

    let ast = Parser::new(tokens, &handler).parse()?;
    print!("{}", opalc_par::render(&ast));

    for diagnostic in handler.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    let context = Context::create();
    let module_name = config
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module");
    let mut gen = CodeGen::new(&context, module_name);
    gen.compile(&ast)?;

    // The sink is opened only now, after the module is fully built.
    gen.write_ir_to_file(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    println!(
        "Compile time:: {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_config_from_args() {
        let config = Config::from_args(args(&["opalc", "main.opal"])).unwrap();
        assert_eq!(config.input, PathBuf::from("main.opal"));
        assert_eq!(config.output, PathBuf::from("../ir_output.ll"));
    }

    #[test]
    fn test_config_requires_entry_file() {
        assert!(Config::from_args(args(&["opalc"])).is_none());
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let config = Config::from_args(args(&["opalc", "a.opal", "b.opal"])).unwrap();
        assert_eq!(config.input, PathBuf::from("a.opal"));
    }
}
