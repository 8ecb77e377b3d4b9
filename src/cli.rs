//! Argument resolution for the `dev` orchestrator.
//!
//! Unknown tokens are ignored rather than rejected, so this is a plain
//! token scan instead of a `clap` parser.

use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Token that restricts the run to the host application.
pub const MAIN_ONLY_FLAG: &str = "--main-only";

/// Options for one orchestrator invocation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DevOptions {
    /// Modules whose watch-builders were selected.
    pub selected_modules: BTreeSet<String>,
    /// Start only the host application.
    pub main_only: bool,
}

impl DevOptions {
    /// Modules to start, in registration order.
    ///
    /// `--main-only` wins over explicit module tokens: when set, no watcher
    /// is started even if modules were named.
    #[must_use]
    pub fn modules_to_start<'a>(&self, registration_order: &[&'a str]) -> Vec<&'a str> {
        if self.main_only {
            return Vec::new();
        }
        registration_order
            .iter()
            .copied()
            .filter(|name| self.selected_modules.contains(*name))
            .collect()
    }
}

/// Result of scanning the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsOutcome {
    /// Usage was requested; the caller prints it and exits with code 0.
    Help,
    /// Proceed with these options.
    Run(DevOptions),
}

fn is_help(token: &str) -> bool {
    token == "--help" || token == "-h"
}

/// Whether any token asks for usage.
///
/// Checked before configuration is loaded, so help works in a workspace
/// whose config is broken.
pub fn wants_help<I, S>(tokens: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens.into_iter().any(|token| is_help(token.as_ref()))
}

/// Resolve command-line tokens against the known module names.
///
/// A help token short-circuits the scan. When neither a module nor
/// `--main-only` was given, every known module is selected.
pub fn resolve_args<I, S>(tokens: I, known_modules: &[&str]) -> ArgsOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = DevOptions::default();

    for token in tokens {
        let token = token.as_ref();
        if is_help(token) {
            return ArgsOutcome::Help;
        } else if token == MAIN_ONLY_FLAG {
            options.main_only = true;
        } else if known_modules.contains(&token) {
            options.selected_modules.insert(token.to_owned());
        }
    }

    if options.selected_modules.is_empty() && !options.main_only {
        options.selected_modules = known_modules.iter().map(|&m| m.to_owned()).collect();
    }

    ArgsOutcome::Run(options)
}

/// Usage text listing the known modules.
#[must_use]
pub fn usage(known_modules: &[&str]) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "📖 Development server");
    let _ = writeln!(text);
    let _ = writeln!(text, "Usage:");
    let _ = writeln!(text, "  dev [options] [module...]");
    let _ = writeln!(text);
    let _ = writeln!(text, "Options:");
    let _ = writeln!(text, "  --main-only     start only the host application dev server");
    let _ = writeln!(text, "  --help, -h      show this help");
    let _ = writeln!(text);
    let _ = writeln!(text, "Modules:");
    for module in known_modules {
        let _ = writeln!(text, "  {module:<15} start the {module} watch build");
    }
    let _ = writeln!(text);
    let _ = writeln!(text, "Examples:");
    let _ = writeln!(text, "  dev                   # host application and every module");
    let _ = writeln!(text, "  dev --main-only       # host application only");
    if let Some(first) = known_modules.first() {
        let _ = writeln!(text, "  dev {first:<17} # host application and {first}");
    }
    text
}
