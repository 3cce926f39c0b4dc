//! Routing argv between built-in commands and external plugins.
//!
//! Built-ins always win. Only argv whose leading command words miss the
//! clap tree at the top level is offered to the plugin resolver.

use std::ffi::OsString;

use cb_plugin::{CommandTree, PluginError, PluginHandler, ResolvedPlugin, handle_plugin_command};
use clap::{Arg, Command};
use tracing::debug;

/// Walk `args` down the command tree, skipping flags and their values.
///
/// Returns the matched command chain (root first). `None` means the first
/// command word is not a top-level subcommand. A miss below the top level
/// stops the walk at the deepest match.
#[must_use]
pub fn find_command_path<'a>(root: &'a Command, args: &[String]) -> Option<Vec<&'a Command>> {
    let mut chain = vec![root];
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }
        if arg.len() > 1 && arg.starts_with('-') {
            if flag_consumes_next(&chain, arg) {
                iter.next();
            }
            continue;
        }

        let current = chain[chain.len() - 1];
        match current.find_subcommand(arg) {
            Some(sub) => chain.push(sub),
            None if chain.len() == 1 && current.has_subcommands() => return None,
            None => break,
        }
    }

    Some(chain)
}

/// Whether a flag token takes its value from the following token.
fn flag_consumes_next(chain: &[&Command], flag: &str) -> bool {
    let matches_flag = |arg: &&Arg| -> bool {
        if let Some(long) = flag.strip_prefix("--") {
            !long.contains('=') && arg.get_long() == Some(long)
        } else {
            let mut chars = flag.chars().skip(1);
            match (chars.next(), chars.next()) {
                (Some(short), None) => arg.get_short() == Some(short),
                _ => false,
            }
        }
    };

    chain
        .iter()
        .rev()
        .flat_map(|cmd| cmd.get_arguments())
        .find(matches_flag)
        .is_some_and(|arg| arg.get_action().takes_values())
}

/// First token that is not a flag.
fn first_word(args: &[String]) -> Option<&str> {
    args.iter().find(|a| !a.starts_with('-')).map(String::as_str)
}

/// Argv as text for matching against command names. Plugins still get
/// the original tokens.
fn lossy_words(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

/// Offer `args` to the plugin handler when they do not name a built-in.
///
/// Returns `Ok(None)` when argv belongs to the built-in tree, asks for
/// help, or matches no plugin. With a replacing executor a successful
/// dispatch does not return.
pub fn dispatch_plugin(
    root: &Command,
    args: &[OsString],
    handler: &dyn PluginHandler,
    environment: &[(OsString, OsString)],
) -> Result<Option<ResolvedPlugin>, PluginError> {
    let words = lossy_words(args);
    if words.is_empty() || find_command_path(root, &words).is_some() {
        return Ok(None);
    }
    if first_word(&words) == Some("help") {
        return Ok(None);
    }

    debug!(args = ?words, "no built-in command matched, trying plugins");
    handle_plugin_command(handler, args, environment)
}

/// The clap tree seen through the plugin verifier's lens.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinCommands<'a>(pub &'a Command);

impl CommandTree for BuiltinCommands<'_> {
    fn find_command(&self, path: &[String]) -> Option<String> {
        let chain = find_command_path(self.0, path)?;
        Some(
            chain
                .iter()
                .map(|cmd| cmd.get_name())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}
