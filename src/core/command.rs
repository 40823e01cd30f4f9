//! # Command Dispatch
//!
//! The seam between the console and the domain interpreter. The console
//! handles `exit`, `clear` and `help` itself; everything else crosses the
//! [`CommandProcessor`] boundary and comes back as a display message.

use log::debug;

/// Usage text for the built-in `help` command.
pub const HELP_TEXT: &str = "Commands: exit, clear, help. Scroll: PgUp/PgDn";

/// The external command interpreter. Invoked once per submitted line that
/// is not a built-in; whatever it returns is appended to the scrollback.
pub trait CommandProcessor {
    fn execute(&mut self, command: &str) -> String;
}

/// What the render loop should do with a submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Stop the render loop (`exit`).
    Stop,
    /// Empty the scrollback (`clear`).
    Clear,
    /// Append a message to the scrollback.
    Reply(String),
}

/// Route a submitted line: built-ins are handled locally, the rest goes to
/// the processor. An unrecognized command is not an error — the processor's
/// reply is displayed and the loop continues.
pub fn dispatch(command: &str, processor: &mut dyn CommandProcessor) -> Directive {
    match command {
        "exit" => Directive::Stop,
        "clear" => Directive::Clear,
        "help" => Directive::Reply(HELP_TEXT.to_string()),
        other => {
            debug!("delegating command to processor: {other:?}");
            Directive::Reply(processor.execute(other))
        }
    }
}

/// Placeholder interpreter used when the console runs standalone: answers
/// every delegated line with an unknown-command message.
pub struct NullProcessor;

impl CommandProcessor for NullProcessor {
    fn execute(&mut self, command: &str) -> String {
        format!("Unknown: '{command}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what it was asked to execute.
    struct RecordingProcessor {
        seen: Vec<String>,
    }

    impl CommandProcessor for RecordingProcessor {
        fn execute(&mut self, command: &str) -> String {
            self.seen.push(command.to_string());
            format!("echo {command}")
        }
    }

    #[test]
    fn test_builtins_short_circuit() {
        let mut proc = RecordingProcessor { seen: Vec::new() };
        assert_eq!(dispatch("exit", &mut proc), Directive::Stop);
        assert_eq!(dispatch("clear", &mut proc), Directive::Clear);
        assert_eq!(
            dispatch("help", &mut proc),
            Directive::Reply(HELP_TEXT.to_string())
        );
        assert!(proc.seen.is_empty(), "built-ins must not reach the processor");
    }

    #[test]
    fn test_other_commands_are_delegated() {
        let mut proc = RecordingProcessor { seen: Vec::new() };
        let directive = dispatch("look north", &mut proc);
        assert_eq!(directive, Directive::Reply("echo look north".to_string()));
        assert_eq!(proc.seen, vec!["look north"]);
    }

    #[test]
    fn test_null_processor_reports_unknown() {
        let mut proc = NullProcessor;
        assert_eq!(
            dispatch("frobnicate", &mut proc),
            Directive::Reply("Unknown: 'frobnicate'".to_string())
        );
    }
}
