//! Entry point: `parse(line, settings) -> CommandOutcome` (spec §4.3).

use mqtt_inspect_types::{AuthMode, ExportFormat, Settings};

use crate::connect::resolve_connect;
use crate::error::CommandError;
use crate::outcome::{CommandOutcome, ExportScope, ParsedCommand, ViewMode};
use crate::tokenizer::tokenize;
use crate::topic_pattern::is_valid_delete_pattern;

/// Parse one REPL input line against an immutable settings snapshot into a
/// typed outcome. Never mutates `settings` — zero-argument command forms
/// read their defaults from it (spec §4.3's "why a settings snapshot is
/// passed").
#[must_use]
pub fn parse(line: &str, settings: &Settings) -> CommandOutcome {
    if let Some(rest) = line.strip_prefix(':') {
        return parse_command(rest, settings);
    }
    if let Some(rest) = line.strip_prefix('/') {
        return if rest.is_empty() {
            CommandOutcome::failure(CommandError::EmptyTopicSearch)
        } else {
            CommandOutcome::TopicSearch(rest.to_string())
        };
    }
    CommandOutcome::SearchTerm(line.trim().to_string())
}

fn parse_command(rest: &str, settings: &Settings) -> CommandOutcome {
    let tokens = tokenize(rest);
    let Some((name, args)) = tokens.split_first() else {
        return CommandOutcome::failure(CommandError::EmptyCommand);
    };
    let name = name.to_ascii_lowercase();

    match name.as_str() {
        "connect" => match resolve_connect(args, settings) {
            Ok(request) => CommandOutcome::Command(ParsedCommand::Connect(request)),
            Err(reason) => CommandOutcome::failure(reason),
        },
        "disconnect" => exact_zero(args, ParsedCommand::Disconnect, "disconnect"),
        "export" => parse_export(args, settings),
        "filter" => parse_filter(args),
        "clear" => exact_zero(args, ParsedCommand::Clear, "clear"),
        "help" => parse_help(args),
        "pause" => exact_zero(args, ParsedCommand::Pause, "pause"),
        "resume" => exact_zero(args, ParsedCommand::Resume, "resume"),
        "copy" => exact_zero(args, ParsedCommand::Copy, "copy"),
        "expand" => exact_zero(args, ParsedCommand::Expand, "expand"),
        "collapse" => exact_zero(args, ParsedCommand::Collapse, "collapse"),
        "settings" => exact_zero(args, ParsedCommand::Settings, "settings"),
        "search" => parse_search(args),
        "view" => parse_view(args),
        "setuser" => parse_set_string(args, "setuser", |value| ParsedCommand::SetUser { value }),
        "setpass" => parse_set_string(args, "setpass", |value| ParsedCommand::SetPass { value }),
        "setauthmode" => parse_set_auth_mode(args),
        "setauthmethod" => parse_set_string(args, "setauthmethod", |value| ParsedCommand::SetAuthMethod { value }),
        "setauthdata" => parse_set_string(args, "setauthdata", |value| ParsedCommand::SetAuthData { value }),
        "setusetls" => parse_set_use_tls(args),
        "deletetopic" => parse_delete_topic(args),
        other => CommandOutcome::failure(CommandError::UnknownCommand(other.to_string())),
    }
}

fn exact_zero(args: &[String], command: ParsedCommand, name: &'static str) -> CommandOutcome {
    if args.is_empty() {
        CommandOutcome::Command(command)
    } else {
        CommandOutcome::failure(CommandError::UnexpectedArguments { command: name })
    }
}

fn parse_export(args: &[String], settings: &Settings) -> CommandOutcome {
    let scope_and_rest: (ExportScope, &[String]) = match args.first() {
        Some(first) if first.eq_ignore_ascii_case("all") => (ExportScope::All, &args[1..]),
        _ => (ExportScope::Selected, args),
    };
    let (scope, rest) = scope_and_rest;

    match rest {
        [] => CommandOutcome::Command(ParsedCommand::Export {
            scope,
            format: settings.export_format,
            path: settings.export_path.clone(),
        }),
        [format, path] => match ExportFormat::parse(format) {
            Some(format) => CommandOutcome::Command(ParsedCommand::Export {
                scope,
                format,
                path: path.clone(),
            }),
            None => CommandOutcome::failure(CommandError::InvalidArguments {
                command: "export",
                detail: "format must be json or txt",
            }),
        },
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "export",
            detail: "expected no arguments, or <format> <path>",
        }),
    }
}

fn parse_filter(args: &[String]) -> CommandOutcome {
    match args {
        [] => CommandOutcome::Command(ParsedCommand::Filter { pattern: None }),
        [pattern] => CommandOutcome::Command(ParsedCommand::Filter {
            pattern: Some(pattern.clone()),
        }),
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "filter",
            detail: "expected zero or one argument",
        }),
    }
}

fn parse_help(args: &[String]) -> CommandOutcome {
    match args {
        [] => CommandOutcome::Command(ParsedCommand::Help { topic: None }),
        [topic] => CommandOutcome::Command(ParsedCommand::Help {
            topic: Some(topic.clone()),
        }),
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "help",
            detail: "expected zero or one argument",
        }),
    }
}

fn parse_search(args: &[String]) -> CommandOutcome {
    match args {
        [] => CommandOutcome::Command(ParsedCommand::Search { term: None }),
        [term] => CommandOutcome::Command(ParsedCommand::Search {
            term: Some(term.clone()),
        }),
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "search",
            detail: "expected zero or one argument",
        }),
    }
}

fn parse_view(args: &[String]) -> CommandOutcome {
    match args {
        [mode] => match ViewMode::parse(mode) {
            Some(mode) => CommandOutcome::Command(ParsedCommand::View { mode }),
            None => CommandOutcome::failure(CommandError::InvalidArguments {
                command: "view",
                detail: "expected raw, json, image, video, or hex",
            }),
        },
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "view",
            detail: "expected exactly one argument",
        }),
    }
}

fn parse_set_string(args: &[String], name: &'static str, build: impl FnOnce(String) -> ParsedCommand) -> CommandOutcome {
    match args {
        [value] => CommandOutcome::Command(build(value.clone())),
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: name,
            detail: "expected exactly one argument",
        }),
    }
}

fn parse_set_auth_mode(args: &[String]) -> CommandOutcome {
    match args {
        [value] => match AuthMode::parse(value) {
            Some(mode) => CommandOutcome::Command(ParsedCommand::SetAuthMode { mode }),
            None => CommandOutcome::failure(CommandError::InvalidArguments {
                command: "setauthmode",
                detail: "expected anonymous, userpass, or enhanced",
            }),
        },
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "setauthmode",
            detail: "expected exactly one argument",
        }),
    }
}

fn parse_set_use_tls(args: &[String]) -> CommandOutcome {
    match args {
        [value] => match value.to_ascii_lowercase().as_str() {
            "true" => CommandOutcome::Command(ParsedCommand::SetUseTls { value: true }),
            "false" => CommandOutcome::Command(ParsedCommand::SetUseTls { value: false }),
            _ => CommandOutcome::failure(CommandError::InvalidArguments {
                command: "setusetls",
                detail: "expected true or false",
            }),
        },
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "setusetls",
            detail: "expected exactly one argument",
        }),
    }
}

fn parse_delete_topic(args: &[String]) -> CommandOutcome {
    match args {
        [pattern] => {
            if is_valid_delete_pattern(pattern) {
                CommandOutcome::Command(ParsedCommand::DeleteTopic {
                    pattern: pattern.clone(),
                    confirmed: false,
                })
            } else {
                CommandOutcome::failure(CommandError::InvalidArguments {
                    command: "deletetopic",
                    detail: "malformed topic pattern",
                })
            }
        }
        [pattern, flag] => {
            if !is_valid_delete_pattern(pattern) {
                CommandOutcome::failure(CommandError::InvalidArguments {
                    command: "deletetopic",
                    detail: "malformed topic pattern",
                })
            } else if flag.eq_ignore_ascii_case("confirm") {
                CommandOutcome::Command(ParsedCommand::DeleteTopic {
                    pattern: pattern.clone(),
                    confirmed: true,
                })
            } else {
                CommandOutcome::failure(CommandError::InvalidArguments {
                    command: "deletetopic",
                    detail: "unrecognized second argument, expected confirm",
                })
            }
        }
        _ => CommandOutcome::failure(CommandError::InvalidArguments {
            command: "deletetopic",
            detail: "expected a pattern and an optional confirm flag",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ConnectRequest;

    #[test]
    fn bare_line_is_a_search_term() {
        assert_eq!(parse("temperature", &Settings::default()), CommandOutcome::SearchTerm("temperature".to_string()));
    }

    #[test]
    fn blank_line_is_an_empty_search_term() {
        assert_eq!(parse("   ", &Settings::default()), CommandOutcome::SearchTerm(String::new()));
    }

    #[test]
    fn slash_prefixed_line_is_a_topic_search() {
        assert_eq!(parse("/sensors/kitchen", &Settings::default()), CommandOutcome::TopicSearch("sensors/kitchen".to_string()));
    }

    #[test]
    fn bare_slash_is_a_failure() {
        assert_eq!(parse("/", &Settings::default()), CommandOutcome::failure("Empty topic search"));
    }

    #[test]
    fn unknown_command_is_a_failure() {
        assert_eq!(parse(":frobnicate", &Settings::default()), CommandOutcome::failure("Unknown command: :frobnicate"));
    }

    #[test]
    fn colon_command_is_case_insensitive_by_name() {
        let settings = Settings {
            hostname: Some("broker.local".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            parse(":CONNECT", &settings),
            CommandOutcome::Command(ParsedCommand::Connect(ConnectRequest {
                host: "broker.local".to_string(),
                port: 1883,
                username: None,
                password: None,
            }))
        );
    }

    #[test]
    fn export_all_with_explicit_format_and_path_from_spec_scenario() {
        let outcome = parse(":export all json /tmp/out", &Settings::default());
        assert_eq!(
            outcome,
            CommandOutcome::Command(ParsedCommand::Export {
                scope: ExportScope::All,
                format: ExportFormat::Json,
                path: "/tmp/out".to_string(),
            })
        );
    }

    #[test]
    fn export_with_three_bare_args_fails() {
        let outcome = parse(":export json /tmp/out extra", &Settings::default());
        assert!(matches!(outcome, CommandOutcome::Failure { .. }));
    }

    #[test]
    fn quoted_argument_survives_tokenization() {
        let outcome = parse(r#":setpass "two words""#, &Settings::default());
        assert_eq!(
            outcome,
            CommandOutcome::Command(ParsedCommand::SetPass {
                value: "two words".to_string()
            })
        );
    }

    #[test]
    fn deletetopic_without_confirm_flag() {
        let outcome = parse(":deletetopic sensors/+/temp", &Settings::default());
        assert_eq!(
            outcome,
            CommandOutcome::Command(ParsedCommand::DeleteTopic {
                pattern: "sensors/+/temp".to_string(),
                confirmed: false,
            })
        );
    }

    #[test]
    fn deletetopic_with_confirm_flag() {
        let outcome = parse(":deletetopic sensors/# confirm", &Settings::default());
        assert_eq!(
            outcome,
            CommandOutcome::Command(ParsedCommand::DeleteTopic {
                pattern: "sensors/#".to_string(),
                confirmed: true,
            })
        );
    }

    #[test]
    fn deletetopic_with_malformed_pattern_fails() {
        let outcome = parse(":deletetopic sensors/#/temp", &Settings::default());
        assert!(matches!(outcome, CommandOutcome::Failure { .. }));
    }

    #[test]
    fn setusetls_accepts_case_insensitive_bool() {
        assert_eq!(
            parse(":setusetls TRUE", &Settings::default()),
            CommandOutcome::Command(ParsedCommand::SetUseTls { value: true })
        );
    }

    #[test]
    fn view_rejects_unknown_mode() {
        assert!(matches!(parse(":view wireframe", &Settings::default()), CommandOutcome::Failure { .. }));
    }

    #[test]
    fn extra_argument_to_a_zero_arg_command_fails() {
        assert!(matches!(parse(":pause now", &Settings::default()), CommandOutcome::Failure { .. }));
    }
}
