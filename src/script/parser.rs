//! Line parser implementation using Pest.

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::result::ScriptError;
use crate::script::ast::{CmdLine, Command, MathOp};

#[derive(Parser)]
#[grammar = "script/grammar.pest"]
struct LineParser;

/// Whether a trimmed line carries no instruction (blank or `#` comment).
pub fn is_ignorable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Classify one trimmed script line.
///
/// Lines that match no form fail with [`ScriptError::UnknownCommand`].
pub fn parse_line(line: &str) -> Result<Command, ScriptError> {
    let unknown = || ScriptError::UnknownCommand {
        line: line.to_string(),
    };

    let mut pairs = LineParser::parse(Rule::line, line).map_err(|_| unknown())?;
    let statement = pairs
        .next()
        .and_then(|line_pair| line_pair.into_inner().next())
        .ok_or_else(unknown)?;

    build_command(statement).ok_or_else(unknown)
}

fn build_command(pair: Pair<Rule>) -> Option<Command> {
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();

    let command = match rule {
        Rule::if_stmt => Command::If {
            condition: take_str(&mut inner)?,
        },
        Rule::else_stmt => Command::Else,
        Rule::endif_stmt => Command::EndIf,
        Rule::loop_stmt => Command::Loop {
            // Digits only, so the parse can fail solely on overflow
            count: take_str(&mut inner)?.parse().unwrap_or(u64::MAX),
        },
        Rule::endloop_stmt => Command::EndLoop,
        Rule::break_stmt => Command::Break,
        Rule::continue_stmt => Command::Continue,
        Rule::cmd_stmt => Command::Cmd(build_cmd_line(inner)),
        Rule::open_stmt => Command::Open {
            gui_id: take_str(&mut inner)?,
            target: take_str(&mut inner),
        },
        Rule::close_stmt => Command::Close,
        Rule::msg_stmt => Command::Msg {
            text: take_str(&mut inner)?,
        },
        Rule::console_stmt => Command::Console {
            command: take_str(&mut inner)?,
        },
        Rule::perm_stmt => Command::Perm {
            permission: take_str(&mut inner)?.trim().to_string(),
        },
        Rule::set_stmt => Command::Set {
            name: take_str(&mut inner)?,
            value: take_str(&mut inner)?,
        },
        Rule::math_stmt => Command::Math {
            name: take_str(&mut inner)?,
            op: MathOp::from_symbol(&take_str(&mut inner)?)?,
            operand: take_str(&mut inner)?,
        },
        Rule::random_stmt => Command::Random {
            name: take_str(&mut inner)?,
            min: take_str(&mut inner)?,
            max: take_str(&mut inner)?,
        },
        Rule::delay_stmt => Command::Delay {
            millis: take_str(&mut inner)?,
        },
        Rule::call_stmt => Command::Call {
            name: take_str(&mut inner)?.trim().to_string(),
            args: take_str(&mut inner)
                .map(|args| args.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        },
        _ => return None,
    };

    Some(command)
}

fn build_cmd_line(inner: Pairs<Rule>) -> CmdLine {
    let mut cmd = CmdLine {
        command: String::new(),
        target: None,
        trailing: String::new(),
    };

    for part in inner {
        match part.as_rule() {
            Rule::cmd_text => cmd.command = part.as_str().trim().to_string(),
            Rule::cmd_target => {
                cmd.target = part
                    .into_inner()
                    .next()
                    .map(|name| name.as_str().trim().to_string())
            }
            Rule::cmd_trailing => cmd.trailing = part.as_str().trim().to_string(),
            _ => {}
        }
    }

    cmd
}

fn take_str(pairs: &mut Pairs<Rule>) -> Option<String> {
    pairs.next().map(|pair| pair.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_line(line).unwrap()
    }

    #[test]
    fn test_flow_keywords() {
        assert_eq!(
            parse("if {coins} > 5"),
            Command::If {
                condition: "{coins} > 5".to_string()
            }
        );
        assert_eq!(parse("else"), Command::Else);
        assert_eq!(parse("endif"), Command::EndIf);
        assert_eq!(parse("loop 3"), Command::Loop { count: 3 });
        assert_eq!(parse("endloop"), Command::EndLoop);
        assert_eq!(parse("break"), Command::Break);
        assert_eq!(parse("continue"), Command::Continue);
    }

    #[test]
    fn test_cmd_with_target_and_trailing() {
        assert_eq!(
            parse("cmd: give {Notch} diamond 5"),
            Command::Cmd(CmdLine {
                command: "give".to_string(),
                target: Some("Notch".to_string()),
                trailing: "diamond 5".to_string(),
            })
        );
    }

    #[test]
    fn test_cmd_without_target() {
        assert_eq!(
            parse("cmd:spawn"),
            Command::Cmd(CmdLine {
                command: "spawn".to_string(),
                target: None,
                trailing: String::new(),
            })
        );
    }

    #[test]
    fn test_open_forms() {
        assert_eq!(
            parse("open: shop"),
            Command::Open {
                gui_id: "shop".to_string(),
                target: None
            }
        );
        assert_eq!(
            parse("open: shop Alex"),
            Command::Open {
                gui_id: "shop".to_string(),
                target: Some("Alex".to_string())
            }
        );
        // Three tokens no longer fit the shorthand
        assert_eq!(
            parse("open: shop Alex extra"),
            Command::Call {
                name: "open".to_string(),
                args: vec!["shop".to_string(), "Alex".to_string(), "extra".to_string()],
            }
        );
    }

    #[test]
    fn test_set_and_math() {
        assert_eq!(
            parse("set greeting Hello {player}"),
            Command::Set {
                name: "greeting".to_string(),
                value: "Hello {player}".to_string()
            }
        );
        assert_eq!(
            parse("math score * 2"),
            Command::Math {
                name: "score".to_string(),
                op: MathOp::Mul,
                operand: "2".to_string()
            }
        );
    }

    #[test]
    fn test_random_and_delay_shorthand() {
        assert_eq!(
            parse("random roll 1 6"),
            Command::Random {
                name: "roll".to_string(),
                min: "1".to_string(),
                max: "6".to_string()
            }
        );
        assert_eq!(
            parse("delay 250"),
            Command::Delay {
                millis: "250".to_string()
            }
        );
    }

    #[test]
    fn test_generic_call() {
        assert_eq!(
            parse("sound: ENTITY_PLAYER_LEVELUP 1.0  2.0"),
            Command::Call {
                name: "sound".to_string(),
                args: vec![
                    "ENTITY_PLAYER_LEVELUP".to_string(),
                    "1.0".to_string(),
                    "2.0".to_string()
                ],
            }
        );
        assert_eq!(
            parse("firework:"),
            Command::Call {
                name: "firework".to_string(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_keyword_prefix_falls_through() {
        assert_eq!(
            parse("settings: on"),
            Command::Call {
                name: "settings".to_string(),
                args: vec!["on".to_string()]
            }
        );
        assert_eq!(
            parse("close: now"),
            Command::Call {
                name: "close".to_string(),
                args: vec!["now".to_string()]
            }
        );
    }

    #[test]
    fn test_shorthand_wins_over_generic_call() {
        assert_eq!(
            parse("msg: time is 12:30"),
            Command::Msg {
                text: "time is 12:30".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_line("jump around").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownCommand { line } if line == "jump around"));
        assert!(parse_line("loop many").is_err());
        assert!(parse_line("if").is_err());
    }

    #[test]
    fn test_ignorable_lines() {
        assert!(is_ignorable(""));
        assert!(is_ignorable("# a comment"));
        assert!(!is_ignorable("close"));
    }
}
