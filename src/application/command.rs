//! Tree commands and their textual form.
//!
//! One grammar serves both `rsavl run <ops...>` and the interactive shell:
//!
//! ```text
//! insert 10 20 30   delete 20   search 30   random   clear
//! traverse inorder  inorder     preorder    postorder
//! stats   show      help        quit
//! ```
//!
//! Value verbs take one or more integers; `#` starts a comment.

use std::fmt;

use itertools::Itertools;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{TraversalOrder, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeCommand {
    Insert(Value),
    Delete(Value),
    Search(Value),
    /// Insert a random value from the configured range
    Random,
    Clear,
    Traverse(TraversalOrder),
    Stats,
    Show,
    Help,
    Quit,
}

impl fmt::Display for TreeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeCommand::Insert(v) => write!(f, "insert {}", v),
            TreeCommand::Delete(v) => write!(f, "delete {}", v),
            TreeCommand::Search(v) => write!(f, "search {}", v),
            TreeCommand::Random => f.write_str("random"),
            TreeCommand::Clear => f.write_str("clear"),
            TreeCommand::Traverse(order) => write!(f, "traverse {}", order),
            TreeCommand::Stats => f.write_str("stats"),
            TreeCommand::Show => f.write_str("show"),
            TreeCommand::Help => f.write_str("help"),
            TreeCommand::Quit => f.write_str("quit"),
        }
    }
}

/// Help text listing the accepted commands.
pub const COMMAND_HELP: &str = "\
insert <n>...     insert values (duplicates are reported and skipped)
delete <n>...     delete values (missing values are reported)
search <n>...     search values, highlighting the visited path
random            insert a random value
clear             remove every node
traverse <order>  print inorder | preorder | postorder
inorder | preorder | postorder
stats             print height and node count
show              draw the tree
help              this text
quit              leave the shell";

/// Validate a user-supplied value before it reaches the tree.
pub fn parse_value(input: &str) -> ApplicationResult<Value> {
    input
        .trim()
        .parse::<Value>()
        .map_err(|_| ApplicationError::invalid_input(input, "enter a valid number"))
}

/// Parse one shell line; blank lines and comments yield no commands.
pub fn parse_line(line: &str) -> ApplicationResult<Vec<TreeCommand>> {
    let code = line.split('#').next().unwrap_or_default();
    parse_tokens(code.split_whitespace())
}

/// Parse a token stream such as the arguments of `rsavl run`.
pub fn parse_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> ApplicationResult<Vec<TreeCommand>> {
    let mut tokens = tokens.into_iter().peekable();
    let mut commands = Vec::new();

    while let Some(token) = tokens.next() {
        let verb = token.to_ascii_lowercase();
        let value_verb: Option<fn(Value) -> TreeCommand> = match verb.as_str() {
            "insert" | "add" | "i" => Some(TreeCommand::Insert),
            "delete" | "remove" | "del" | "d" => Some(TreeCommand::Delete),
            "search" | "find" | "s" => Some(TreeCommand::Search),
            _ => None,
        };

        if let Some(make) = value_verb {
            let values: Vec<Value> = tokens
                .peeking_take_while(|t| t.parse::<Value>().is_ok())
                .map(parse_value)
                .collect::<ApplicationResult<_>>()?;
            if values.is_empty() {
                let got = tokens.peek().copied().unwrap_or("");
                return Err(ApplicationError::invalid_input(
                    got,
                    format!("'{}' needs a number", verb),
                ));
            }
            commands.extend(values.into_iter().map(make));
            continue;
        }

        let command = match verb.as_str() {
            "random" | "rand" | "r" => TreeCommand::Random,
            "clear" => TreeCommand::Clear,
            "traverse" | "t" => {
                let order = tokens.next().ok_or_else(|| {
                    ApplicationError::invalid_input("", "'traverse' needs an order")
                })?;
                TreeCommand::Traverse(parse_order(order)?)
            }
            "inorder" | "preorder" | "postorder" => TreeCommand::Traverse(parse_order(&verb)?),
            "stats" => TreeCommand::Stats,
            "show" | "draw" => TreeCommand::Show,
            "help" | "?" => TreeCommand::Help,
            "quit" | "exit" | "q" => TreeCommand::Quit,
            _ => {
                let reason = if token.parse::<Value>().is_ok() {
                    "value without a command"
                } else {
                    "unknown command"
                };
                return Err(ApplicationError::invalid_input(token, reason));
            }
        };
        commands.push(command);
    }

    Ok(commands)
}

fn parse_order(input: &str) -> ApplicationResult<TraversalOrder> {
    input
        .parse::<TraversalOrder>()
        .map_err(|e| ApplicationError::invalid_input(input, e.to_string()))
}

/// Render commands back into the script grammar.
pub fn format_script(commands: &[TreeCommand]) -> String {
    commands.iter().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_multi_value_verbs_when_parsing_then_expands_per_value() {
        let cmds = parse_tokens("insert 10 20 30 delete 20 search 30 inorder".split(' ')).unwrap();
        assert_eq!(
            cmds,
            vec![
                TreeCommand::Insert(10),
                TreeCommand::Insert(20),
                TreeCommand::Insert(30),
                TreeCommand::Delete(20),
                TreeCommand::Search(30),
                TreeCommand::Traverse(TraversalOrder::Inorder),
            ]
        );
    }

    #[test]
    fn given_negative_values_then_they_are_accepted() {
        let cmds = parse_line("add -5 -10").unwrap();
        assert_eq!(cmds, vec![TreeCommand::Insert(-5), TreeCommand::Insert(-10)]);
    }

    #[rstest]
    #[case("insert abc")]
    #[case("insert")]
    #[case("delete 1.5")]
    #[case("bogus")]
    #[case("42")]
    #[case("traverse sideways")]
    #[case("traverse")]
    fn given_invalid_input_when_parsing_then_rejects_before_tree(#[case] line: &str) {
        let err = parse_line(line).unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidInput { .. }), "{err}");
    }

    #[test]
    fn given_comment_and_blank_line_then_yields_nothing() {
        assert!(parse_line("   ").unwrap().is_empty());
        assert!(parse_line("# just a note").unwrap().is_empty());
        assert_eq!(parse_line("clear # reset").unwrap(), vec![TreeCommand::Clear]);
    }

    #[test]
    fn given_commands_when_formatting_then_parses_back() {
        let cmds = vec![
            TreeCommand::Insert(3),
            TreeCommand::Random,
            TreeCommand::Traverse(TraversalOrder::Postorder),
            TreeCommand::Stats,
        ];
        let script = format_script(&cmds);
        assert_eq!(script, "insert 3 random traverse postorder stats");
        assert_eq!(parse_line(&script).unwrap(), cmds);
    }

    #[test]
    fn given_value_with_spaces_when_validating_then_trims() {
        assert_eq!(parse_value(" 17 ").unwrap(), 17);
        assert!(parse_value("").is_err());
    }
}
