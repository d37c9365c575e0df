//! Interactive prompt.  One [`Lox`] lives for the whole session, so globals
//! and functions defined on one line are visible on the next.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info};

use slox::lox::Lox;
use slox::reporting::ConsoleReporter;

/// A `:name rest` line split into its command and argument.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Command { name: &'a str, source: &'a str },
    Source(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.strip_prefix(':') {
        Some(rest) => {
            let end: usize = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (name, source) = rest.split_at(end);
            Input::Command {
                name,
                source: source.trim_start(),
            }
        }
        None => Input::Source(line),
    }
}

pub fn start() -> Result<()> {
    println!("slox interactive:");
    println!();

    let mut lox = Lox::new(ConsoleReporter, ConsoleReporter);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut buffer = String::new();
    let mut multiline = false;

    loop {
        print!("{}", if multiline { "  " } else { "> " });
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read: usize = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if read == 0 {
            break;
        }

        let line: &str = line.trim_end_matches(['\n', '\r']);

        if let Some(head) = line.strip_suffix('\\') {
            multiline = true;
            buffer.push_str(head);
            buffer.push('\n');
            continue;
        }

        let keep_going: bool = if multiline {
            buffer.push_str(line);
            buffer.push('\n');
            let source = std::mem::take(&mut buffer);
            multiline = false;
            handle(&mut lox, &source)
        } else {
            handle(&mut lox, line)
        };

        if !keep_going {
            break;
        }
    }

    println!();
    println!("bye!");

    info!("REPL session ended");

    Ok(())
}

/// Runs one unit of input; `false` ends the session.
fn handle(lox: &mut Lox, input: &str) -> bool {
    match parse_input(input) {
        Input::Command { name, source } => {
            debug!("REPL command '{}'", name);

            match name {
                "quit" | "q" => return false,

                "token" => {
                    if let Ok(tokens) = lox.tokenize(source) {
                        for token in tokens {
                            println!("{}", token);
                        }
                    }
                }

                "parse" => {
                    if let Ok(tree) = lox.parse_tree(source) {
                        println!("{}", tree);
                    }
                }

                // the value is printed by the output sink
                "eval" => {
                    let _ = lox.evaluate(source);
                }

                "env" => println!("{}", lox.environment_dump()),

                other => println!("Unrecognized command: {}", other),
            }
        }

        Input::Source(source) => {
            if let Err(e) = lox.run(source) {
                // already reported through the console sink
                debug!("REPL input failed: {}", e);
            }
        }
    }

    true
}

#[cfg(test)]
mod repl_tests {
    use super::*;

    #[test]
    fn plain_source_is_not_a_command() {
        assert_eq!(parse_input("print 1;"), Input::Source("print 1;"));
    }

    #[test]
    fn command_with_argument() {
        assert_eq!(
            parse_input(":eval   1 + 2"),
            Input::Command {
                name: "eval",
                source: "1 + 2"
            }
        );
    }

    #[test]
    fn bare_command() {
        assert_eq!(
            parse_input(":q"),
            Input::Command {
                name: "q",
                source: ""
            }
        );
    }
}
