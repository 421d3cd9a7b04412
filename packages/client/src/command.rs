//! Parsing of REPL input lines.
//!
//! ```text
//! ping                  -> emit "ping"
//! search {"q":"rust"}   -> emit "search" with one JSON object
//! search hello world    -> emit "search" with the string "hello world"
//! /leave                -> leave the namespace
//! /quit                 -> close the connection
//! ```

use kodama_server::domain::{EventName, ValueObjectError};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Emit { name: EventName, args: Vec<Value> },
    Leave,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ValueObjectError> {
        let line = line.trim();
        match line {
            "" => return Ok(Self::Empty),
            "/quit" | "/exit" => return Ok(Self::Quit),
            "/leave" => return Ok(Self::Leave),
            _ => {}
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let name = EventName::try_from(name)?;

        let args = if rest.is_empty() {
            Vec::new()
        } else {
            // Valid JSON is sent as-is, anything else as a plain string
            vec![serde_json::from_str(rest).unwrap_or_else(|_| Value::String(rest.to_string()))]
        };

        Ok(Self::Emit { name, args })
    }
}
