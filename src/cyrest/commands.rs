//! Cytoscape command grammar: `<namespace> <verb...> key=value key="multi word"`.
//!
//! Commands are built for STRING queries and parsed back into a path plus
//! arguments when raw text has to travel over the CyREST commands endpoint.

use std::fmt;

/// A command split into its path words and its `key=value` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    path: Vec<String>,
    args: Vec<(String, String)>,
}

impl Command {
    /// Start a command from its space-separated path, e.g. `"string protein query"`.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.split_whitespace().map(str::to_string).collect(),
            args: Vec::new(),
        }
    }

    /// Append an argument. Keys are the command's own vocabulary.
    pub fn arg(mut self, key: &str, value: impl ToString) -> Self {
        self.args.push((key.to_string(), value.to_string()));
        self
    }

    /// Append an argument only when a value is present.
    pub fn arg_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.arg(key, v),
            None => self,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn args(&self) -> &[(String, String)] {
        &self.args
    }

    /// Value of the first argument named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Segments of `/v1/commands/{namespace}/{command}`. See [`route`].
    pub fn route(&self) -> Vec<String> {
        route(&self.path)
    }

    /// Parse raw command text.
    ///
    /// Leading bare words form the path; everything from the first
    /// `key=value` token on is an argument. A stray bare word after the
    /// arguments started is folded into the preceding value, so the
    /// application (not this parser) decides whether the text is valid.
    pub fn parse(text: &str) -> Option<Self> {
        let tokens = tokenize(text);
        let mut path = Vec::new();
        let mut args: Vec<(String, String)> = Vec::new();

        for token in tokens {
            match token {
                Token::Pair(key, value) => args.push((key, value)),
                Token::Word(word) => match args.last_mut() {
                    Some((_, value)) => {
                        value.push(' ');
                        value.push_str(&word);
                    }
                    None => path.push(word),
                },
            }
        }

        if path.is_empty() {
            return None;
        }
        Some(Self { path, args })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join(" "))?;
        for (key, value) in &self.args {
            write!(f, " {}={}", key, quote(value))?;
        }
        Ok(())
    }
}

/// Split a command path into CyREST's two route segments.
///
/// The first word is the namespace; the remaining words stay together as
/// one command name, spaces included (`network`, `import file`).
pub fn route<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    match path.split_first() {
        None => Vec::new(),
        Some((namespace, [])) => vec![namespace.as_ref().to_string()],
        Some((namespace, rest)) => vec![
            namespace.as_ref().to_string(),
            rest.iter().map(|w| w.as_ref()).collect::<Vec<&str>>().join(" "),
        ],
    }
}

/// Quote a value when it would otherwise break tokenization.
pub fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '=' | '"' | '\''));
    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Pair(String, String),
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut key = String::new();
        let mut value: Option<String> = None;
        let mut in_quotes = false;

        while let Some(&c) = chars.peek() {
            if !in_quotes && c.is_whitespace() {
                break;
            }
            chars.next();
            match (c, value.as_mut()) {
                ('\\', Some(v)) if in_quotes => {
                    if let Some(escaped) = chars.next() {
                        v.push(escaped);
                    }
                }
                ('"', Some(_)) => in_quotes = !in_quotes,
                ('=', None) => value = Some(String::new()),
                (c, Some(v)) => v.push(c),
                (c, None) => key.push(c),
            }
        }

        tokens.push(match value {
            Some(v) => Token::Pair(key, v),
            None => Token::Word(key),
        });
    }

    tokens
}

/// Strip the trailing `Finished` marker and blank lines from plain-text command output.
pub fn output_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty() && line.trim() != "Finished")
        .map(str::to_string)
        .collect()
}
