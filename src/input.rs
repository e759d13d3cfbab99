use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::AgentError;

/// Line-oriented prompts for values missing from the command line.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Ask until a non-blank answer arrives.
    pub fn ask(&mut self, label: &str) -> Result<String, AgentError> {
        loop {
            write!(self.writer, "{}: ", label)?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(AgentError::InvalidInput(format!(
                    "no value given for '{}'",
                    label
                )));
            }
            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
        }
    }

    pub fn ask_parsed<T: FromStr>(&mut self, label: &str) -> Result<T, AgentError> {
        let answer = self.ask(label)?;
        answer.parse().map_err(|_| {
            AgentError::InvalidInput(format!("'{}' is not a valid value for '{}'", answer, label))
        })
    }

    /// Use `given` when present, otherwise prompt.
    pub fn value_or_ask(&mut self, given: Option<String>, label: &str) -> Result<String, AgentError> {
        match given {
            Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => self.ask(label),
        }
    }
}

/// Parse a pull request number; it must be a positive integer.
pub fn parse_pull_number(raw: &str) -> Result<u64, AgentError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AgentError::InvalidInput(format!("'{}' is not a valid PR number", raw.trim())))
}

/// Reject owner/repo names that could not be a GitHub account or repository.
pub fn validate_github_name(name: &str, field: &str) -> Result<(), AgentError> {
    if name.is_empty() {
        return Err(AgentError::InvalidInput(format!("{} must not be empty", field)));
    }
    for ch in ['/', '?', '#', '%', '\0', ' ', '\n', '\t'] {
        if name.contains(ch) {
            return Err(AgentError::InvalidInput(format!(
                "{} contains invalid character '{}'",
                field,
                ch.escape_default()
            )));
        }
    }
    Ok(())
}

/// Like `validate_github_name` but allows slashes, as in `feature/foo`.
pub fn validate_branch(branch: &str) -> Result<(), AgentError> {
    if branch.is_empty() {
        return Err(AgentError::InvalidInput("branch must not be empty".to_string()));
    }
    if branch
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, '?' | '#' | '~' | '^' | ':'))
    {
        return Err(AgentError::InvalidInput(format!(
            "'{}' is not a valid branch name",
            branch
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_trims_answer() {
        let mut p = prompter("  octocat \n");
        assert_eq!(p.ask("Enter repository owner").unwrap(), "octocat");
        assert_eq!(String::from_utf8(p.writer).unwrap(), "Enter repository owner: ");
    }

    #[test]
    fn test_ask_reprompts_on_blank() {
        let mut p = prompter("\n   \nhello-world\n");
        assert_eq!(p.ask("Enter repository name").unwrap(), "hello-world");
        let shown = String::from_utf8(p.writer).unwrap();
        assert_eq!(shown.matches("Enter repository name: ").count(), 3);
    }

    #[test]
    fn test_ask_eof() {
        let mut p = prompter("");
        assert!(matches!(p.ask("Enter branch name"), Err(AgentError::InvalidInput(_))));
    }

    #[test]
    fn test_ask_sequence() {
        let mut p = prompter("octocat\nhello-world\n42\n");
        assert_eq!(p.ask("owner").unwrap(), "octocat");
        assert_eq!(p.ask("repo").unwrap(), "hello-world");
        assert_eq!(p.ask_parsed::<u64>("pr").unwrap(), 42);
    }

    #[test]
    fn test_ask_parsed_rejects_garbage() {
        let mut p = prompter("forty-two\n");
        let err = p.ask_parsed::<u64>("Enter PR number").unwrap_err();
        assert!(err.to_string().contains("forty-two"));
    }

    #[test]
    fn test_value_or_ask_prefers_given() {
        let mut p = prompter("ignored\n");
        assert_eq!(p.value_or_ask(Some("main".into()), "branch").unwrap(), "main");
        assert!(p.writer.is_empty());
        assert_eq!(p.value_or_ask(None, "branch").unwrap(), "ignored");
    }

    #[test]
    fn test_parse_pull_number() {
        assert_eq!(parse_pull_number("7").unwrap(), 7);
        assert_eq!(parse_pull_number(" 123 ").unwrap(), 123);
        assert!(parse_pull_number("0").is_err());
        assert!(parse_pull_number("-3").is_err());
        assert!(parse_pull_number("#12").is_err());
    }

    #[test]
    fn test_validate_github_name() {
        assert!(validate_github_name("octocat", "owner").is_ok());
        assert!(validate_github_name("hello-world.rs", "repo").is_ok());
        assert!(validate_github_name("my_repo", "repo").is_ok());
        assert!(validate_github_name("", "owner").is_err());
        assert!(validate_github_name("octocat/hello", "owner").is_err());
        assert!(validate_github_name("repo?x=1", "repo").is_err());
        assert!(validate_github_name("my repo", "repo").is_err());
    }

    #[test]
    fn test_validate_branch() {
        assert!(validate_branch("main").is_ok());
        assert!(validate_branch("feature/readme").is_ok());
        assert!(validate_branch("release-1.2").is_ok());
        assert!(validate_branch("").is_err());
        assert!(validate_branch("has space").is_err());
        assert!(validate_branch("main~1").is_err());
        assert!(validate_branch("a:b").is_err());
    }
}
