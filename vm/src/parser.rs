use arch::vm::Command;

use crate::error::Error;

/// A parsed command with its 1-based line number and trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub no: usize,
    pub text: String,
    pub cmd: Command,
}

/// Parse a whole unit. Comments (`//`) and blank lines are skipped.
pub fn parse(source: &str) -> Result<Vec<Line>, Error> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let text = raw.split("//").next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let cmd = Command::parse(text).map_err(|source| Error::Parse {
            line: idx + 1,
            text: text.to_string(),
            source,
        })?;
        lines.push(Line {
            no: idx + 1,
            text: text.to_string(),
            cmd,
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::vm::{Arith, Segment};

    #[test]
    fn skip_comments_and_blanks() {
        let lines = parse("// test\n\npush constant 1 // one\n  add\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].no, 3);
        assert_eq!(lines[0].cmd, Command::Push(Segment::Constant, 1));
        assert_eq!(lines[1].no, 4);
        assert_eq!(lines[1].cmd, Command::Arith(Arith::Add));
    }

    #[test]
    fn error_carries_line() {
        let err = parse("push constant 1\npop constant 1\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(
            err,
            Error::Parse {
                source: arch::Error::PopConstant,
                ..
            }
        ));
    }
}
