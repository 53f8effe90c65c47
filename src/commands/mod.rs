pub mod badges;
pub mod boards;
pub mod commits;
pub mod groups;
pub mod hooks;
pub mod init;
pub mod profile;
pub mod repos;

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on the terminal; empty input takes the default
pub(crate) fn confirm(question: &str, default: bool) -> io::Result<bool> {
    print!("{question} {} ", if default { "[Y/n]" } else { "[y/N]" });
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(false);
    }

    Ok(parse_answer(&input, default))
}

fn parse_answer(input: &str, default: bool) -> bool {
    match input.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert!(parse_answer("\n", true));
        assert!(!parse_answer("\n", false));
        assert!(parse_answer("Y\n", false));
        assert!(parse_answer("yes", false));
        assert!(!parse_answer("n", true));
        assert!(!parse_answer("q", true));
    }
}
