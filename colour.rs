//! ANSI colour helpers for diagnostics and verbose output.

const RESET: &str = "\x1b[0m";

fn wrap(code: &str, text: &str) -> String {
    format!("{code}{text}{RESET}")
}

pub fn red(text: &str) -> String {
    wrap("\x1b[31m", text)
}

pub fn green(text: &str) -> String {
    wrap("\x1b[32m", text)
}

pub fn yellow(text: &str) -> String {
    wrap("\x1b[33m", text)
}

pub fn blue(text: &str) -> String {
    wrap("\x1b[34m", text)
}

pub fn magenta(text: &str) -> String {
    wrap("\x1b[35m", text)
}

pub fn cyan(text: &str) -> String {
    wrap("\x1b[36m", text)
}

pub fn grey(text: &str) -> String {
    wrap("\x1b[90m", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_resets() {
        let coloured = red("boom");
        assert!(coloured.starts_with("\x1b[31m"));
        assert!(coloured.ends_with(RESET));
        assert!(coloured.contains("boom"));
    }
}
