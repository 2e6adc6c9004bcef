//! Best-effort constant arithmetic folding.
//!
//! `set` and `ask` pass their final value through [`fold`]: if the text
//! parses as a constant arithmetic expression it is replaced with the
//! computed result, otherwise it is returned unchanged with no diagnostic.
//! Folding is a convenience, never a requirement - a string that merely
//! looks unparsable passes through verbatim.

/// Numeric value during evaluation. Integer arithmetic stays integral
/// (including truncating division); mixing in a float promotes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(int) => int as f64,
            Num::Float(float) => float,
        }
    }

    fn render(self) -> String {
        match self {
            Num::Int(int) => int.to_string(),
            Num::Float(float) => float.to_string(),
        }
    }
}

/// Evaluate `input` as a constant arithmetic expression, returning the
/// canonical string form of the result, or `input` unchanged on any parse
/// or evaluation failure.
pub fn fold(input: &str) -> String {
    match Parser::new(input).parse() {
        Some(value) => value.render(),
        None => input.to_string(),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Option<Num> {
        let value = self.expr()?;
        self.skip_whitespace();
        // Trailing garbage means this was never an expression.
        if self.pos < self.chars.len() {
            return None;
        }
        Some(value)
    }

    fn expr(&mut self) -> Option<Num> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.current() {
                Some('+') => {
                    self.pos += 1;
                    value = add(value, self.term()?);
                }
                Some('-') => {
                    self.pos += 1;
                    value = sub(value, self.term()?);
                }
                _ => return Some(value),
            }
        }
    }

    fn term(&mut self) -> Option<Num> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.current() {
                Some('*') => {
                    self.pos += 1;
                    value = mul(value, self.factor()?);
                }
                Some('/') => {
                    self.pos += 1;
                    value = div(value, self.factor()?)?;
                }
                Some('%') => {
                    self.pos += 1;
                    value = rem(value, self.factor()?)?;
                }
                _ => return Some(value),
            }
        }
    }

    fn factor(&mut self) -> Option<Num> {
        self.skip_whitespace();
        match self.current()? {
            '-' => {
                self.pos += 1;
                let value = self.factor()?;
                Some(match value {
                    Num::Int(int) => Num::Int(int.checked_neg()?),
                    Num::Float(float) => Num::Float(-float),
                })
            }
            '(' => {
                self.pos += 1;
                let value = self.expr()?;
                self.skip_whitespace();
                if self.current() != Some(')') {
                    return None;
                }
                self.pos += 1;
                Some(value)
            }
            ch if ch.is_ascii_digit() => self.number(),
            _ => None,
        }
    }

    fn number(&mut self) -> Option<Num> {
        let start = self.pos;
        let mut is_float = false;
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                self.pos += 1;
            } else if ch == '.' && !is_float {
                is_float = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            text.parse::<f64>().ok().map(Num::Float)
        } else {
            text.parse::<i64>().ok().map(Num::Int)
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.current().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }
}

fn add(left: Num, right: Num) -> Num {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => Num::Int(a.wrapping_add(b)),
        _ => Num::Float(left.as_f64() + right.as_f64()),
    }
}

fn sub(left: Num, right: Num) -> Num {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => Num::Int(a.wrapping_sub(b)),
        _ => Num::Float(left.as_f64() - right.as_f64()),
    }
}

fn mul(left: Num, right: Num) -> Num {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => Num::Int(a.wrapping_mul(b)),
        _ => Num::Float(left.as_f64() * right.as_f64()),
    }
}

fn div(left: Num, right: Num) -> Option<Num> {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => a.checked_div(b).map(Num::Int),
        _ => {
            let divisor = right.as_f64();
            if divisor == 0.0 {
                None
            } else {
                Some(Num::Float(left.as_f64() / divisor))
            }
        }
    }
}

fn rem(left: Num, right: Num) -> Option<Num> {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => a.checked_rem(b).map(Num::Int),
        _ => {
            let divisor = right.as_f64();
            if divisor == 0.0 {
                None
            } else {
                Some(Num::Float(left.as_f64() % divisor))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_addition() {
        assert_eq!(fold("1+4"), "5");
    }

    #[test]
    fn parenthesised_expression() {
        assert_eq!(fold("(23+10)*3"), "99");
    }

    #[test]
    fn non_expressions_pass_through() {
        assert_eq!(fold("not an expr"), "not an expr");
        assert_eq!(fold("Hello World"), "Hello World");
        assert_eq!(fold(""), "");
    }

    #[test]
    fn integer_division_truncates() {
        assert_eq!(fold("5/2"), "2");
    }

    #[test]
    fn float_arithmetic_promotes() {
        assert_eq!(fold("1.5*2"), "3");
        assert_eq!(fold("7.0/2"), "3.5");
    }

    #[test]
    fn division_by_zero_passes_through() {
        assert_eq!(fold("1/0"), "1/0");
    }

    #[test]
    fn unary_minus_and_precedence() {
        assert_eq!(fold("-3+10"), "7");
        assert_eq!(fold("2+3*4"), "14");
        assert_eq!(fold("10%4"), "2");
    }

    #[test]
    fn trailing_garbage_fails_the_parse() {
        assert_eq!(fold("1+4 apples"), "1+4 apples");
    }

    #[test]
    fn bare_numbers_are_unchanged() {
        assert_eq!(fold("42"), "42");
    }
}
