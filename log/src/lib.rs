//! Global in-memory log with colored output to stderr.

use std::io::Write;
use std::sync::Mutex;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
    Gold,
    Gray,
}

impl Color {
    fn ansi(self) -> &'static str {
        match self {
            Color::Green => "\x1b[92m",
            Color::Red => "\x1b[91m",
            Color::Gold => "\x1b[93m",
            Color::Gray => "\x1b[37m",
        }
    }
}

const RESET: &str = "\x1b[0m";

#[macro_export]
macro_rules! notify {
    () => {};

    ($($arg:tt)*) => {{
        let mut logger = $crate::LOGGER.lock().unwrap_or_else(|err| err.into_inner());

        logger.append(
            format!(
                $($arg)*
            ),
            $crate::Color::Green,
        );
    }};
}

#[macro_export]
macro_rules! strong {
    () => {};

    ($($arg:tt)*) => {{
        let mut logger = $crate::LOGGER.lock().unwrap_or_else(|err| err.into_inner());

        logger.append(
            format!(
                $($arg)*
            ),
            $crate::Color::Red,
        );
    }};
}

#[macro_export]
macro_rules! warn {
    () => {};

    ($($arg:tt)*) => {{
        let mut logger = $crate::LOGGER.lock().unwrap_or_else(|err| err.into_inner());

        logger.append(
            format!(
                $($arg)*
            ),
            $crate::Color::Gold,
        );
    }};
}

#[macro_export]
macro_rules! trace {
    () => {};

    ($($arg:tt)*) => {{
        let mut logger = $crate::LOGGER.lock().unwrap_or_else(|err| err.into_inner());

        logger.append(
            format!(
                $($arg)*
            ),
            $crate::Color::Gray,
        );
    }};
}

pub static LOGGER: Lazy<Mutex<Logger<300>>> = Lazy::new(|| Mutex::new(Logger::new()));

/// Ring buffer holding the last `N` lines logged.
///
/// Every line except traces is echoed to stderr as it's appended, traces only when verbose.
pub struct Logger<const N: usize> {
    lines: [(String, Color); N],
    head: usize,
    len: usize,
    verbose: bool,
    colored: bool,
}

impl<const N: usize> Logger<N> {
    fn new() -> Self {
        Self {
            lines: std::array::from_fn(|_| (String::new(), Color::Gray)),
            head: 0,
            len: 0,
            verbose: false,
            colored: true,
        }
    }

    /// Also echo traces.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Whether echoed lines carry ANSI color codes.
    pub fn set_colored(&mut self, colored: bool) {
        self.colored = colored;
    }

    pub fn append(&mut self, line: String, color: Color) {
        if color != Color::Gray || self.verbose {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", self.paint(&line, color));
        }

        self.lines[self.head] = (line, color);
        self.head = (self.head + 1) % N;
        self.len += 1;
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    fn lines(&self) -> (&[(String, Color)], &[(String, Color)]) {
        if self.len < N {
            (&self.lines[0..self.len], &[])
        } else {
            // wrapped around, so we need to return two slices
            let (a, b) = self.lines.split_at(self.head);

            (b, a)
        }
    }

    fn paint(&self, line: &str, color: Color) -> String {
        if self.colored {
            format!("{}{line}{RESET}", color.ansi())
        } else {
            line.to_string()
        }
    }

    /// Every line still held, oldest first.
    pub fn format(&self) -> String {
        let mut out = String::new();
        let lines = self.lines();

        for (line, color) in lines.0.iter().chain(lines.1) {
            out += &self.paint(line, *color);
            out.push('\n');
        }

        out
    }

    /// Write every line still held to stderr.
    pub fn dump(&self) {
        let _ = std::io::stderr().lock().write_all(self.format().as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Logger};

    fn quiet<const N: usize>() -> Logger<N> {
        let mut logger = Logger::new();
        logger.set_colored(false);
        logger
    }

    #[test]
    fn keeps_order() {
        let mut logger = quiet::<4>();
        logger.append("a".to_string(), Color::Gray);
        logger.append("b".to_string(), Color::Gray);
        assert_eq!(logger.format(), "a\nb\n");
    }

    #[test]
    fn wraps_around() {
        let mut logger = quiet::<3>();
        for line in ["a", "b", "c", "d", "e"] {
            logger.append(line.to_string(), Color::Gray);
        }
        assert_eq!(logger.format(), "c\nd\ne\n");

        logger.clear();
        assert_eq!(logger.format(), "");
    }

    #[test]
    fn colors() {
        let mut logger = Logger::<2>::new();
        logger.append("oops".to_string(), Color::Gray);
        assert_eq!(logger.format(), "\x1b[37moops\x1b[0m\n");
    }
}
