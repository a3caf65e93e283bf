//! Destinations for `Print` output.

/// Receives one line per evaluated `Print` node, in program order.
pub trait Output {
    fn emit(&mut self, line: &str);
}

/// Writes each line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl Output for Stdout {
    fn emit(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Captures lines in memory.
impl Output for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<O: Output + ?Sized> Output for &mut O {
    fn emit(&mut self, line: &str) {
        (**self).emit(line);
    }
}
