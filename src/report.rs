//! Terminal output for the CLI: a header, one line per hit, then a summary.

use std::time::Duration;

use versefind::{Error, Hit};

/// Roles a piece of output plays, each with its own SGR sequence.
#[derive(Clone, Copy)]
enum Style {
    Title,
    Rule,
    Counter,
    Reference,
    Faint,
    Failure,
    Book,
    Match,
}

impl Style {
    fn sgr(self) -> &'static str {
        match self {
            Style::Title => "1;36",
            Style::Rule | Style::Counter => "90",
            Style::Reference => "1;32",
            Style::Faint => "2",
            Style::Failure => "31",
            Style::Book | Style::Match => "33",
        }
    }
}

/// Streams hits to stdout as they are produced.
pub struct Report {
    color: bool,
    marker: Option<String>,
    count: usize,
}

impl Report {
    pub fn new(color: bool, marker: Option<String>) -> Self {
        Self { color, marker, count: 0 }
    }

    fn style(&self, text: impl AsRef<str>, style: Style) -> String {
        let text = text.as_ref();
        if self.color { format!("\x1b[{}m{text}\x1b[0m", style.sgr()) } else { text.to_string() }
    }

    pub fn header(&self, summary: &str) {
        println!("\n{}", self.style(format!("⚙  Searching: {summary}"), Style::Title));
        println!("\n{}", self.style("━━━ Verses ━━━", Style::Rule));
    }

    pub fn hit(&mut self, hit: &Hit) {
        println!(
            "  {} {} {} {}",
            self.style(format!("[{}]", self.count), Style::Counter),
            self.style(hit.reference.to_string(), Style::Reference),
            self.style("│", Style::Faint),
            self.paint_marked(&hit.text),
        );
        self.count += 1;
    }

    pub fn error(&self, err: &Error) {
        println!("\n{}", self.style("━━━ Error ━━━", Style::Rule));
        println!("  {}", self.style(err.to_string(), Style::Failure));
        if let Some(book) = err.book() {
            println!("  {} {}", self.style("book:", Style::Faint), self.style(book, Style::Book));
        }
    }

    pub fn footer(&self, elapsed: Duration) {
        if self.count == 0 {
            println!("{}", self.style("  No verse matched", Style::Faint));
        }
        println!("\n{}", self.style("━━━ Summary ━━━", Style::Rule));
        println!(
            "  Verses: {}  │  Elapsed: {}",
            self.style(self.count.to_string(), Style::Reference),
            self.style(format!("{elapsed:?}"), Style::Faint),
        );
        println!();
    }

    /// Colour the spans between marker pairs; the markers stay in the text.
    fn paint_marked(&self, text: &str) -> String {
        let Some(marker) = self.marker.as_deref().filter(|m| !m.is_empty() && self.color) else {
            return text.to_string();
        };
        text.split(marker)
            .enumerate()
            .map(|(i, part)| if i % 2 == 1 { self.style(part, Style::Match) } else { part.to_string() })
            .collect::<Vec<_>>()
            .join(marker)
    }
}
