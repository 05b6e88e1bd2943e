use clap::Parser;
use numbering::CounterStyle;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser)]
#[command(about = "List the supported counter styles with sample values")]
pub struct Styles {
    /// How many sample values to render per style
    #[arg(long, short = 'n', default_value_t = 5)]
    count: u64,

    /// Value to start the samples at
    #[arg(long, default_value_t = 1)]
    start: u64,
}

impl Styles {
    pub fn run(self) {
        let count = if is_narrow() { self.count.min(3) } else { self.count };
        for style in CounterStyle::ALL {
            println!("{:<24} {}", style.css_name(), self.samples(style, count).dim());
        }
    }

    fn samples(&self, style: CounterStyle, count: u64) -> String {
        (self.start..self.start.saturating_add(count))
            .map(|n| style.render(n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_start_at_the_requested_value() {
        let styles = Styles { count: 3, start: 3 };

        assert_eq!(styles.samples(CounterStyle::LowerRoman, 3), "iii, iv, v");
        assert_eq!(styles.samples(CounterStyle::UpperAlpha, 1), "C");
    }
}
