use timex::{Category, CategoryMetrics, TagResult, Tagger, Timex};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, tagger: &Tagger, result: &TagResult, color: bool) {
    let palette = ansi::Palette::new(color);
    let preview: String = input.trim().chars().take(80).collect();
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Tagging: \"{}\"", preview), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Rule set ━━━", ansi::GRAY));
    print_rule_set(tagger, &palette);

    println!("\n{}", palette.paint("━━━ Categories ━━━", ansi::GRAY));
    for metrics in &result.metrics.categories {
        print_category(metrics, &palette);
    }

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if result.timexes.is_empty() {
        println!("{}", palette.dim("  No temporal expressions found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No rule pattern matched");
        println!("  • Matches touched letters or digits on either side");
        println!("  • POS-constrained rules never fire on untagged input");
        println!("\n{}", palette.dim("  Tip: Set TIMEX_LOG=timex=trace to see each rejected match"));
    } else {
        print_results(input, &result.timexes, &palette);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let extraction: std::time::Duration = result.metrics.categories.iter().map(|m| m.duration).sum();
    println!(
        "  Total: {}  │  Extraction: {}  │  Resolve: {}  │  Sentences: {}  │  Subsumed: {}",
        palette.paint(format!("{:?}", result.metrics.total), ansi::GREEN),
        palette.paint(format!("{:?}", extraction), ansi::CYAN),
        palette.dim(format!("{:?}", result.metrics.resolve)),
        palette.paint(result.metrics.sentences.to_string(), ansi::BLUE),
        palette.paint(result.metrics.subsumed.to_string(), ansi::BLUE),
    );
    println!();
}

fn print_rule_set(tagger: &Tagger, palette: &ansi::Palette) {
    let rules = tagger.rules();
    let counts: Vec<String> = Category::PRIORITY_ORDER
        .iter()
        .filter(|c| rules.count(**c) > 0)
        .map(|c| format!("{} {}", palette.paint(c.as_str(), ansi::BLUE), rules.count(*c)))
        .collect();
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("language:"),
        palette.paint(tagger.language().name(), ansi::CYAN),
        palette.dim("rules:"),
        palette.paint(rules.len().to_string(), ansi::GREEN),
        palette.dim("│"),
        counts.join("  "),
    );
}

fn print_category(metrics: &CategoryMetrics, palette: &ansi::Palette) {
    let emitted = if metrics.emitted > 0 {
        palette.paint(format!("✓ {} emitted", metrics.emitted), ansi::GREEN)
    } else {
        palette.dim(format!("✗ {} emitted", metrics.emitted))
    };
    println!(
        "  {} {}  {}",
        palette.paint(format!("{:<9}", metrics.category.as_str()), ansi::BLUE),
        emitted,
        palette.dim(format!("{:?}", metrics.duration)),
    );
    println!(
        "    {} {}  {} {}  {} {}  {} {}  {} {}",
        palette.dim("rules:"),
        metrics.rules_considered,
        palette.dim("fast-rejected:"),
        metrics.fast_rejected,
        palette.dim("matches:"),
        palette.paint(metrics.candidates.to_string(), ansi::YELLOW),
        palette.dim("boundary:"),
        metrics.rejected_boundary,
        palette.dim("pos:"),
        metrics.rejected_pos,
    );
}

fn print_results(input: &str, timexes: &[Timex], palette: &ansi::Palette) {
    for (idx, timex) in timexes.iter().enumerate() {
        let value = if timex.is_resolved() {
            palette.bold(palette.paint(&timex.value, ansi::GREEN))
        } else {
            palette.bold(palette.paint(&timex.value, ansi::YELLOW))
        };
        println!(
            "  {} {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            value,
            palette.dim("│"),
            palette.paint(format!("\"{}\"", timex.covered_text(input)), ansi::CYAN),
            palette.paint(format!("span {}..{}", timex.begin, timex.end), ansi::YELLOW),
        );

        let mut extras = Vec::new();
        for (label, field) in [("quant:", &timex.quant), ("freq:", &timex.freq), ("mod:", &timex.modifier)] {
            if let Some(text) = field {
                extras.push(format!("{} {}", palette.dim(label), palette.paint(text, ansi::MAGENTA)));
            }
        }
        println!(
            "      {} {}  {} {}  {}",
            palette.dim("type:"),
            palette.paint(timex.category.as_str(), ansi::BLUE),
            palette.dim("│ rule:"),
            palette.paint(&timex.rule, ansi::CYAN),
            extras.join("  "),
        );
    }
}
