use console::{Emoji, style};

pub static SUCCESS_ICON: Emoji<'_, '_> = Emoji("✅ ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub fn print_success(msg: &str) {
    println!("{} {}", SUCCESS_ICON, style(msg).green());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_banner() {
    let lines: &[&str] = &[
        r"                             _           _     ",
        r" _ __   __ _ _ __   ___   __| | __ _ ___| |__  ",
        r"| '_ \ / _` | '_ \ / _ \ / _` |/ _` / __| '_ \ ",
        r"| | | | (_| | | | | (_) | (_| | (_| \__ \ | | |",
        r"|_| |_|\__,_|_| |_|\___/ \__,_|\__,_|___/_| |_|",
    ];

    // Gradient: #34d399 → #22d3ee → #818cf8 (diagonal top-left → bottom-right)
    let stops: [(u8, u8, u8); 3] = [(52, 211, 153), (34, 211, 238), (129, 140, 248)];
    let max_w = 47u32;
    let max_d = max_w + 4 * 10;

    println!();
    for (y, line) in lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            if ch == ' ' {
                print!(" ");
                continue;
            }
            let d = ((x as u32 + y as u32 * 10) * 1000 / max_d).min(1000);
            let (r, g, b) = if d <= 500 {
                lerp_color(stops[0], stops[1], d * 2)
            } else {
                lerp_color(stops[1], stops[2], (d - 500) * 2)
            };
            print!("\x1b[38;2;{};{};{}m{}", r, g, b, ch);
        }
        println!();
    }
    print!("\x1b[0m");

    println!("\x1b[38;2;34;211;238mEverything your agent is doing, at a glance.\x1b[0m\n");
}

fn lerp_color(a: (u8, u8, u8), b: (u8, u8, u8), t: u32) -> (u8, u8, u8) {
    let r = (a.0 as u32 * (1000 - t) + b.0 as u32 * t) / 1000;
    let g = (a.1 as u32 * (1000 - t) + b.1 as u32 * t) / 1000;
    let b_val = (a.2 as u32 * (1000 - t) + b.2 as u32 * t) / 1000;
    (r as u8, g as u8, b_val as u8)
}

pub fn print_goodbye() {
    println!("\n{} {}", SPARKLE, style("Dashboard closed.").bold().cyan());
}

/// Aligned help block: a bold heading followed by command/description rows.
pub struct GuideSection {
    title: String,
    rows: Vec<GuideRow>,
}

enum GuideRow {
    Command { usage: String, about: String },
    Status { label: String, value: String },
    Text(String),
    Hint(String),
    Blank,
}

const USAGE_COLUMN: usize = 38;

impl GuideSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn command(mut self, usage: &str, about: &str) -> Self {
        self.rows.push(GuideRow::Command {
            usage: usage.to_string(),
            about: about.to_string(),
        });
        self
    }

    pub fn status(mut self, label: &str, value: &str) -> Self {
        self.rows.push(GuideRow::Status {
            label: label.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.rows.push(GuideRow::Text(text.to_string()));
        self
    }

    pub fn hint(mut self, text: &str) -> Self {
        self.rows.push(GuideRow::Hint(text.to_string()));
        self
    }

    pub fn blank(mut self) -> Self {
        self.rows.push(GuideRow::Blank);
        self
    }

    pub fn render(&self) -> Vec<String> {
        let mut out = vec![format!("{}", style(&self.title).bold().underlined())];
        for row in &self.rows {
            out.push(match row {
                GuideRow::Command { usage, about } => format!(
                    "  {}{}",
                    style(format!("{:<width$}", usage, width = USAGE_COLUMN)).cyan(),
                    style(about).dim()
                ),
                GuideRow::Status { label, value } => {
                    format!("  {}: {}", style(label).bold(), value)
                }
                GuideRow::Text(text) => format!("  {}", text),
                GuideRow::Hint(text) => format!("  {}", style(text).italic().dim()),
                GuideRow::Blank => String::new(),
            });
        }
        out
    }

    pub fn print(self) {
        for line in self.render() {
            println!("{}", line);
        }
        println!();
    }
}
