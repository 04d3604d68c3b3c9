// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use owo_colors::{OwoColorize, Style};

#[derive(Debug, Default, Clone)]
pub(crate) struct Styles {
    pub(crate) is_colorized: bool,
    pub(crate) pass: Style,
    pub(crate) pass_bold: Style,
    pub(crate) fail: Style,
    pub(crate) fail_bold: Style,
    pub(crate) skip: Style,
    pub(crate) skip_bold: Style,
    pub(crate) count: Style,
    pub(crate) dim: Style,
    pub(crate) trace: Style,
    pub(crate) trace_dim: Style,
    pub(crate) path: Style,
    pub(crate) bold: Style,
    pub(crate) badge_pass: Style,
    pub(crate) badge_fail: Style,
    pub(crate) hash: Style,
    pub(crate) plan: Style,
}

impl Styles {
    pub(crate) fn colorize(&mut self) {
        self.is_colorized = true;
        self.pass = Style::new().green();
        self.pass_bold = Style::new().green().bold();
        self.fail = Style::new().red();
        self.fail_bold = Style::new().red().bold();
        self.skip = Style::new().yellow();
        self.skip_bold = Style::new().yellow().bold();
        self.count = Style::new().bright_black().dimmed();
        self.dim = Style::new().dimmed();
        self.trace = Style::new().bright_black();
        self.trace_dim = Style::new().bright_black().dimmed();
        self.path = Style::new().cyan();
        self.bold = Style::new().bold();
        self.badge_pass = Style::new().green().reversed().bold();
        self.badge_fail = Style::new().red().reversed().bold();
        // The `#` stays present in the raw text for TAP parsers but is
        // rendered invisible on color terminals.
        self.hash = Style::new().hidden();
        self.plan = Style::new().reversed();
    }
}

/// Output glyphs, with ASCII fallbacks for terminals without Unicode
/// support.
#[derive(Debug, Clone)]
pub(crate) struct ThemeCharacters {
    pub(crate) em_dash: &'static str,
    pub(crate) circle: &'static str,
    pub(crate) title_separator: &'static str,
    pub(crate) bar_full: char,
    pub(crate) bar_fractions: &'static [char],
}

impl Default for ThemeCharacters {
    fn default() -> Self {
        Self {
            em_dash: "-",
            circle: "*",
            title_separator: " > ",
            bar_full: '#',
            bar_fractions: &[],
        }
    }
}

impl ThemeCharacters {
    pub(crate) fn use_unicode(&mut self) {
        self.em_dash = "\u{2014}";
        self.circle = "\u{25cf}";
        self.title_separator = " \u{203a} ";
        self.bar_full = '\u{2588}';
        // Eighth blocks, thinnest first.
        self.bar_fractions = &['▏', '▎', '▍', '▌', '▋', '▊', '▉'];
    }
}

/// Renders a line as a TAP comment.
pub(crate) fn format_comment(line: &str, styles: &Styles) -> String {
    format!("{} {line}", "#".style(styles.hash))
}

/// Renders a fixed-width proportion bar.
pub(crate) fn render_bar(width: usize, percent: f64, theme: &ThemeCharacters) -> String {
    let percent = percent.clamp(0.0, 1.0);
    let filled = width as f64 * percent;
    let mut full = filled.floor() as usize;
    let mut remainder = ((filled - full as f64) * 8.0).round() as usize;
    if remainder == 8 {
        full += 1;
        remainder = 0;
    }

    let mut bar = String::with_capacity(width * 3);
    let mut cells = 0;
    for _ in 0..full {
        bar.push(theme.bar_full);
        cells += 1;
    }
    if remainder > 0
        && cells < width
        && let Some(&fraction) = theme.bar_fractions.get(remainder - 1)
    {
        bar.push(fraction);
        cells += 1;
    }
    for _ in cells..width {
        bar.push(' ');
    }
    bar
}

/// Renders the percent label + 10-cell bar used in stats lines.
pub(crate) fn stats_bar(
    percent: f64,
    has_errors: bool,
    styles: &Styles,
    theme: &ThemeCharacters,
) -> String {
    let mut label = format!("{:>3}", format!("{}%", (100.0 * percent).round() as u64));
    while label.len() < 4 {
        label.push(' ');
    }

    let bar = render_bar(10, percent, theme);
    let bar_style = if has_errors { styles.fail } else { styles.count };
    let label_style = if has_errors {
        styles.fail_bold
    } else if percent < 1.0 {
        styles.skip
    } else {
        styles.pass
    };

    format!("{} {}", label.style(label_style), bar.style(bar_style))
}

/// Computes `path` relative to `root`, walking up with `..` components when
/// `path` lies outside `root`.
pub(crate) fn relative_to(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let root_components: Vec<_> = root.components().collect();
    let path_components: Vec<_> = path.components().collect();
    let common = root_components
        .iter()
        .zip(path_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = Utf8PathBuf::new();
    for _ in common..root_components.len() {
        relative.push("..");
    }
    for component in &path_components[common..] {
        relative.push(component.as_str());
    }
    relative
}
