// HTML and plain-text writers for a transcript
// Comments masked during preprocessing are put back as the last step

use crate::chant::normalization::COMMENT_PLACEHOLDER;
use crate::chant::segments::is_breaking_punctuation;
use crate::chant::{joins_relevant, Syllable, Transcript, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "htm",
            OutputFormat::Text => "txt",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            OutputFormat::Html => "<span class=s></span>",
            OutputFormat::Text => "⸱",
        }
    }

    fn newline(self) -> &'static str {
        match self {
            OutputFormat::Html => "<br>\n",
            OutputFormat::Text => "\n",
        }
    }
}

/// Page styling, HTML only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    pub font_size: u32,
    pub dark: bool,
    /// Bold long syllables, light short ones, no punctuation marker
    pub samyok: bool,
    /// Noto fonts with a heavier weight for long syllables; ignored with `samyok`
    pub noto: bool,
    /// Replaces the generated stylesheet and every option above
    pub user_css: Option<String>,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            font_size: 34,
            dark: false,
            samyok: false,
            noto: false,
            user_css: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// How many line breaks each input newline becomes
    pub newline_count: usize,
    pub style: StyleOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            newline_count: 1,
            style: StyleOptions::default(),
        }
    }
}

/// Escape `& < > ' "` for HTML text content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(ch),
        }
    }
    out
}

fn rule(out: &mut String, selector: &str, declarations: &[&str]) {
    out.push_str(selector);
    out.push_str(" {\n");
    for declaration in declarations.iter().filter(|d| !d.is_empty()) {
        out.push_str("  ");
        out.push_str(declaration);
        out.push_str(";\n");
    }
    out.push_str("}\n\n");
}

/// Generated stylesheet, or the user's verbatim when one is given
pub fn stylesheet(style: &StyleOptions) -> String {
    if let Some(css) = &style.user_css {
        return css.clone();
    }
    let noto = style.noto && !style.samyok;
    let font_size = format!("font-size: {}px", style.font_size);
    let mut css = String::new();

    rule(
        &mut css,
        "body",
        &[
            if style.dark { "background: black" } else { "" },
            if style.dark { "color: white" } else { "" },
            if noto { "font-family: \"Noto Sans\"" } else { "" },
            font_size.as_str(),
            "line-height: 1.4em",
            "letter-spacing: -0.04em",
            "word-spacing: 0.40em",
        ],
    );
    rule(&mut css, ".w", &["white-space: nowrap"]);
    rule(
        &mut css,
        ".s::before",
        &["content: \"⸱\"", if style.dark { "color: #858585" } else { "color: #646464" }],
    );
    if !style.samyok {
        rule(&mut css, ".punct::after", &["content: \"█\"", "color: orangered"]);
    }
    rule(&mut css, ".truehigh", &["font-weight: bold", "vertical-align: 13%"]);
    rule(&mut css, ".optionalhigh", &[]);
    rule(
        &mut css,
        ".long",
        &[
            if style.samyok { "font-weight: bold" } else { "" },
            if noto { "font-family: \"Noto Sans Medium\" !important" } else { "" },
        ],
    );
    rule(&mut css, ".short", &[if style.samyok { "font-weight: 300" } else { "" }]);
    rule(
        &mut css,
        ".hint",
        &["text-decoration-line: underline", "text-decoration-style: wavy"],
    );
    rule(&mut css, ".hint::after", &["content: \"|\"", "color: orangered"]);
    rule(
        &mut css,
        ".comment",
        &[
            if style.dark { "background: darkgrey" } else { "background: lightgrey" },
            "font-style: italic",
            "word-spacing: normal",
        ],
    );
    css
}

pub fn page_head(style: &StyleOptions) -> String {
    format!(
        "<!DOCTYPE html> <html><head>\n<meta charset=\"UTF-8\">\n<style>\n{}\n</style></head>\n<body>",
        stylesheet(style)
    )
}

/// CSS classes of one syllable: tone, then length, then hint
pub fn syllable_classes(syllable: &Syllable) -> Vec<&'static str> {
    let mut classes = Vec::new();
    if syllable.true_high {
        classes.push("truehigh");
    } else if syllable.optional_high {
        classes.push("optionalhigh");
    }
    if syllable.is_long {
        classes.push("long");
    } else if !syllable.irrelevant {
        classes.push("short");
    }
    if syllable.hint {
        classes.push("hint");
    }
    classes
}

struct Writer<'a> {
    options: &'a RenderOptions,
    newline: String,
    out: String,
    open_word: bool,
}

impl<'a> Writer<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        let out = match options.format {
            OutputFormat::Html => page_head(&options.style),
            OutputFormat::Text => String::new(),
        };
        Self {
            options,
            newline: options.format.newline().repeat(options.newline_count),
            out,
            open_word: false,
        }
    }

    fn html(&self) -> bool {
        self.options.format == OutputFormat::Html
    }

    fn write_unit(&mut self, unit: &Unit) {
        if unit.text.contains('\n') {
            let text = unit.text.replace('\n', &self.newline);
            self.out.push_str(&text);
        } else if unit.text.starts_with(|c: char| c.is_ascii_whitespace()) {
            self.out.push(' ');
        } else if is_breaking_punctuation(unit) {
            if self.html() {
                self.out.push_str(&escape_html(&unit.text));
                self.out.push_str("<span class=punct></span>");
            } else {
                self.out.push_str(&unit.text);
                self.out.push('█');
            }
        } else if self.html() {
            self.out.push_str(&escape_html(&unit.text));
        } else {
            self.out.push_str(&unit.text);
        }
    }

    fn write_syllable(&mut self, syllable: &Syllable, next: Option<&Syllable>) {
        let classes = if self.html() {
            if !syllable.irrelevant && !self.open_word {
                self.out.push_str("<span class=\"w\">");
                self.open_word = true;
            } else if syllable.irrelevant && self.open_word {
                self.out.push_str("</span>");
                self.open_word = false;
            }
            syllable_classes(syllable)
        } else {
            Vec::new()
        };

        if !classes.is_empty() {
            self.out.push_str(&format!("<span class=\"{}\">", classes.join(" ")));
        }
        for unit in &syllable.units {
            self.write_unit(unit);
        }
        if !classes.is_empty() {
            self.out.push_str("</span>");
        }
        if syllable.hint && !self.html() {
            self.out.push('|');
        }
        if next.is_some_and(|next| joins_relevant(syllable, next)) {
            self.out.push_str(self.options.format.separator());
        }
    }

    fn finish(mut self) -> String {
        if self.html() {
            if self.open_word {
                self.out.push_str("</span>");
            }
            self.out.push_str("</body></html>");
        }
        self.out
    }
}

/// Put masked comments back in order; HTML comments are escaped and wrapped in a span
pub fn restore_comments(output: &str, comments: &[String], format: OutputFormat) -> String {
    if comments.is_empty() {
        return output.to_string();
    }
    let mut restored = String::with_capacity(output.len());
    let mut pending = comments.iter();
    let mut pieces = output.split(COMMENT_PLACEHOLDER).peekable();
    while let Some(piece) = pieces.next() {
        restored.push_str(piece);
        if pieces.peek().is_none() {
            break;
        }
        match (pending.next(), format) {
            (Some(comment), OutputFormat::Html) => {
                restored.push_str("<span class=comment>");
                restored.push_str(&escape_html(comment));
                restored.push_str("</span>");
            }
            (Some(comment), OutputFormat::Text) => restored.push_str(comment),
            (None, _) => restored.push_str(COMMENT_PLACEHOLDER),
        }
    }
    restored
}

/// Render every syllable of the transcript, then restore comments
pub fn render(transcript: &Transcript, comments: &[String], options: &RenderOptions) -> String {
    let syllables: Vec<&Syllable> = transcript.syllables().collect();
    let mut writer = Writer::new(options);
    for (i, syllable) in syllables.iter().enumerate() {
        writer.write_syllable(syllable, syllables.get(i + 1).copied());
    }
    restore_comments(&writer.finish(), comments, options.format)
}
