use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use markdown_weaver_escape::{FmtWriter, escape_html};
use mdpanel_renderer::stylesheet::PANEL_CLASS;
use mdpanel_renderer::{RenderConfig, Renderer, Theme, generate_panel_css};
use miette::{IntoDiagnostic, Result};
use smol_str::SmolStr;

mod config;

#[derive(Parser)]
#[command(version, about = "Render markdown to sanitized panel HTML", long_about = None)]
struct Cli {
    /// Markdown file to render, or `-` for stdin
    input: PathBuf,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit a standalone page with the panel stylesheet
    #[arg(long)]
    page: bool,

    /// Fail on malformed HTML instead of letting the parser recover
    #[arg(long)]
    strict: bool,

    /// Syntect theme for code blocks
    #[arg(long, env = "MDPANEL_THEME")]
    theme: Option<String>,

    /// KDL config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_miette();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load(path)?,
        None => RenderConfig::default(),
    };
    if cli.strict {
        config.strict_parse = true;
    }
    if let Some(theme) = &cli.theme {
        config.code_theme = SmolStr::new(theme);
    }
    tracing::debug!(?config, "resolved config");

    let markdown = read_input(&cli.input)?;
    let html = Renderer::new(config).render(&markdown)?;

    let out = if cli.page {
        standalone_page(&page_title(&cli.input), &html)
    } else {
        html
    };
    write_output(cli.output.as_deref(), &out)
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).into_diagnostic()?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .into_diagnostic()
            .map_err(|e| e.wrap_err(format!("couldn't read {}", input.display())))
    }
}

fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, html)
            .into_diagnostic()
            .map_err(|e| e.wrap_err(format!("couldn't write {}", path.display()))),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes()).into_diagnostic()?;
            if !html.ends_with('\n') {
                stdout.write_all(b"\n").into_diagnostic()?;
            }
            Ok(())
        }
    }
}

fn page_title(input: &Path) -> String {
    input
        .file_stem()
        .filter(|_| input != Path::new("-"))
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mdpanel".to_string())
}

fn standalone_page(title: &str, body: &str) -> String {
    let mut escaped_title = String::new();
    let _ = escape_html(FmtWriter(&mut escaped_title), title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{escaped_title}</title>
<style>
{css}</style>
</head>
<body>
<main class="{PANEL_CLASS}">{body}</main>
</body>
</html>
"#,
        css = generate_panel_css(&Theme::default()),
    )
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_file_stem() {
        assert_eq!(page_title(Path::new("notes/today.md")), "today");
        assert_eq!(page_title(Path::new("-")), "mdpanel");
    }

    #[test]
    fn page_wraps_fragment_in_panel() {
        let page = standalone_page("a <b>", "<p>hi</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>a &lt;b&gt;</title>"));
        assert!(page.contains("<main class=\"markdown-panel\"><p>hi</p></main>"));
        assert!(page.contains(".code-lang-label"));
    }
}
