use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use invoice_generator::core::{Orientation, PageSize};
use invoice_generator::{
    execute, AppConfig, Command, InvoiceDraft, InvoiceModel, Money, Outcome, PdfConfig, Renderers,
};

#[derive(Parser)]
#[command(name = "invoice-generator")]
#[command(about = "Fill in an invoice and export it as text, PDF or an image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a blank invoice draft with a fresh number and today's date
    New {
        /// Where to write the draft (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the totals of a draft
    Totals {
        /// Draft file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Render a draft; prints the text preview when no output is given
    Render {
        /// Draft file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Plain-text output file
        #[arg(long)]
        text: Option<PathBuf>,

        /// PDF output file
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Image output file (.jpg/.jpeg for JPEG, anything else PNG)
        #[arg(long)]
        image: Option<PathBuf>,

        /// PDF page size: letter, a4 or legal
        #[arg(long, default_value = "letter")]
        page_size: PageSize,

        /// Lay the PDF out in landscape
        #[arg(long)]
        landscape: bool,
    },
}

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let renderers = Renderers::new(config);

    match cli.command {
        Commands::New { output } => cmd_new(&renderers, output.as_deref())?,
        Commands::Totals { input } => cmd_totals(&renderers, &input)?,
        Commands::Render {
            input,
            text,
            pdf,
            image,
            page_size,
            landscape,
        } => {
            let renderers = renderers.with_pdf_config(pdf_config(page_size, landscape));
            cmd_render(&renderers, &input, text, pdf, image)?
        }
    }

    Ok(())
}

fn pdf_config(page_size: PageSize, landscape: bool) -> PdfConfig {
    let orientation = if landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    PdfConfig::builder()
        .page_size(page_size)
        .orientation(orientation)
        .build()
}

fn load_model(renderers: &Renderers, input: &Path) -> Result<InvoiceModel> {
    let draft = InvoiceDraft::load(input)?;
    let mut model = InvoiceModel::with_payment_terms(renderers.config().payment_terms.clone());
    draft
        .apply(&mut model, renderers)
        .with_context(|| format!("Failed to load draft {}", input.display()))?;
    Ok(model)
}

fn cmd_new(renderers: &Renderers, output: Option<&Path>) -> Result<()> {
    let model = InvoiceModel::with_payment_terms(renderers.config().payment_terms.clone());
    let draft = InvoiceDraft::from_model(&model);

    match output {
        Some(path) => {
            draft.save(path)?;
            tracing::info!("Draft {} written to {}", model.data().invoice.number, path.display());
        }
        None => println!("{}", draft.to_json()?),
    }
    Ok(())
}

fn cmd_totals(renderers: &Renderers, input: &Path) -> Result<()> {
    let model = load_model(renderers, input)?;
    let totals = model.totals();

    println!("Items:    {}", model.items().len());
    println!("Subtotal: {}", Money::new(totals.subtotal).pad_right(11));
    println!("Discount: {}", Money::new(totals.discount_amount).pad_right(11));
    println!("Tax:      {}", Money::new(totals.tax_amount).pad_right(11));
    println!("TOTAL:    {}", Money::new(totals.total).pad_right(11));
    Ok(())
}

fn cmd_render(
    renderers: &Renderers,
    input: &Path,
    text: Option<PathBuf>,
    pdf: Option<PathBuf>,
    image: Option<PathBuf>,
) -> Result<()> {
    let mut model = load_model(renderers, input)?;

    let mut commands = Vec::new();
    commands.extend(text.map(Command::SaveText));
    commands.extend(pdf.map(Command::ExportPdf));
    commands.extend(image.map(Command::ExportImage));
    if commands.is_empty() {
        commands.push(Command::Generate);
    }

    for command in commands {
        match execute(&mut model, command, renderers)? {
            Outcome::Preview(text) => print!("{}", text),
            outcome => println!("{}", outcome),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoice_generator::{FontSet, InvoiceDraft};

    fn renderers() -> Renderers {
        Renderers::new(AppConfig::default()).with_fonts(FontSet::builtin())
    }

    fn write_draft(dir: &Path, with_item: bool) -> PathBuf {
        let mut model = InvoiceModel::new();
        if with_item {
            model.add_item("Widget", "2", "50").unwrap();
        }
        let path = dir.join("draft.json");
        InvoiceDraft::from_model(&model).save(&path).unwrap();
        path
    }

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from([
            "invoice-generator",
            "render",
            "-i",
            "draft.json",
            "--pdf",
            "out.pdf",
            "--page-size",
            "a4",
            "--landscape",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                page_size,
                landscape,
                pdf,
                text,
                ..
            } => {
                assert_eq!(page_size, PageSize::A4);
                assert!(landscape);
                assert_eq!(pdf, Some(PathBuf::from("out.pdf")));
                assert!(text.is_none());
            }
            _ => panic!("expected render"),
        }

        assert!(Cli::try_parse_from(["invoice-generator", "render", "-i", "d.json", "--page-size", "a3"]).is_err());
    }

    #[test]
    fn landscape_flag_swaps_pdf_page() {
        let config = pdf_config(PageSize::Letter, true);
        assert_eq!(config.page_dimensions(), (792.0, 612.0));
    }

    #[test]
    fn new_then_totals_then_render_text() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderers();
        let blank = dir.path().join("blank.json");
        cmd_new(&r, Some(blank.as_path())).unwrap();
        cmd_totals(&r, &blank).unwrap();

        let draft = write_draft(dir.path(), true);
        let text = dir.path().join("invoice.txt");
        cmd_render(&r, &draft, Some(text.clone()), None, None).unwrap();
        let saved = std::fs::read_to_string(&text).unwrap();
        assert!(saved.contains("Widget"));
        assert!(saved.contains("₨     100.00"));
    }

    #[test]
    fn render_fails_for_empty_or_missing_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderers();

        let empty = write_draft(dir.path(), false);
        assert!(cmd_render(&r, &empty, None, None, None).is_err());
        assert!(cmd_render(&r, &dir.path().join("absent.json"), None, None, None).is_err());
    }
}
